//! Process-wide pagination settings, loaded once at startup.

use crate::query::numeric_prefix;
use crate::Error;

/// Page size used when a request gives no valid `page[size]`.
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// Environment variable overriding [`DEFAULT_PAGE_SIZE`].
pub const PAGE_SIZE_ENV: &str = "PAGINATION_LIMIT";

/// Pagination settings shared by every request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Items per page when the request does not ask for a valid size.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Creates a config with the given default page size. Zero falls back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new(default_page_size: u64) -> Self {
        if default_page_size < 1 {
            return Self::default();
        }
        Self { default_page_size }
    }

    /// Reads [`PAGE_SIZE_ENV`]. Missing or unusable values fall back to the
    /// default with a warning.
    pub fn from_env() -> Self {
        match std::env::var(PAGE_SIZE_ENV) {
            Ok(raw) => Self::from_raw(&raw).unwrap_or_else(|e| {
                tracing::warn!("{}, using page size {}", e, DEFAULT_PAGE_SIZE);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parses a raw page-size setting with the same numeric-prefix coercion as
    /// `page[size]`. Values below 1 are rejected.
    pub fn from_raw(raw: &str) -> Result<Self, Error> {
        let size = numeric_prefix(raw);
        if size < 1 {
            return Err(Error::InvalidConfig {
                key: PAGE_SIZE_ENV.to_string(),
                value: raw.to_string(),
            });
        }
        Ok(Self::new(size as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty() {
        assert_eq!(PaginationConfig::default().default_page_size, 30);
        assert_eq!(PaginationConfig::new(0).default_page_size, 30);
    }

    #[test]
    fn from_raw_accepts_numeric_prefix() {
        assert_eq!(PaginationConfig::from_raw("50").unwrap().default_page_size, 50);
        assert_eq!(PaginationConfig::from_raw("15 per page").unwrap().default_page_size, 15);
    }

    #[test]
    fn from_raw_rejects_unusable_values() {
        let err = PaginationConfig::from_raw("lots").unwrap_err();
        assert!(err.to_string().contains("PAGINATION_LIMIT"));
        assert!(PaginationConfig::from_raw("-5").is_err());
        assert!(PaginationConfig::from_raw("0").is_err());
    }
}
