//! Page-number/page-size extraction from a [`QueryParams`] tree.

use serde_json::Value;

use crate::config::PaginationConfig;

use super::common::QueryParams;

/// The requested page, after coercion. Both fields are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageParams {
    /// Page number (1-indexed).
    pub number: u64,
    /// Items per page.
    pub size: u64,
}

impl PageParams {
    /// Builds page parameters, flooring both values to 1.
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Reads `page[number]` and `page[size]` from the query.
    ///
    /// Values go through a best-effort numeric coercion (`"12abc"` is 12,
    /// `"NaN"` is 0). The number is floored to 1; a size below 1 falls back to
    /// the configured default.
    pub fn from_query(query: &QueryParams, config: &PaginationConfig) -> Self {
        let page = query.get("page").and_then(Value::as_object);
        let number = page.and_then(|p| p.get("number")).map_or(0, to_integer);
        let size = page.and_then(|p| p.get("size")).map_or(0, to_integer);

        let size = if size < 1 {
            config.default_page_size
        } else {
            size as u64
        };
        Self::new(number.max(1) as u64, size)
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    /// Maximum number of items on this page.
    pub fn limit(&self) -> u64 {
        self.size
    }
}

fn to_integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => numeric_prefix(s),
        _ => 0,
    }
}

/// Parses the longest numeric prefix of `input` (after leading whitespace) and
/// truncates it to an integer. Returns 0 when there is no numeric prefix.
pub(crate) fn numeric_prefix(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        has_digits = true;
    }
    if !has_digits {
        return 0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    // `as` saturates on overflow and maps NaN to 0.
    trimmed[..end].parse::<f64>().map_or(0, |f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> PaginationConfig {
        PaginationConfig::new(30)
    }

    #[test]
    fn numeric_prefix_variants() {
        assert_eq!(numeric_prefix("12"), 12);
        assert_eq!(numeric_prefix("12abc"), 12);
        assert_eq!(numeric_prefix("  7"), 7);
        assert_eq!(numeric_prefix("2.9"), 2);
        assert_eq!(numeric_prefix("-3"), -3);
        assert_eq!(numeric_prefix("1e2"), 100);
        assert_eq!(numeric_prefix(".5"), 0);
        assert_eq!(numeric_prefix("NaN"), 0);
        assert_eq!(numeric_prefix(""), 0);
        assert_eq!(numeric_prefix("-"), 0);
        assert_eq!(numeric_prefix("4e"), 4);
    }

    #[test]
    fn defaults_when_page_missing() {
        let page = PageParams::from_query(&QueryParams::new(), &config());
        assert_eq!(page, PageParams { number: 1, size: 30 });
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 30);
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let query = QueryParams::parse("page[number]=Nan&page[size]=NaN");
        assert_eq!(
            PageParams::from_query(&query, &config()),
            PageParams { number: 1, size: 30 }
        );
    }

    #[test]
    fn negative_and_zero_values_fall_back() {
        let query = QueryParams::parse("page[number]=-4&page[size]=0");
        assert_eq!(
            PageParams::from_query(&query, &PaginationConfig::new(10)),
            PageParams { number: 1, size: 10 }
        );
    }

    #[test]
    fn offset_from_number_and_size() {
        let query = QueryParams::parse("page[number]=3&page[size]=25");
        let page = PageParams::from_query(&query, &config());
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[test]
    fn accepts_json_numbers() {
        let mut query = QueryParams::new();
        query.insert("page", json!({"number": 2, "size": 1.9}));
        assert_eq!(
            PageParams::from_query(&query, &config()),
            PageParams { number: 2, size: 1 }
        );
    }

    #[test]
    fn scalar_page_is_ignored() {
        let query = QueryParams::parse("page=5");
        assert_eq!(
            PageParams::from_query(&query, &config()),
            PageParams { number: 1, size: 30 }
        );
    }
}
