//! Error types for the parsing boundary.
//!
//! The deserializer and the paginator never fail; these errors only come from
//! turning raw text into the values they consume.

/// Errors that can occur when parsing inputs or loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The input text was not valid JSON.
    #[error("Invalid JSON input")]
    InvalidJson(#[from] serde_json::Error),
    /// A configuration value was rejected under strict loading.
    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}
