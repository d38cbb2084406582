//! JSON:API request helpers: flatten inbound resource documents into
//! persistence-ready field maps, and window collections into pages with
//! navigation links and count metadata.

pub mod config;
pub mod deserialization;
pub mod document;
mod errors;
pub mod inflector;
pub mod pagination;
mod query;
pub mod types;

pub use self::config::PaginationConfig;
pub use self::deserialization::{deserialize, DeserializeOptions, Deserializer, FlatMap};
pub use self::document::{Document, RawParameters};
pub use self::errors::Error;
pub use self::inflector::{English, Inflector};
pub use self::pagination::{
    Collection, OffsetLimitable, PageNumbers, PaginateOptions, PaginationResult, Paginator,
    PlainSequence, Windowed,
};
pub use self::query::{PageParams, QueryParams};
