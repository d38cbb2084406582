mod common;
pub use self::common::QueryParams;
mod page;
pub use self::page::PageParams;
pub(crate) use self::page::numeric_prefix;
