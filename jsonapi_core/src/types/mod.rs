mod meta;
pub use self::meta::{DocumentMeta, LinkName, Links, Meta, PaginatedDocument};
