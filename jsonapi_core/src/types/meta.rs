use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationResult;
use crate::query::QueryParams;

/// Count metadata for a paginated collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub total_count: u64,
    pub total_page: u64,
}

/// The navigation links of a page, in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkName {
    Current,
    First,
    Prev,
    Next,
    Last,
}

impl LinkName {
    pub const ALL: [LinkName; 5] = [
        LinkName::Current,
        LinkName::First,
        LinkName::Prev,
        LinkName::Next,
        LinkName::Last,
    ];
}

/// Link name to relative URL (`?page[number]=2&...`). A `None` value is a
/// link that exists but points nowhere, e.g. `prev` on the first page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<LinkName, Option<String>>);

impl Links {
    pub(crate) fn insert(&mut self, name: LinkName, url: Option<String>) {
        self.0.insert(name, url);
    }

    /// Returns the URL of a link, if the link exists and is not null.
    pub fn get(&self, name: LinkName) -> Option<&str> {
        self.0.get(&name).and_then(|url| url.as_deref())
    }

    /// Whether the link is present, null or not.
    pub fn contains(&self, name: LinkName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub pagination: Meta,
}

/// A top-level listing document: one page of data plus pagination meta and
/// links.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaginatedDocument<T> {
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<DocumentMeta>,
    pub links: Links,
}

impl<T> PaginatedDocument<T> {
    /// Assembles a document from a page of data and the numbers computed for
    /// it. `path_params` names query keys that came from the route and must
    /// not leak into links.
    pub fn new<S: AsRef<str>>(
        data: Vec<T>,
        numbers: &PaginationResult,
        query: &QueryParams,
        path_params: &[S],
    ) -> Self {
        Self {
            data,
            meta: numbers.meta().map(|pagination| DocumentMeta { pagination }),
            links: numbers.links(query, path_params),
        }
    }
}
