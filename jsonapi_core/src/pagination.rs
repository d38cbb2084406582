//! Page windowing, page-number computation, and link/meta generation.
//!
//! A request handler windows its collection once, computes the numbers once,
//! and hands the same [`PaginationResult`] to both the meta builder and the
//! links builder:
//!
//! ```
//! use jsonapi_core::{PaginateOptions, PaginationConfig, Paginator, QueryParams};
//! use jsonapi_core::types::LinkName;
//!
//! let query = QueryParams::parse("page[number]=2&page[size]=1");
//! let paginator = Paginator::new(PaginationConfig::default());
//! let page = paginator.window_sequence(vec!["c", "b", "a"], &query, &PaginateOptions::default());
//!
//! let numbers = page.numbers();
//! assert_eq!(page.records(), &vec!["b"]);
//! assert_eq!(numbers.meta().unwrap().total_page, 3);
//! assert_eq!(
//!     numbers.links(&query, &[] as &[&str]).get(LinkName::Next),
//!     Some("?page[number]=3&page[size]=1")
//! );
//! ```

use std::cell::OnceCell;

use serde::Serialize;
use serde_json::Value;

use crate::config::PaginationConfig;
use crate::query::{PageParams, QueryParams};
use crate::types::{LinkName, Links, Meta};

/// A value that may be paginated and measured.
pub trait Collection {
    /// Whether this value is a collection at all. Non-collections are passed
    /// through untouched and get no pagination numbers.
    fn is_collection(&self) -> bool {
        true
    }

    /// Number of items currently held (after any window), if known.
    fn size(&self) -> Option<u64>;
}

/// A lazy collection (typically a database scope) that applies offset/limit
/// natively and can count itself without them.
pub trait OffsetLimitable: Collection + Sized {
    /// Restricts the scope to `limit` items starting at `offset`. Must not
    /// materialize the underlying data.
    fn offset_limit(self, offset: u64, limit: u64) -> Self;

    /// Counts the full collection, ignoring any limit, offset, or order.
    fn unscoped_count(&self) -> u64;
}

/// An in-memory sequence that is windowed by slicing.
pub trait PlainSequence: Collection + Sized {
    /// Keeps the items in `[offset, offset + limit)`, clipped to bounds.
    fn slice_window(self, offset: u64, limit: u64) -> Self;
}

impl<T> Collection for Vec<T> {
    fn size(&self) -> Option<u64> {
        Some(self.len() as u64)
    }
}

impl<T> PlainSequence for Vec<T> {
    fn slice_window(self, offset: u64, limit: u64) -> Self {
        self.into_iter()
            .skip(to_usize(offset))
            .take(to_usize(limit))
            .collect()
    }
}

/// JSON arrays are collections; every other JSON value is not.
impl Collection for Value {
    fn is_collection(&self) -> bool {
        self.is_array()
    }

    fn size(&self) -> Option<u64> {
        self.as_array().map(|items| items.len() as u64)
    }
}

impl PlainSequence for Value {
    fn slice_window(self, offset: u64, limit: u64) -> Self {
        match self {
            Value::Array(items) => Value::Array(items.slice_window(offset, limit)),
            other => other,
        }
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Per-call pagination options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginateOptions {
    /// A total the caller already knows (e.g. a denormalized count). Overrides
    /// every computed total.
    pub total_count: Option<u64>,
}

impl PaginateOptions {
    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }
}

/// Windows collections according to the request's page parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Page parameters of `query` under this paginator's default page size.
    pub fn page_params(&self, query: &QueryParams) -> PageParams {
        PageParams::from_query(query, &self.config)
    }

    /// Windows a lazy collection by delegating offset/limit to it. Nothing is
    /// materialized here; the total is counted when numbers are computed.
    pub fn window<C: OffsetLimitable>(
        &self,
        collection: C,
        query: &QueryParams,
        options: &PaginateOptions,
    ) -> Windowed<C> {
        let page = self.page_params(query);
        tracing::debug!(
            "Windowing scope at offset {} limit {}",
            page.offset(),
            page.limit()
        );
        Windowed {
            records: collection.offset_limit(page.offset(), page.limit()),
            page,
            unscoped_count: Some(C::unscoped_count as fn(&C) -> u64),
            original_size: None,
            total_count: options.total_count,
            numbers: OnceCell::new(),
        }
    }

    /// Windows an in-memory sequence by slicing it, remembering its length
    /// before the slice as the total.
    pub fn window_sequence<C: PlainSequence>(
        &self,
        collection: C,
        query: &QueryParams,
        options: &PaginateOptions,
    ) -> Windowed<C> {
        let page = self.page_params(query);
        let original_size = collection.size();
        tracing::debug!(
            "Slicing sequence of {:?} items at offset {} limit {}",
            original_size,
            page.offset(),
            page.limit()
        );
        Windowed {
            records: collection.slice_window(page.offset(), page.limit()),
            page,
            unscoped_count: None,
            original_size,
            total_count: options.total_count,
            numbers: OnceCell::new(),
        }
    }
}

/// A windowed collection together with what is needed to count it.
///
/// Numbers are computed on first use and reused afterwards, so meta and links
/// built from the same instance always agree.
pub struct Windowed<C> {
    records: C,
    page: PageParams,
    unscoped_count: Option<fn(&C) -> u64>,
    original_size: Option<u64>,
    total_count: Option<u64>,
    numbers: OnceCell<PaginationResult>,
}

impl<C: Collection> Windowed<C> {
    /// The items of the requested page.
    pub fn records(&self) -> &C {
        &self.records
    }

    pub fn into_records(self) -> C {
        self.records
    }

    /// The page parameters this window was built from.
    pub fn page(&self) -> PageParams {
        self.page
    }

    /// Computes the page numbers, at most once per instance.
    pub fn numbers(&self) -> &PaginationResult {
        self.numbers.get_or_init(|| self.compute_numbers())
    }

    fn compute_numbers(&self) -> PaginationResult {
        if !self.records.is_collection() {
            return PaginationResult::NotPaginated;
        }

        let total = self.resolve_total();
        let PageParams { number, size } = self.page;
        let last = total.map_or(1, |total| total.div_ceil(size).max(1));

        PaginationResult::Paginated(PageNumbers {
            current: number,
            first: 1,
            prev: (number > 1).then(|| number - 1),
            next: (number < last).then(|| number + 1),
            last,
            total_count: total,
            total_page: total.map(|_| last),
        })
    }

    fn resolve_total(&self) -> Option<u64> {
        if let Some(total) = self.total_count {
            tracing::debug!("Using predefined total count {}", total);
            return Some(total);
        }
        if let Some(count) = self.unscoped_count {
            return Some(count(&self.records));
        }
        self.original_size.or_else(|| self.records.size())
    }
}

/// Page numbers of one windowed collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageNumbers {
    pub current: u64,
    pub first: u64,
    pub prev: Option<u64>,
    pub next: Option<u64>,
    pub last: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_page: Option<u64>,
}

impl PageNumbers {
    /// The page a link points to, if any.
    pub fn page(&self, link: LinkName) -> Option<u64> {
        match link {
            LinkName::Current => Some(self.current),
            LinkName::First => Some(self.first),
            LinkName::Prev => self.prev,
            LinkName::Next => self.next,
            LinkName::Last => Some(self.last),
        }
    }
}

/// Outcome of computing page numbers for a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationResult {
    /// The value is not a collection; it gets no meta and no links.
    NotPaginated,
    Paginated(PageNumbers),
}

impl PaginationResult {
    pub fn page_numbers(&self) -> Option<&PageNumbers> {
        match self {
            PaginationResult::Paginated(numbers) => Some(numbers),
            PaginationResult::NotPaginated => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PaginationResult::NotPaginated)
    }

    /// `total_count` and `total_page`, when a total was resolved.
    pub fn meta(&self) -> Option<Meta> {
        let numbers = self.page_numbers()?;
        Some(Meta {
            total_count: numbers.total_count?,
            total_page: numbers.total_page?,
        })
    }

    /// Builds `current`, `first`, `prev`, `next` and `last` links from the
    /// request's query, minus route-derived keys, with `page[number]`
    /// substituted. Empty for non-collections.
    pub fn links<S: AsRef<str>>(&self, query: &QueryParams, path_params: &[S]) -> Links {
        let mut links = Links::default();
        let Some(numbers) = self.page_numbers() else {
            return links;
        };

        let base = query.without(path_params);
        for name in LinkName::ALL {
            let url = numbers
                .page(name)
                .map(|number| format!("?{}", base.with_page_number(number).to_query()));
            links.insert(name, url);
        }
        links
    }
}
