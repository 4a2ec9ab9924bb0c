//! Translation of listing parameters into store filters and options.
//!
//! Parameters arrive as raw query-string values. Anything that does not
//! parse falls back to its default instead of rejecting the request.

use serde::Deserialize;

/// Page index used when `page` is missing or invalid.
pub const DEFAULT_PAGE: u64 = 0;

/// Page size used when `size` is missing or invalid.
pub const DEFAULT_PAGE_SIZE: u64 = 9;

/// Number of items returned by the popularity listing.
pub const POPULAR_LIMIT: u64 = 6;

/// Raw listing parameters as sent by the client.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub filter: Option<String>,
}

/// Offset/limit pair derived from `page` and `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    /// Parse page and size, coercing bad values to the defaults.
    pub fn parse(page: Option<&str>, size: Option<&str>) -> Self {
        let page = parse_or_default(page, DEFAULT_PAGE, |_| true);
        let size = parse_or_default(size, DEFAULT_PAGE_SIZE, |n| n > 0);
        Self {
            skip: page.saturating_mul(size),
            limit: size,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::parse(None, None)
    }
}

fn parse_or_default(value: Option<&str>, default: u64, accept: impl Fn(u64) -> bool) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| accept(*n))
        .unwrap_or(default)
}

/// Explicit price ordering requested through `filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

impl PriceSort {
    /// Only `asc` and `desc` select an order; anything else means none.
    pub fn parse(filter: Option<&str>) -> Option<Self> {
        match filter.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => Some(PriceSort::Ascending),
            Some("desc") => Some(PriceSort::Descending),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            PriceSort::Ascending => "ASC",
            PriceSort::Descending => "DESC",
        }
    }
}

/// How the `count` of a listing is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStrategy {
    /// Total documents in the collection.
    Collection,
    /// Length of the returned page. Filtered searches report this.
    ReturnedLength,
}

/// A food listing query ready to run against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodQuery {
    /// Case-insensitive substring that `name` must contain.
    pub name_contains: Option<String>,
    pub sort: Option<PriceSort>,
    pub pagination: Pagination,
}

impl FoodQuery {
    pub fn count_strategy(&self) -> CountStrategy {
        if self.name_contains.is_some() {
            CountStrategy::ReturnedLength
        } else {
            CountStrategy::Collection
        }
    }
}

impl From<&ListParams> for FoodQuery {
    fn from(params: &ListParams) -> Self {
        let name_contains = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            name_contains,
            sort: PriceSort::parse(params.filter.as_deref()),
            pagination: Pagination::parse(params.page.as_deref(), params.size.as_deref()),
        }
    }
}
