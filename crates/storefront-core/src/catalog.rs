//! # Catalog Query Derivation
//!
//! Turns raw list parameters into a filter + sort + page request, and turns
//! a fetched page back into the [`PageResult`] envelope.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  limit="5" page="2" sort="asc" query="tools"                            │
//! │       │                                                                 │
//! │       ▼  CatalogQuery::from_params                                      │
//! │  ┌───────────────────────────────────────────────┐                      │
//! │  │ filter: Category("tools")                     │                      │
//! │  │ sort:   Ascending (price)                     │                      │
//! │  │ page:   PageRequest { page: 2, limit: 5 }     │                      │
//! │  └───────────────────────────────────────────────┘                      │
//! │       │                                                                 │
//! │       ▼  store: filter → sort → OFFSET 5 LIMIT 5 (+ COUNT)              │
//! │       │                                                                 │
//! │       ▼  PageResult::build                                              │
//! │  { payload, totalPages, page, hasPrevPage, prevLink, ... }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Parameter Rules
//! - `limit`, `page`: leading-integer parse; absent, zero, negative or
//!   unparsable values fall back to the defaults
//! - `query`: `"available"` / `"unavailable"` filter on status, any other
//!   non-blank value is an exact category match, blank means no filter
//! - `sort`: `"asc"` / `"desc"` order by price, anything else keeps the
//!   store's natural (insertion) order

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;
use crate::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Raw Parameters
// =============================================================================

/// List parameters exactly as received from the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
    pub query: Option<String>,
}

/// Page-size settings supplied by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    /// Used when `limit` is absent or not a positive integer.
    pub page_size: u32,
    /// Requested limits above this are clamped down to it.
    pub max_page_size: u32,
}

impl Default for PageDefaults {
    fn default() -> Self {
        PageDefaults {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Parses a positive integer the lenient way list parameters are read.
///
/// Leading whitespace and a `+` sign are skipped, then the leading run of
/// digits is read (`"5abc"` is 5). Zero, negatives, and strings with no
/// leading digits yield `default`. Values past `u32::MAX` saturate.
///
/// ```rust
/// use storefront_core::catalog::parse_positive;
///
/// assert_eq!(parse_positive(Some("5abc"), 10), 5);
/// assert_eq!(parse_positive(Some("-2"), 10), 10);
/// assert_eq!(parse_positive(Some("0"), 10), 10);
/// assert_eq!(parse_positive(None, 10), 10);
/// ```
pub fn parse_positive(raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };

    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let value = unsigned
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(None, |acc: Option<u64>, d| {
            Some(acc.unwrap_or(0).saturating_mul(10).saturating_add(u64::from(d)))
        });

    match value {
        Some(0) | None => default,
        Some(v) => u32::try_from(v).unwrap_or(u32::MAX),
    }
}

// =============================================================================
// Filter & Sort
// =============================================================================

/// Which products a list request matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// No filter: every product matches.
    All,
    /// Exact match on the availability flag.
    Status(bool),
    /// Exact match on category.
    Category(String),
}

impl ProductFilter {
    /// Derives the filter from the raw `query` parameter.
    pub fn from_query(query: Option<&str>) -> Self {
        match query {
            Some("available") => ProductFilter::Status(true),
            Some("unavailable") => ProductFilter::Status(false),
            Some(value) if !value.trim().is_empty() => ProductFilter::Category(value.to_string()),
            _ => ProductFilter::All,
        }
    }

    /// Checks a product against the filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::Status(status) => product.status == *status,
            ProductFilter::Category(category) => product.category == *category,
        }
    }
}

/// Price ordering for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSort {
    Ascending,
    Descending,
    /// Store order; no price sort applied.
    #[default]
    Natural,
}

impl PriceSort {
    /// Derives the sort from the raw `sort` parameter.
    pub fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("asc") => PriceSort::Ascending,
            Some("desc") => PriceSort::Descending,
            _ => PriceSort::Natural,
        }
    }
}

// =============================================================================
// Page Request
// =============================================================================

/// One-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Number of matching records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// `ceil(total_docs / limit)`; zero when nothing matches.
    pub fn total_pages(&self, total_docs: u64) -> u32 {
        let limit = u64::from(self.limit.max(1));
        u32::try_from(total_docs.div_ceil(limit)).unwrap_or(u32::MAX)
    }
}

/// A fully derived list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub filter: ProductFilter,
    pub sort: PriceSort,
    pub page: PageRequest,
    /// `sort` as received, echoed into navigation links.
    pub raw_sort: Option<String>,
    /// `query` as received, echoed into navigation links.
    pub raw_query: Option<String>,
}

impl CatalogQuery {
    /// Derives filter, sort and page from raw parameters.
    pub fn from_params(params: &PageParams, defaults: PageDefaults) -> Self {
        let limit = parse_positive(params.limit.as_deref(), defaults.page_size)
            .min(defaults.max_page_size.max(1));
        let page = parse_positive(params.page.as_deref(), DEFAULT_PAGE);

        CatalogQuery {
            filter: ProductFilter::from_query(params.query.as_deref()),
            sort: PriceSort::from_param(params.sort.as_deref()),
            page: PageRequest { page, limit },
            raw_sort: params.sort.clone(),
            raw_query: params.query.clone(),
        }
    }

    /// Runs filter → sort → slice over an in-memory sequence.
    ///
    /// The slice order of `products` is taken as the natural order, and
    /// price ties keep it. Returns the page plus the total match count.
    pub fn apply(&self, products: &[Product]) -> (Vec<Product>, u64) {
        let mut matching: Vec<&Product> =
            products.iter().filter(|p| self.filter.matches(p)).collect();

        match self.sort {
            PriceSort::Ascending => matching.sort_by_key(|p| p.price_cents),
            PriceSort::Descending => matching.sort_by_key(|p| std::cmp::Reverse(p.price_cents)),
            PriceSort::Natural => {}
        }

        let total = matching.len() as u64;
        let skip = usize::try_from(self.page.offset()).unwrap_or(usize::MAX);
        let take = self.page.limit as usize;

        let page = matching.into_iter().skip(skip).take(take).cloned().collect();
        (page, total)
    }
}

// =============================================================================
// Page Result
// =============================================================================

/// The envelope describing one page of a filtered, sorted catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageResult {
    pub payload: Vec<Product>,
    pub total_docs: u64,
    pub limit: u32,
    pub total_pages: u32,
    pub page: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
    pub sort: Option<String>,
    pub query: Option<String>,
}

impl PageResult {
    /// Shapes a fetched page into the envelope.
    ///
    /// `link_base` is the list endpoint (e.g. `http://localhost:8080/api/products`);
    /// links are only synthesized for pages that exist by the flags below.
    ///
    /// ## Flags
    /// - `hasPrevPage`: `page > 1` (an out-of-range page still points back)
    /// - `hasNextPage`: `page < totalPages`
    pub fn build(payload: Vec<Product>, total_docs: u64, query: &CatalogQuery, link_base: &str) -> Self {
        let PageRequest { page, limit } = query.page;
        let total_pages = query.page.total_pages(total_docs);

        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        let prev_page = has_prev_page.then(|| page - 1);
        let next_page = has_next_page.then(|| page + 1);

        let link = |target: u32| page_link(link_base, target, limit, query);

        PageResult {
            payload,
            total_docs,
            limit,
            total_pages,
            page,
            prev_page,
            next_page,
            has_prev_page,
            has_next_page,
            prev_link: prev_page.map(link),
            next_link: next_page.map(link),
            sort: query.raw_sort.clone(),
            query: query.raw_query.clone(),
        }
    }
}

/// Builds a navigation link preserving `limit`, `sort` and `query`.
///
/// Absent `sort`/`query` are written as empty values.
pub fn page_link(base: &str, page: u32, limit: u32, query: &CatalogQuery) -> String {
    let sort = query.raw_sort.as_deref().unwrap_or("");
    let q = query.raw_query.as_deref().unwrap_or("");

    format!(
        "{base}?page={page}&limit={limit}&sort={}&query={}",
        urlencoding::encode(sort),
        urlencoding::encode(q)
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    const BASE: &str = "http://localhost:8080/api/products";

    fn product(n: usize, price_cents: i64, category: &str, status: bool) -> Product {
        let now = Utc::now();
        Product {
            id: format!("p-{n}"),
            title: format!("Product {n}"),
            description: String::new(),
            price_cents,
            code: format!("CODE-{n}"),
            stock: 1,
            category: category.to_string(),
            status,
            thumbnails: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn params(limit: &str, page: &str, sort: Option<&str>, query: Option<&str>) -> PageParams {
        PageParams {
            limit: Some(limit.to_string()),
            page: Some(page.to_string()),
            sort: sort.map(str::to_string),
            query: query.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_positive_falls_back() {
        assert_eq!(parse_positive(Some("12"), 10), 12);
        assert_eq!(parse_positive(Some(" +3"), 10), 3);
        assert_eq!(parse_positive(Some("abc"), 10), 10);
        assert_eq!(parse_positive(Some(""), 10), 10);
        assert_eq!(parse_positive(Some("-5"), 1), 1);
        assert_eq!(parse_positive(Some("99999999999999999999"), 1), u32::MAX);
    }

    #[test]
    fn test_filter_derivation() {
        assert_eq!(ProductFilter::from_query(Some("available")), ProductFilter::Status(true));
        assert_eq!(ProductFilter::from_query(Some("unavailable")), ProductFilter::Status(false));
        assert_eq!(
            ProductFilter::from_query(Some("electronics")),
            ProductFilter::Category("electronics".to_string())
        );
        assert_eq!(ProductFilter::from_query(Some("   ")), ProductFilter::All);
        assert_eq!(ProductFilter::from_query(Some("")), ProductFilter::All);
        assert_eq!(ProductFilter::from_query(None), ProductFilter::All);
    }

    #[test]
    fn test_sort_derivation() {
        assert_eq!(PriceSort::from_param(Some("asc")), PriceSort::Ascending);
        assert_eq!(PriceSort::from_param(Some("desc")), PriceSort::Descending);
        assert_eq!(PriceSort::from_param(Some("ASC")), PriceSort::Natural);
        assert_eq!(PriceSort::from_param(None), PriceSort::Natural);
    }

    #[test]
    fn test_defaults_and_clamp() {
        let query = CatalogQuery::from_params(&PageParams::default(), PageDefaults::default());
        assert_eq!(query.page, PageRequest { page: 1, limit: 10 });
        assert_eq!(query.filter, ProductFilter::All);
        assert_eq!(query.sort, PriceSort::Natural);

        let query = CatalogQuery::from_params(&params("5000", "2", None, None), PageDefaults::default());
        assert_eq!(query.page.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_apply_filters_sorts_and_slices() {
        let catalog = vec![
            product(0, 500, "tools", true),
            product(1, 100, "toys", false),
            product(2, 300, "tools", true),
            product(3, 200, "tools", false),
        ];

        let query = CatalogQuery::from_params(&params("2", "1", Some("asc"), Some("tools")), PageDefaults::default());
        let (page, total) = query.apply(&catalog);
        assert_eq!(total, 3);
        assert_eq!(page.iter().map(|p| p.price_cents).collect::<Vec<_>>(), vec![200, 300]);

        let query = CatalogQuery::from_params(&params("10", "1", Some("desc"), Some("available")), PageDefaults::default());
        let (page, total) = query.apply(&catalog);
        assert_eq!(total, 2);
        assert_eq!(page.iter().map(|p| p.price_cents).collect::<Vec<_>>(), vec![500, 300]);

        let query = CatalogQuery::from_params(&params("10", "1", None, None), PageDefaults::default());
        let (page, _) = query.apply(&catalog);
        assert_eq!(page.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["p-0", "p-1", "p-2", "p-3"]);
    }

    #[test]
    fn test_links_preserve_parameters() {
        let query = CatalogQuery::from_params(&params("2", "2", Some("asc"), Some("home & garden")), PageDefaults::default());
        let result = PageResult::build(Vec::new(), 6, &query, BASE);

        assert_eq!(result.total_pages, 3);
        assert_eq!(result.prev_page, Some(1));
        assert_eq!(result.next_page, Some(3));
        assert_eq!(
            result.prev_link.as_deref(),
            Some("http://localhost:8080/api/products?page=1&limit=2&sort=asc&query=home%20%26%20garden")
        );
        assert_eq!(
            result.next_link.as_deref(),
            Some("http://localhost:8080/api/products?page=3&limit=2&sort=asc&query=home%20%26%20garden")
        );
    }

    #[test]
    fn test_links_render_absent_parameters_empty() {
        let query = CatalogQuery::from_params(&params("1", "1", None, None), PageDefaults::default());
        let result = PageResult::build(Vec::new(), 2, &query, BASE);

        assert!(!result.has_prev_page);
        assert!(result.prev_link.is_none());
        assert_eq!(
            result.next_link.as_deref(),
            Some("http://localhost:8080/api/products?page=2&limit=1&sort=&query=")
        );
    }

    #[test]
    fn test_out_of_range_page() {
        let query = CatalogQuery::from_params(&params("10", "7", None, None), PageDefaults::default());
        let result = PageResult::build(Vec::new(), 25, &query, BASE);

        assert_eq!(result.total_pages, 3);
        assert!(!result.has_next_page);
        assert!(result.next_link.is_none());
        assert!(result.has_prev_page);
        assert_eq!(result.prev_page, Some(6));
    }

    #[test]
    fn test_empty_catalog() {
        let query = CatalogQuery::from_params(&PageParams::default(), PageDefaults::default());
        let result = PageResult::build(Vec::new(), 0, &query, BASE);

        assert_eq!(result.total_pages, 0);
        assert!(!result.has_prev_page);
        assert!(!result.has_next_page);
    }

    proptest! {
        #[test]
        fn prop_page_flags_are_consistent(
            total in 0usize..120,
            limit in 1u32..30,
            page in 1u32..20,
            sort in prop_oneof![Just(None), Just(Some("asc")), Just(Some("desc"))],
        ) {
            let catalog: Vec<Product> = (0..total)
                .map(|n| product(n, ((n * 37) % 11) as i64 * 100, "c", n % 2 == 0))
                .collect();

            let query = CatalogQuery::from_params(
                &params(&limit.to_string(), &page.to_string(), sort, None),
                PageDefaults::default(),
            );
            let (docs, total_docs) = query.apply(&catalog);
            let result = PageResult::build(docs, total_docs, &query, BASE);

            let expected_pages = (total as u32).div_ceil(limit);
            prop_assert_eq!(result.total_pages, expected_pages);
            prop_assert!(result.payload.len() <= limit as usize);
            prop_assert_eq!(result.has_prev_page, page > 1);
            prop_assert_eq!(result.has_next_page, page < expected_pages);
            prop_assert_eq!(result.prev_link.is_some(), result.has_prev_page);
            prop_assert_eq!(result.next_link.is_some(), result.has_next_page);

            if page > expected_pages {
                prop_assert!(result.payload.is_empty());
            }

            let prices: Vec<i64> = result.payload.iter().map(|p| p.price_cents).collect();
            match query.sort {
                PriceSort::Ascending => prop_assert!(prices.windows(2).all(|w| w[0] <= w[1])),
                PriceSort::Descending => prop_assert!(prices.windows(2).all(|w| w[0] >= w[1])),
                PriceSort::Natural => {}
            }
        }
    }
}
