use actix_web::web;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw `page`/`pageSize` query parameters.
///
/// Parsing is deliberately lenient: a missing, non-numeric, or non-positive
/// value silently falls back to the default instead of producing a 400.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-based). Defaults to 1.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    /// Number of rows per page. Defaults to 10, maximum 100.
    #[serde(default, rename = "pageSize", deserialize_with = "lenient_i64")]
    pub page_size: Option<i64>,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v > 0))
}

impl PageQuery {
    /// Resolved (page, pageSize) with defaults applied and pageSize capped.
    pub fn resolve(&self) -> (i64, i64) {
        (
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        )
    }
}

/// SQL offset for a 1-based page. Saturates so arbitrarily large page
/// numbers cannot overflow the multiplication.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Paginated {
            data,
            pagination: Pagination {
                total,
                page,
                page_size,
                total_pages: total_pages(total, page_size),
            },
        }
    }
}

/// Ceiling division without the `total + page_size - 1` intermediate, which
/// can overflow for degenerate but parseable page sizes.
fn total_pages(total: i64, page_size: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total - 1) / page_size + 1
    }
}

/// Run a page fetch and a total-count fetch concurrently and shape the
/// combined result into the paginated envelope.
///
/// Each closure acquires its own pooled connection, so the two queries
/// execute on separate database sessions; the envelope is built only after
/// both complete. Either failure surfaces as a generic server error.
pub async fn fetch_page<T, F, C>(
    page: i64,
    page_size: i64,
    rows: F,
    total: C,
) -> Result<Paginated<T>, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<Vec<T>, AppError> + Send + 'static,
    C: FnOnce() -> Result<i64, AppError> + Send + 'static,
{
    let (rows, total) = tokio::try_join!(web::block(rows), web::block(total))?;
    Ok(Paginated::new(rows?, total?, page, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    fn parse(query: &str) -> (i64, i64) {
        Query::<PageQuery>::from_query(query)
            .expect("query should always parse")
            .resolve()
    }

    #[test]
    fn missing_params_use_defaults() {
        assert_eq!(parse(""), (1, 10));
    }

    #[test]
    fn explicit_params_are_used() {
        assert_eq!(parse("page=3&pageSize=25"), (3, 25));
    }

    #[test]
    fn page_zero_falls_back_to_one() {
        assert_eq!(parse("page=0&pageSize=10"), (1, 10));
    }

    #[test]
    fn non_numeric_params_fall_back_to_defaults() {
        assert_eq!(parse("page=abc&pageSize=xyz"), (1, 10));
    }

    #[test]
    fn negative_params_fall_back_to_defaults() {
        assert_eq!(parse("page=-2&pageSize=-1"), (1, 10));
    }

    #[test]
    fn page_size_is_capped() {
        assert_eq!(parse("pageSize=101"), (1, 100));
        assert_eq!(parse("pageSize=9223372036854775807"), (1, 100));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn total_pages_handles_wide_totals() {
        let total = (1_i64 << 31) + 7;
        assert_eq!(total_pages(total, 10), (total + 9) / 10);
    }

    #[test]
    fn total_pages_does_not_overflow_on_huge_page_size() {
        assert_eq!(total_pages(2, i64::MAX), 1);
        let page = Paginated::new(vec![1, 2], 2, 1, i64::MAX);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn page_offset_saturates() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(i64::MAX, 100), i64::MAX);
    }

    #[test]
    fn envelope_reflects_inputs() {
        let page = Paginated::new(vec![1, 2, 3], 25, 2, 3);
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.page_size, 3);
        assert_eq!(page.pagination.total_pages, 9);
    }

    #[test]
    fn wide_total_serializes_as_plain_number() {
        let total = (1_i64 << 31) + 7;
        let page = Paginated::<i32>::new(vec![], total, 1, 10);
        let json = serde_json::to_value(&page).expect("serialize");
        assert_eq!(json["pagination"]["total"], serde_json::json!(total));
    }
}
