//! Page-number pagination.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use url::Url;

use crate::error::AppError;

/// Page size used when `limit` is absent.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest accepted `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `limit`: 10
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for page 0 and [`AppError::Validation`]
    /// if `limit` is outside `1..=100`.
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), AppError> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err(invalid_page(page));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                "Invalid page size",
                json!({ "limit": [format!("Must be between 1 and {}", MAX_PAGE_SIZE)] }),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);
        Ok((offset, i64::from(page_size)))
    }
}

/// Paginated list response.
///
/// ```json
/// { "count": 12, "next": "http://host/api/recipes?page=3", "previous": "http://host/api/recipes?page=1", "results": [] }
/// ```
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps one page of results.
    ///
    /// `request_url` is the absolute URL of the current request; `next` and
    /// `previous` are derived from it by replacing the `page` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the requested page lies past the
    /// last one. The first page always exists, even when empty.
    pub fn new(
        results: Vec<T>,
        count: i64,
        params: &PaginationParams,
        request_url: &str,
    ) -> Result<Self, AppError> {
        let page = params.page();
        let page_size = i64::from(params.page_size().max(1));
        let last_page = ((count + page_size - 1) / page_size).max(1);

        if i64::from(page) > last_page {
            return Err(invalid_page(page));
        }

        let base = Url::parse(request_url).map_err(|e| {
            tracing::warn!(error = %e, url = request_url, "Unparseable request URL");
            AppError::bad_request("Invalid request URL", json!({}))
        })?;

        let next = (i64::from(page) < last_page).then(|| page_url(&base, Some(page + 1)));
        let previous = match page {
            0 | 1 => None,
            2 => Some(page_url(&base, None)),
            p => Some(page_url(&base, Some(p - 1))),
        };

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn invalid_page(page: u32) -> AppError {
    AppError::not_found("Invalid page", json!({ "page": page }))
}

/// Copy of `base` with `page` set, or removed when `None`.
fn page_url(base: &Url, page: Option<u32>) -> String {
    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);

    if !pairs.is_empty() || page.is_some() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if let Some(page) = page {
            query.append_pair("page", &page.to_string());
        }
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, limit: Option<u32>) -> PaginationParams {
        PaginationParams { page, limit }
    }

    const URL: &str = "http://localhost:8000/api/recipes";

    #[test]
    fn test_defaults() {
        let (offset, limit) = params(None, None).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(limit, 10);
    }

    #[test]
    fn test_custom_page_and_limit() {
        let (offset, limit) = params(Some(3), Some(6)).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 12);
        assert_eq!(limit, 6);
    }

    #[test]
    fn test_page_zero_is_not_found() {
        let err = params(Some(0), None).validate_and_get_offset_limit().unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_limit_bounds() {
        assert!(params(None, Some(0)).validate_and_get_offset_limit().is_err());
        assert!(params(None, Some(1)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(100)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(101)).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_query_strings_parse_as_numbers() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "2", "limit": "5"}"#).unwrap();
        assert_eq!(p.page, Some(2));
        assert_eq!(p.limit, Some(5));
    }

    #[test]
    fn test_single_page_has_no_links() {
        let page = Page::new(vec![1, 2], 2, &params(None, None), URL).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_empty_first_page_exists() {
        let page = Page::<i32>::new(vec![], 0, &params(None, None), URL).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_next_link_keeps_other_params() {
        let url = "http://localhost:8000/api/recipes?author=3&limit=2";
        let page = Page::new(vec![1, 2], 5, &params(None, Some(2)), url).unwrap();
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8000/api/recipes?author=3&limit=2&page=2")
        );
    }

    #[test]
    fn test_previous_link_of_second_page_drops_page() {
        let url = "http://localhost:8000/api/recipes?page=2&limit=2";
        let page = Page::new(vec![3, 4], 5, &params(Some(2), Some(2)), url).unwrap();
        assert_eq!(
            page.previous.as_deref(),
            Some("http://localhost:8000/api/recipes?limit=2")
        );
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8000/api/recipes?limit=2&page=3")
        );
    }

    #[test]
    fn test_previous_link_without_other_params() {
        let url = "http://localhost:8000/api/users?page=2";
        let page = Page::new(vec![1], 11, &params(Some(2), None), url).unwrap();
        assert_eq!(page.previous.as_deref(), Some("http://localhost:8000/api/users"));
    }

    #[test]
    fn test_page_past_the_end_is_not_found() {
        let err = Page::new(Vec::<i32>::new(), 5, &params(Some(2), None), URL).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_map_keeps_links() {
        let url = "http://localhost:8000/api/users?limit=1";
        let page = Page::new(vec![1], 3, &params(None, Some(1)), url)
            .unwrap()
            .map(|n| n * 10);
        assert_eq!(page.results, vec![10]);
        assert!(page.next.is_some());
    }
}
