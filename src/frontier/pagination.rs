//! Paged index URL construction

use crate::config::Pagination;
use url::Url;

/// Hard multiplier applied to `max_pages` when pagination is exhausted, so a
/// site that never yields an empty page cannot keep the run going forever.
const EXHAUST_PAGE_MULTIPLIER: u32 = 50;

/// Builds the URL for one index page by setting `param=page` as a query pair
///
/// Existing query pairs on the base URL are preserved.
pub fn page_url(base: &str, param: &str, page: u32) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair(param, &page.to_string());
    Ok(url.into())
}

/// Number of index pages the frontier may visit for this policy
///
/// With `exhaust` set the configured bound is widened but not removed;
/// `stop_on_empty` remains the intended stopping rule in that mode.
pub fn page_limit(paginate: &Pagination, exhaust: bool) -> u32 {
    if exhaust {
        paginate.max_pages.saturating_mul(EXHAUST_PAGE_MULTIPLIER)
    } else {
        paginate.max_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_pages: u32) -> Pagination {
        Pagination {
            mode: "query".to_string(),
            param: "page".to_string(),
            start: 1,
            max_pages,
            stop_on_empty: true,
        }
    }

    #[test]
    fn test_page_url_plain_base() {
        let url = page_url("https://example.test/list", "page", 3).unwrap();
        assert_eq!(url, "https://example.test/list?page=3");
    }

    #[test]
    fn test_page_url_preserves_existing_query() {
        let url = page_url("https://example.test/list?sort=new", "p", 2).unwrap();
        assert_eq!(url, "https://example.test/list?sort=new&p=2");
    }

    #[test]
    fn test_page_url_invalid_base() {
        assert!(page_url("not a url", "page", 1).is_err());
    }

    #[test]
    fn test_page_limit_default() {
        assert_eq!(page_limit(&policy(10), false), 10);
    }

    #[test]
    fn test_page_limit_exhaust_is_bounded() {
        assert_eq!(page_limit(&policy(10), true), 500);
        assert_eq!(page_limit(&policy(u32::MAX), true), u32::MAX);
    }
}
