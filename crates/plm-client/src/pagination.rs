//! Cursor-based pagination over store listings.
//!
//! The store returns a page key with each non-empty page; the key is echoed
//! on the next call. The server signals the end of a listing by returning an
//! empty page.

use crate::traits::StoreResult;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor to echo on the next call, if the server returned one.
    pub next_page_key: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_page_key: None,
        }
    }
}

/// Drains a paginated listing.
///
/// Keeps calling `fetch` with the cursor returned by the previous page until
/// a call returns an empty page, then returns the concatenation of all pages
/// in call order.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> StoreResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = StoreResult<Page<T>>>,
{
    let mut all = Vec::new();
    let mut cursor = None;
    loop {
        let page = fetch(cursor).await?;
        if page.items.is_empty() {
            return Ok(all);
        }
        cursor = page.next_page_key;
        all.extend(page.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(items: &[u32], next: Option<&str>) -> Page<u32> {
        Page {
            items: items.to_vec(),
            next_page_key: next.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_collect_pages_concatenates_in_call_order() {
        let pages = vec![
            page(&[1, 2], Some("2")),
            page(&[3, 4], Some("4")),
            page(&[], None),
        ];
        let calls = AtomicUsize::new(0);

        let all = collect_pages(|cursor| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let expected_cursor = match n {
                0 => None,
                1 => Some("2".to_string()),
                _ => Some("4".to_string()),
            };
            assert_eq!(cursor, expected_cursor);
            let page = pages[n].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(all, vec![1, 2, 3, 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_immediately_empty_listing() {
        let all = collect_pages(|_| async { Ok(Page::<u32>::empty()) })
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result = collect_pages(|_| async {
            Err::<Page<u32>, _>(StoreError::RequestFailed("boom".to_string()))
        })
        .await;
        assert!(matches!(result, Err(StoreError::RequestFailed(_))));
    }
}
