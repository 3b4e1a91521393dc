//! Page-cursor traversal over paginated API endpoints.
//!
//! Listing endpoints return one page at a time together with the total
//! number of pages. [`collect_pages`] requests page 1, 2, ... strictly in
//! order and stops once the current page number reaches the `total_pages`
//! reported by the most recent response. Totals are re-read from every page
//! and never cached, so a shrinking total ends the traversal early.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ClientInner;
use crate::models::DateWindow;
use crate::{Error, Result};

/// A single page returned by a paginated endpoint.
///
/// Endpoints nest their lists under different fields, so each page type
/// names its own default extraction in [`into_items`](Page::into_items).
/// A traversal may override it with an explicit extraction function.
pub trait Page {
    /// Item type carried by the page.
    type Item;

    /// Total number of pages as reported by this response.
    fn total_pages(&self) -> u32;

    /// Consume the page, returning its items in response order.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Fetch pages starting at 1 until `page >= total_pages`, collecting the
/// items `extract` pulls out of each page.
///
/// The first error aborts the traversal and is returned as-is; items from
/// earlier pages are dropped.
pub(crate) async fn collect_pages<P, T, G, Fut, F>(mut fetch_page: G, mut extract: F) -> Result<Vec<T>>
where
    P: Page,
    G: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<P>>,
    F: FnMut(P) -> Vec<T>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let response = fetch_page(page).await?;
        let total_pages = response.total_pages();
        items.extend(extract(response));

        if page >= total_pages {
            break;
        }
        page += 1;
    }

    Ok(items)
}

/// Query string of a single page request: the caller's parameters plus the
/// page cursor.
#[derive(Serialize)]
struct PageQuery<'a, Q> {
    #[serde(flatten)]
    extra: &'a Q,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
}

/// Builder for an authenticated page-cursor traversal of one endpoint.
pub(crate) struct PageCursor<P> {
    inner: Arc<ClientInner>,
    path: String,
    window: Option<DateWindow>,
    page_size: Option<u32>,
    _marker: std::marker::PhantomData<P>,
}

impl<P: Page + DeserializeOwned> PageCursor<P> {
    /// Create a new cursor over `path`.
    pub(crate) fn new(inner: Arc<ClientInner>, path: impl Into<String>) -> Self {
        let page_size = inner.config.page_size;
        Self {
            inner,
            path: path.into(),
            window: None,
            page_size,
            _marker: std::marker::PhantomData,
        }
    }

    /// Name the date window being fetched, for error reporting.
    pub(crate) fn window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Traverse every page, collecting each page's default items.
    pub(crate) async fn collect<Q: Serialize>(self, query: &Q) -> Result<Vec<P::Item>> {
        self.collect_with(query, P::into_items).await
    }

    /// Traverse every page, extracting items with `extract`.
    ///
    /// Transport, status and decoding failures are reported as
    /// [`Error::Request`] naming the path and window. Authentication
    /// failures are returned unchanged.
    pub(crate) async fn collect_with<Q, T, F>(self, query: &Q, extract: F) -> Result<Vec<T>>
    where
        Q: Serialize,
        F: FnMut(P) -> Vec<T>,
    {
        let Self {
            inner,
            path,
            window,
            page_size,
            ..
        } = self;
        let inner = &inner;
        let path = path.as_str();

        collect_pages(
            |page| async move {
                tracing::debug!(path, page, "Fetching page");

                let page_query = PageQuery {
                    extra: query,
                    page,
                    page_size,
                };

                inner
                    .get_with_query::<P, _>(path, &page_query)
                    .await
                    .map_err(|err| match err {
                        Error::Authentication(_) => err,
                        other => Error::request(path, window, other),
                    })
            },
            extract,
        )
        .await
    }
}
