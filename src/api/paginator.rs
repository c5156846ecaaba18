use futures::stream::{self, Stream};
use reqwest::Method;
use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::Query;
use crate::error::Result;
use crate::models::envelope::json_u64;

/// Page counters reported by the API under `paging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

impl Paging {
    /// Reads `paging.current` / `paging.total` from a page fetched as `requested`.
    ///
    /// Missing or malformed counters never fail: `total` falls back to 1 and
    /// `current` to the requested page. `current` is never taken below the
    /// requested page, so the walk always advances toward `total`.
    pub fn from_page(data: &Value, requested: u32) -> Self {
        let counter = |name: &str| {
            data.get("paging")
                .and_then(|p| p.get(name))
                .and_then(json_u64)
                .filter(|&n| n > 0)
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        };

        Self {
            current: counter("current").unwrap_or(requested).max(requested),
            total: counter("total").unwrap_or(1),
        }
    }

    pub fn is_last(&self) -> bool {
        self.current >= self.total
    }
}

pub(crate) fn paginate<'a>(
    client: &'a ApiClient,
    path: &'a str,
    query: Query,
) -> impl Stream<Item = Result<(u32, Value)>> + 'a {
    let base: Query = query.into_iter().filter(|(k, _)| k != "page").collect();

    stream::try_unfold(Some(1u32), move |next| {
        let mut page_query = base.clone();
        async move {
            let Some(page) = next else {
                return Ok(None);
            };

            page_query.push(("page".to_string(), page.to_string()));
            tracing::debug!("Fetching {} page {}", path, page);
            let data = client.request(Method::GET, path, &page_query).await?;

            let paging = Paging::from_page(&data, page);
            let next = if paging.is_last() {
                None
            } else {
                Some(page + 1)
            };
            Ok(Some(((page, data), next)))
        }
    })
}
