use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use reqwest::Method;
use serde_json::Value;
use tokio::time::sleep;

use crate::api::paginator::paginate;
use crate::api::retry::RetryPolicy;
use crate::api::transport::{HttpTransport, RawResponse, Transport};
use crate::api::{to_query, Query};
use crate::error::{Error, Result};

/// Client for the API-Football v3 endpoints.
///
/// Every call goes through the retry loop: transient statuses (429 and the
/// gateway 5xx family) and network failures are retried with exponential
/// backoff, anything else fails immediately.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = HttpTransport::new(api_key, timeout)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            base_url,
            RetryPolicy::default(),
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        base_url: &str,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// GET `base_url + path` and parse the body as JSON.
    pub async fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, path, &to_query(query)).await
    }

    /// Lazily walks `path` page by page, starting at page 1 on every call.
    pub fn fetch_paginated<'a>(
        &'a self,
        path: &'a str,
        query: &[(&str, String)],
    ) -> impl Stream<Item = Result<(u32, Value)>> + 'a {
        paginate(self, path, to_query(query))
    }

    pub async fn request(&self, method: Method, path: &str, query: &Query) -> Result<Value> {
        let response = self.send_with_retry(method, path, query).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        query: &Query,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match self.transport.send(method.clone(), &url, query).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => Error::Http {
                    status: response.status,
                    path: path.to_string(),
                    body: response.body,
                },
                Err(e) => e,
            };

            if !failure.is_retryable() || !self.retry.should_retry(attempt) {
                return Err(failure);
            }

            let wait = self.retry.delay_for(attempt);
            tracing::warn!(
                "[retry] {} {} params={:?} status={} attempt={}/{}, waiting {:.1}s",
                method,
                path,
                query,
                failure
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "network".to_string()),
                attempt,
                self.retry.max_retries,
                wait.as_secs_f64()
            );
            sleep(wait).await;
        }
    }
}
