use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};

use crate::error::Result;

pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Status and body of one HTTP exchange, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs exactly one request. Retrying is the caller's business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse>;
}

/// reqwest-backed transport. The inner `Client` keeps its connection pool
/// alive for as long as the transport lives.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(api_key)?)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

pub(crate) fn default_headers(api_key: &str) -> Result<header::HeaderMap> {
    let mut key = header::HeaderValue::from_str(api_key)?;
    key.set_sensitive(true);

    let mut headers = header::HeaderMap::new();
    headers.insert(API_KEY_HEADER, key);
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(headers)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse> {
        tracing::debug!("{} {} {:?}", method, url, query);
        let response = self.client.request(method, url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers("abc123").unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "abc123");
        assert!(headers.get(API_KEY_HEADER).unwrap().is_sensitive());
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_rejects_unprintable_key() {
        assert!(default_headers("bad\nkey").is_err());
    }

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(200, "{}").is_success());
        assert!(RawResponse::new(299, "{}").is_success());
        assert!(!RawResponse::new(300, "").is_success());
        assert!(!RawResponse::new(429, "").is_success());
    }
}
