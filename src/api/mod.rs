pub mod client;
pub mod paginator;
pub mod retry;
pub mod transport;

pub use client::ApiClient;
pub use paginator::Paging;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, RawResponse, Transport};

/// Owned query parameters, in the order they are sent.
pub type Query = Vec<(String, String)>;

pub(crate) fn to_query(pairs: &[(&str, String)]) -> Query {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
