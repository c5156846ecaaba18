use thiserror::Error;

use crate::api::retry::is_transient;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP {status} from {path}: {body}")]
    Http {
        status: u16,
        path: String,
        body: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Transient statuses, plus network failures that a later attempt can
    /// get past. Builder, redirect and body-decoding errors are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http { status, .. } => is_transient(*status),
            Error::Network(e) => {
                !e.is_builder() && (e.is_connect() || e.is_timeout() || e.is_request())
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
