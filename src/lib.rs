pub mod api;
pub mod collect;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::ApiClient;
pub use collect::CollectionPipeline;
pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use storage::JsonStore;
