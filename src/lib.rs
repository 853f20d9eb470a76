pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{http::PokeApiClient, storage::LocalStorage};
pub use core::{
    batch_fetcher::{BatchFetcher, RetryPolicy},
    catalog::{CatalogService, RequestTracker},
    engine::CatalogEngine,
    pipeline::CatalogPipeline,
};
pub use utils::error::{CatalogError, Result};
