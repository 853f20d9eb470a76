use crate::domain::model::{Catalog, CatalogExport, DetailRecord, Roster};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(&self, path: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn generation(&self) -> u32;
    fn batch_size(&self) -> usize;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn request_timeout(&self) -> Option<Duration>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;
}

/// Looks up the species roster of a generation.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_roster(&self, generation: u32) -> Result<Roster>;
}

/// Fetches a single detail record. Any `Err` counts as a failed attempt.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, identifier: &str) -> Result<DetailRecord>;
}

/// Suspends between retry attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Catalog>;
    async fn transform(&self, catalog: Catalog) -> Result<CatalogExport>;
    async fn load(&self, export: CatalogExport) -> Result<String>;
}
