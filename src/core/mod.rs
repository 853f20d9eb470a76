pub mod batch_fetcher;
pub mod catalog;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    BatchReport, Catalog, CatalogExport, DetailRecord, FetchOutcome, Roster, RosterEntry,
    SkippedItem,
};
pub use crate::domain::ports::{
    ConfigProvider, DetailSource, Pipeline, RosterSource, Sleeper, Storage,
};
pub use crate::utils::error::Result;
