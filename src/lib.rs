pub mod assets;
pub mod cache;
pub mod config;
pub mod download;
pub mod download_plan;
mod error;
pub mod models;
pub mod spatial;
pub mod stac_operations;
#[cfg(test)]
mod test_server;

pub use assets::{AssetRow, AssetTable};
pub use cache::DiskCache;
pub use config::StacConfig;
pub use download::{download, ConsoleProgress, DownloadOutcome, DownloadProgress};
pub use download_plan::{DownloadPlan, DownloadTask};
pub use error::StacError;
pub use models::{Asset, CollectionSummary, Feature};
pub use stac_operations::StacApi;
