use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://data.geo.admin.ch/api/stac/v0.9";
pub const DEFAULT_CACHE_DIR: &str = "_geodatacache";

/// Settings shared by every call made through [`crate::StacApi`].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StacConfig {
    pub base_url: String,
    pub cache_dir: PathBuf,
    /// Maximum number of item pages to fetch per collection, 0 means no limit.
    pub page_limit: usize,
    pub use_cache: bool,
    pub verbose: bool,
}

impl Default for StacConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            page_limit: 0,
            use_cache: true,
            verbose: true,
        }
    }
}

impl StacConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_table(table: &toml::Table) -> Result<Self> {
        let config: Self = toml::from_str(&table.to_string())?;
        Ok(config)
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn collections_url(&self) -> String {
        format!("{}/collections", self.base())
    }

    pub fn items_url(&self, collection_id: &str) -> String {
        format!("{}/collections/{collection_id}/items", self.base())
    }
}
