//! Single level on-disk cache of raw JSON responses, keyed by the MD5 of the request URL.
use crate::error::StacError;
use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key(url: &str) -> String {
        format!("{:x}", md5::compute(url.as_bytes()))
    }

    pub fn path(&self, url: &str) -> PathBuf {
        self.dir.join(Self::key(url))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.path(url).exists()
    }

    /// Returns the parsed JSON document behind `url`, served from disk when `use_cache` is set
    /// and an entry exists. Fresh responses are written verbatim when `use_cache` is set.
    pub async fn fetch(
        &self,
        client: &reqwest::Client,
        url: &str,
        use_cache: bool,
        verbose: bool,
    ) -> Result<Value> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path(url);
        if use_cache && path.exists() {
            log(verbose, &format!("cache hit {}", Self::key(url)));
            let content = fs::read_to_string(&path)?;
            let result: Value = serde_json::from_str(&content)?;
            return Ok(result);
        }

        if use_cache {
            log(verbose, &format!("Downloading and caching {url}"));
        } else {
            log(verbose, &format!("Downloading {url}"));
        }

        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StacError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        let body = response.bytes().await?;

        if use_cache {
            fs::write(&path, &body)?;
        }
        let result: Value = serde_json::from_slice(&body)?;

        Ok(result)
    }
}

fn log(verbose: bool, message: &str) {
    if verbose {
        info!("{message}");
    } else {
        debug!("{message}");
    }
}
