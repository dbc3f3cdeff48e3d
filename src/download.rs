//! Streams a remote file to disk, reporting progress per 16 KiB chunk.
use crate::error::StacError;
use anyhow::Result;
use futures_util::TryStreamExt;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const CHUNK_SIZE: usize = 16 * 1024;

const UNKNOWN_SIZE_NOTICE: &str = "Downloading please wait... (filesize unknown)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Skipped,
    Completed { bytes: u64 },
}

pub trait DownloadProgress {
    fn start(&mut self, total: Option<u64>);

    fn chunk(&mut self, written: u64, total: Option<u64>);

    fn finish(&mut self, written: u64);
}

/// Integer percentage of `written` over `total`, clamped to 100.
pub fn percent_complete(written: u64, total: u64) -> u64 {
    if total == 0 {
        return 100;
    }
    (written.saturating_mul(100) / total).min(100)
}

/// Terminal progress bar in the form `42% done [*****-----]`.
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks progress without drawing anything.
    pub fn hidden() -> Self {
        Self {
            bar: None,
            hidden: true,
        }
    }
}

impl DownloadProgress for ConsoleProgress {
    fn start(&mut self, total: Option<u64>) {
        let bar = match total {
            Some(_) => {
                let bar = ProgressBar::new(100);
                if let Ok(style) = ProgressStyle::with_template("{pos}% done \t[{bar:100}]") {
                    bar.set_style(style.progress_chars("*-"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_message(UNKNOWN_SIZE_NOTICE);
                bar
            }
        };
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        self.bar = Some(bar);
    }

    fn chunk(&mut self, written: u64, total: Option<u64>) {
        if let Some(bar) = &self.bar {
            match total {
                Some(total) => bar.set_position(percent_complete(written, total)),
                None => bar.tick(),
            }
        }
    }

    fn finish(&mut self, _written: u64) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

/// Downloads `url` into `destination`.
///
/// An existing destination is left untouched unless `overwrite` is set. A stream failure aborts
/// the transfer and leaves the partially written file in place.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    overwrite: bool,
    progress: &mut impl DownloadProgress,
) -> Result<DownloadOutcome> {
    if destination.exists() && !overwrite {
        info!("{} already exists, not overwriting", destination.display());
        return Ok(DownloadOutcome::Skipped);
    }

    info!("Downloading {} from {url}", destination.display());
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(StacError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let total = response.content_length();
    let mut file = File::create(destination)?;
    progress.start(total);

    let mut written = 0_u64;
    let mut pending: Vec<u8> = Vec::with_capacity(CHUNK_SIZE);
    let mut stream = response.bytes_stream();
    while let Some(bytes) = stream.try_next().await? {
        pending.extend_from_slice(&bytes);
        while pending.len() >= CHUNK_SIZE {
            let chunk: Vec<u8> = pending.drain(..CHUNK_SIZE).collect();
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
            progress.chunk(written, total);
        }
    }
    if !pending.is_empty() {
        file.write_all(&pending)?;
        written += pending.len() as u64;
        progress.chunk(written, total);
    }
    file.flush()?;

    progress.finish(written);
    info!("Download complete, {written} bytes written");

    Ok(DownloadOutcome::Completed { bytes: written })
}
