use crate::download::{download, ConsoleProgress, DownloadOutcome};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DownloadTask {
    href: String,
    output: PathBuf,
}

impl DownloadTask {
    pub fn new(href: &str, output: &Path) -> Self {
        DownloadTask {
            href: href.to_string(),
            output: output.to_path_buf(),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct DownloadPlan {
    tasks: Vec<DownloadTask>,
}

impl DownloadPlan {
    pub fn new(tasks: Vec<DownloadTask>) -> Self {
        Self { tasks }
    }

    /// One task per href, each written to `output_dir` under the href's last path segment.
    pub fn from_hrefs<P: AsRef<Path>>(hrefs: &[String], output_dir: P) -> Result<Self> {
        let tasks = hrefs
            .iter()
            .map(|href| {
                let file_name = file_name_from_href(href)?;
                Ok(DownloadTask::new(href, &output_dir.as_ref().join(file_name)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[DownloadTask] {
        &self.tasks
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let plan: Self = serde_json::from_str(&content)?;
        Ok(plan)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub async fn execute(
        &self,
        client: &reqwest::Client,
        overwrite: bool,
    ) -> Result<Vec<DownloadOutcome>> {
        let mut outcomes = vec![];
        for task in self.tasks.iter() {
            info!("Current task: {:?}", task);
            let mut progress = ConsoleProgress::new();
            let outcome =
                download(client, &task.href, &task.output, overwrite, &mut progress).await?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

fn file_name_from_href(href: &str) -> Result<String> {
    let url = Url::parse(href)?;
    let file_name = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .ok_or(anyhow!("No file name in href: {}", href))?;
    Ok(file_name.to_string())
}
