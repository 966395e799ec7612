// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::process::raw_table::RawTable;

pub mod sources;
pub mod table;

pub use sources::Source;
pub use table::parse_table;

/// Supplies the raw table for one source.
#[allow(async_fn_in_trait)]
pub trait TableFetcher {
    async fn fetch(&self, source: &Source) -> Result<RawTable>;
}

/// Scrapes the live pages.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// GET the page behind `source`; non-2xx is an error.
    pub async fn fetch_html(&self, source: &Source) -> Result<String> {
        let url = Url::parse(source.url).with_context(|| format!("bad URL {}", source.url))?;
        debug!("Fetching text from {}", url);
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .text()
            .await
            .with_context(|| format!("Reading text from {}", url))
    }
}

impl TableFetcher for HttpFetcher {
    async fn fetch(&self, source: &Source) -> Result<RawTable> {
        let html = self.fetch_html(source).await?;
        let raw = parse_table(&html, source.selector)
            .with_context(|| format!("parsing {} table from {}", source.kind, source.url))?;
        info!(source = %source.kind, rows = raw.rows.len(), "fetched");
        Ok(raw)
    }
}

/// Replays pages previously saved by the `snapshot` binary.
pub struct SnapshotFetcher {
    dir: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(dir: &Path, source: &Source) -> PathBuf {
        dir.join(format!("{}.html", source.slug))
    }
}

impl TableFetcher for SnapshotFetcher {
    async fn fetch(&self, source: &Source) -> Result<RawTable> {
        let path = Self::path_for(&self.dir, source);
        let html = fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let raw = parse_table(&html, source.selector)
            .with_context(|| format!("parsing {} table from {}", source.kind, path.display()))?;
        info!(source = %source.kind, rows = raw.rows.len(), path = %path.display(), "loaded snapshot");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SourceKind;
    use tempfile::tempdir;

    #[tokio::test]
    async fn snapshot_fetcher_reads_slug_file() -> Result<()> {
        let dir = tempdir()?;
        let src = sources::source(SourceKind::ObesityRate);
        let html = r#"<table class="wikitable plainrowheaders sortable sticky-header sort-under">
<tr><th>Country</th><th>Percentage of adults with obesity (BMI≥30)</th></tr>
<tr><th scope="row">Chile</th><td>28.0</td></tr>
</table>"#;
        std::fs::write(SnapshotFetcher::path_for(dir.path(), src), html)?;

        let raw = SnapshotFetcher::new(dir.path()).fetch(src).await?;
        assert_eq!(raw.rows, vec![vec!["Chile", "28.0"]]);
        Ok(())
    }

    #[tokio::test]
    async fn snapshot_fetcher_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let src = sources::source(SourceKind::Expenditure);
        let err = SnapshotFetcher::new(dir.path()).fetch(src).await.unwrap_err();
        assert!(format!("{:#}", err).contains("expenditure.html"));
    }
}
