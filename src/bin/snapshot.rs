//! snapshot.rs
//!
//! Saves the four source pages as `<dir>/<slug>.html` so a later run can
//! replay them with `HEALTHSPEND_SNAPSHOT_DIR=<dir>`.

use anyhow::{Context, Result};
use healthspend::{
    config::Config,
    fetch::{sources, HttpFetcher, SnapshotFetcher},
};
use std::{env, path::PathBuf};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("snapshot"));
    fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("could not create `{}`", dir.display()))?;

    let config = Config::from_env();
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    for src in sources::all() {
        let html = fetcher.fetch_html(src).await?;
        let path = SnapshotFetcher::path_for(&dir, src);
        fs::write(&path, &html)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(source = %src.kind, bytes = html.len(), "saved {}", path.display());
    }
    Ok(())
}
