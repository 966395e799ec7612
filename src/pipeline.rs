// src/pipeline.rs

use anyhow::{Context, Result};
use chrono::Utc;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::chart::{ChartView, Presenter};
use crate::export::{self, RunSummary};
use crate::fetch::{sources, TableFetcher};
use crate::process::{complete_rows, derive, join_sources, normalize};
use crate::schema::{is_allowed, CleanTable, CountryRecord, SourceKind};

pub const EXPENDITURE_CSV: &str = "expenditure_by_country.csv";
pub const DATASET_CSV: &str = "healthcare.csv";
pub const SUMMARY_JSON: &str = "run_summary.json";

/// Where a run writes its files.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub dir: PathBuf,
}

impl Outputs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn expenditure_csv(&self) -> PathBuf {
        self.dir.join(EXPENDITURE_CSV)
    }

    pub fn dataset_csv(&self) -> PathBuf {
        self.dir.join(DATASET_CSV)
    }

    pub fn summary_json(&self) -> PathBuf {
        self.dir.join(SUMMARY_JSON)
    }
}

#[tracing::instrument(level = "info", skip_all, fields(source = %kind))]
async fn load<F: TableFetcher>(fetcher: &F, kind: SourceKind) -> Result<CleanTable> {
    let src = sources::source(kind);
    let raw = fetcher
        .fetch(src)
        .await
        .with_context(|| format!("fetching {}", kind))?;
    let clean = normalize(&raw, kind).with_context(|| format!("normalizing {}", kind))?;
    info!(raw = raw.rows.len(), kept = clean.len(), "normalized");
    Ok(clean)
}

fn render_all(presenter: &dyn Presenter, records: &[CountryRecord]) -> Result<()> {
    for view in ChartView::ALL {
        presenter
            .render(view, records)
            .with_context(|| format!("view {}", view.slug()))?;
    }
    Ok(())
}

/// Fetch, clean, merge, derive, chart and export. Any stage failing aborts the run.
pub async fn run<F: TableFetcher>(
    fetcher: &F,
    presenter: Option<&dyn Presenter>,
    outputs: &Outputs,
    origin: &str,
) -> Result<RunSummary> {
    fs::create_dir_all(&outputs.dir)
        .with_context(|| format!("could not create `{}`", outputs.dir.display()))?;

    let expenditure = load(fetcher, SourceKind::Expenditure).await?;
    export::write_expenditure_snapshot(&outputs.expenditure_csv(), &expenditure)?;
    let life = load(fetcher, SourceKind::LifeExpectancy).await?;
    let income = load(fetcher, SourceKind::DisposableIncome).await?;
    let obesity = load(fetcher, SourceKind::ObesityRate).await?;

    let source_rows: BTreeMap<SourceKind, usize> = [&expenditure, &life, &income, &obesity]
        .iter()
        .map(|t| (t.kind, t.len()))
        .collect();

    let merged = join_sources(&expenditure, &life, &income, &obesity, is_allowed);
    let (complete, excluded) = complete_rows(&merged);
    if !excluded.is_empty() {
        warn!(count = excluded.len(), countries = ?excluded, "incomplete countries excluded");
    }
    info!(merged = merged.len(), complete = complete.len(), "merged sources");

    let derived = derive(&complete).context("deriving trend columns")?;

    match presenter {
        Some(p) => render_all(p, &derived.records)?,
        None => info!("chart rendering skipped"),
    }

    export::write_records(&outputs.dataset_csv(), &derived.records)?;

    let summary = RunSummary {
        generated_at: Utc::now(),
        origin: origin.to_string(),
        source_rows,
        final_rows: derived.records.len(),
        excluded,
        expenditure_fit: derived.expenditure_fit,
        life_expectancy_fit: derived.life_expectancy_fit,
    };
    export::write_summary(&outputs.summary_json(), &summary)?;
    info!(rows = summary.final_rows, dir = %outputs.dir.display(), "run complete");
    Ok(summary)
}

/// Label recorded in the summary for where pages came from.
pub fn origin_label(snapshot_dir: Option<&Path>) -> String {
    match snapshot_dir {
        Some(d) => d.display().to_string(),
        None => "http".to_string(),
    }
}

/// Record a failed run at `error` before handing the error back.
pub fn log_failure<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!("run failed: {:#}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tracing_subscriber::fmt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, captured.text())
    }

    #[test]
    fn failed_run_is_logged_at_error() {
        let failed: Result<()> =
            Err(anyhow!("reading snapshot out/expenditure.html")).context("fetching Expenditure");
        let (result, logs) = with_captured_logs(|| log_failure(failed));

        assert!(result.is_err());
        assert!(logs.contains("ERROR"), "{}", logs);
        assert!(
            logs.contains("run failed: fetching Expenditure: reading snapshot out/expenditure.html"),
            "{}",
            logs
        );
    }

    #[test]
    fn successful_run_logs_nothing() {
        let (result, logs) = with_captured_logs(|| log_failure(Ok(7)));
        assert_eq!(result.unwrap(), 7);
        assert!(logs.is_empty(), "{}", logs);
    }

    #[test]
    fn origin_label_names_snapshot_dir() {
        assert_eq!(origin_label(None), "http");
        assert_eq!(origin_label(Some(Path::new("pages"))), "pages");
    }
}
