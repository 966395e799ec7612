// src/export.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::{collections::BTreeMap, fs::File, io::BufWriter, path::Path};
use tracing::info;

use crate::process::LinearFit;
use crate::schema::{CleanTable, CountryRecord, SourceKind};

/// Header of `healthcare.csv`.
pub const RECORD_COLUMNS: [&str; 11] = [
    "Country",
    "Expenditure",
    "Life_Expectancy",
    "Disposable_Income",
    "Expenditure_As_Percent_of_Income",
    "Expenditure_As_Percent_of_Income_Trend",
    "Excess_Expenditure_as_Percent",
    "Obesity_Rate",
    "Life_Expectancy_Trend",
    "Years_Added",
    "Excess_Disposable_Income",
];

/// What a run produced, written next to the CSVs.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    /// `http` or the snapshot directory the pages came from.
    pub origin: String,
    /// Rows kept by normalization, per source.
    pub source_rows: BTreeMap<SourceKind, usize>,
    pub final_rows: usize,
    /// Allow-listed countries dropped for missing values.
    pub excluded: Vec<String>,
    pub expenditure_fit: LinearFit,
    pub life_expectancy_fit: LinearFit,
}

#[derive(Serialize)]
struct ExpenditureRow<'a> {
    #[serde(rename = "Country")]
    country: &'a str,
    #[serde(rename = "Expenditure")]
    expenditure: Option<f64>,
}

/// The normalized expenditure table before any filtering.
pub fn write_expenditure_snapshot(path: &Path, table: &CleanTable) -> Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["Country", SourceKind::Expenditure.column()])?;
    for row in &table.rows {
        w.serialize(ExpenditureRow {
            country: &row.country,
            expenditure: row.value,
        })?;
    }
    w.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "wrote expenditure snapshot");
    Ok(())
}

/// The final dataset, one row per country.
pub fn write_records(path: &Path, records: &[CountryRecord]) -> Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(RECORD_COLUMNS)?;
    for r in records {
        w.serialize(r)?;
    }
    w.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    info!(path = %path.display(), rows = records.len(), "wrote dataset");
    Ok(())
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
