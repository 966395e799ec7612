// src/process/normalize.rs

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

use crate::process::raw_table::RawTable;
use crate::process::utils::{clean_str, header_year, parse_f64, parse_grouped, strip_year_suffix};
use crate::schema::countries::life_expectancy_alias;
use crate::schema::{CleanTable, SourceKind};

/// Reduce a scraped table to `(Country, value)` rows for its source.
///
/// Unparseable numbers never abort the table: income keeps the row with
/// an absent value, obesity drops the row. A missing column is fatal.
#[tracing::instrument(level = "info", skip(raw), fields(rows = raw.rows.len()))]
pub fn normalize(raw: &RawTable, kind: SourceKind) -> Result<CleanTable> {
    let clean = match kind {
        SourceKind::Expenditure => expenditure(raw)?,
        SourceKind::LifeExpectancy => life_expectancy(raw)?,
        SourceKind::DisposableIncome => disposable_income(raw)?,
        SourceKind::ObesityRate => obesity_rate(raw)?,
    };
    info!(source = %kind, kept = clean.len(), "normalized");
    Ok(clean)
}

fn require(raw: &RawTable, kind: SourceKind, what: &str, idx: Option<usize>) -> Result<usize> {
    idx.ok_or_else(|| {
        anyhow!(
            "{} table has no {} column (headers: {:?})",
            kind,
            what,
            raw.headers()
        )
    })
}

/// Rows with an empty country cell carry no key and are skipped; a row
/// too short to reach `value_col` yields an empty value.
fn pairs<'a>(
    raw: &'a RawTable,
    country_col: usize,
    value_col: usize,
) -> impl Iterator<Item = (String, &'a str)> + 'a {
    (0..raw.rows.len()).filter_map(move |i| {
        let country = clean_str(raw.cell(i, country_col)?);
        if country.is_empty() {
            return None;
        }
        Some((country, raw.cell(i, value_col).unwrap_or("")))
    })
}

fn expenditure(raw: &RawTable) -> Result<CleanTable> {
    let kind = SourceKind::Expenditure;
    let country = require(raw, kind, "Location", raw.find_column(|h| h == "Location"))?;
    let latest = raw
        .headers()
        .iter()
        .enumerate()
        .filter_map(|(i, h)| header_year(h).map(|y| (y, i)))
        .max();
    let (year, value) = latest.ok_or_else(|| anyhow!("{} table has no year columns", kind))?;
    debug!(year, "using latest expenditure year");

    let mut out = CleanTable::new(kind);
    for (name, cell) in pairs(raw, country, value) {
        let v = parse_grouped(cell);
        if v.is_none() {
            debug!(source = %kind, country = %name, cell, "unparseable value");
        }
        out.push(name, v);
    }
    Ok(out)
}

fn life_expectancy(raw: &RawTable) -> Result<CleanTable> {
    let kind = SourceKind::LifeExpectancy;
    if raw.headers().len() < 2 {
        bail!(
            "{} table needs two columns (headers: {:?})",
            kind,
            raw.headers()
        );
    }

    let mut out = CleanTable::new(kind);
    for (name, cell) in pairs(raw, 0, 1) {
        let v = parse_f64(cell);
        if v.is_none() {
            debug!(source = %kind, country = %name, cell, "unparseable value");
        }
        out.push(life_expectancy_alias(&name), v);
    }
    Ok(out)
}

fn disposable_income(raw: &RawTable) -> Result<CleanTable> {
    let kind = SourceKind::DisposableIncome;
    let country = require(raw, kind, "Location", raw.find_column(|h| h == "Location"))?;
    let value = require(
        raw,
        kind,
        "2022 USD PPP",
        raw.find_column(|h| h.starts_with("2022") && h.contains("USD PPP")),
    )?;

    let mut out = CleanTable::new(kind);
    for (name, cell) in pairs(raw, country, value) {
        let v = parse_grouped(&strip_year_suffix(cell));
        if v.is_none() {
            debug!(source = %kind, country = %name, cell, "unparseable value, kept as absent");
        }
        out.push(name, v);
    }
    Ok(out)
}

fn obesity_rate(raw: &RawTable) -> Result<CleanTable> {
    let kind = SourceKind::ObesityRate;
    let country = require(raw, kind, "Country", raw.find_column(|h| h == "Country"))?;
    let value = require(
        raw,
        kind,
        "obesity percentage",
        raw.find_column(|h| h.starts_with("Percentage of adults with obesity")),
    )?;

    let mut out = CleanTable::new(kind);
    for (name, cell) in pairs(raw, country, value) {
        match parse_f64(cell) {
            Some(v) => out.push(name, Some(v)),
            None => debug!(source = %kind, country = %name, cell, "dropped unparseable row"),
        }
    }
    Ok(out)
}
