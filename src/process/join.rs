// src/process/join.rs

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::schema::{CleanTable, CompleteRow, MergedRow, SourceKind};

/// The growing wide table, one row per base-table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTable {
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn countries(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.country.as_str()).collect()
    }

    pub fn row(&self, country: &str) -> Option<&MergedRow> {
        self.rows.iter().find(|r| r.country == country)
    }
}

/// Start a merged table from the base source, in source order.
pub fn seed(base: &CleanTable) -> MergedTable {
    MergedTable {
        rows: base
            .rows
            .iter()
            .map(|r| MergedRow::new(r.country.clone()).with(base.kind, r.value))
            .collect(),
    }
}

/// Left join on `Country`.
///
/// Each base row is emitted once per matching row of `other`, in the
/// order `other` lists them; with no match it is emitted once with the
/// new column absent. Base row order is preserved.
#[tracing::instrument(level = "debug", skip_all, fields(source = %other.kind))]
pub fn left_join(base: &MergedTable, other: &CleanTable) -> MergedTable {
    let mut index: HashMap<&str, Vec<Option<f64>>> = HashMap::new();
    for r in &other.rows {
        index.entry(r.country.as_str()).or_default().push(r.value);
    }

    let mut rows = Vec::with_capacity(base.len());
    let mut unmatched = 0usize;
    for row in &base.rows {
        match index.get(row.country.as_str()) {
            Some(values) => {
                if values.len() > 1 {
                    warn!(country = %row.country, source = %other.kind, matches = values.len(), "duplicate key in joined table");
                }
                rows.extend(values.iter().map(|v| row.clone().with(other.kind, *v)));
            }
            None => {
                unmatched += 1;
                debug!(country = %row.country, source = %other.kind, "no match");
                rows.push(row.clone().with(other.kind, None));
            }
        }
    }
    info!(source = %other.kind, rows = rows.len(), unmatched, "joined");
    MergedTable { rows }
}

/// Keep only rows whose country passes `allowed`.
pub fn retain_allowed(table: &MergedTable, allowed: impl Fn(&str) -> bool) -> MergedTable {
    let rows: Vec<MergedRow> = table
        .rows
        .iter()
        .filter(|r| allowed(&r.country))
        .cloned()
        .collect();
    info!(before = table.len(), after = rows.len(), "applied allow-list");
    MergedTable { rows }
}

/// Stable, ordinal sort on `Country`.
pub fn sort_by_country(table: &MergedTable) -> MergedTable {
    let mut rows = table.rows.clone();
    rows.sort_by(|a, b| a.country.cmp(&b.country));
    MergedTable { rows }
}

/// Rows with all four source values, plus the countries that were not.
pub fn complete_rows(table: &MergedTable) -> (Vec<CompleteRow>, Vec<String>) {
    let mut kept = Vec::with_capacity(table.len());
    let mut excluded = Vec::new();
    for row in &table.rows {
        match row.complete() {
            Some(c) => kept.push(c),
            None => {
                warn!(country = %row.country, missing = ?row.missing(), "excluded incomplete row");
                excluded.push(row.country.clone());
            }
        }
    }
    (kept, excluded)
}

/// The fixed join order: expenditure, life expectancy, allow-list,
/// sort, disposable income, obesity rate.
pub fn join_sources(
    expenditure: &CleanTable,
    life_expectancy: &CleanTable,
    income: &CleanTable,
    obesity: &CleanTable,
    allowed: impl Fn(&str) -> bool,
) -> MergedTable {
    debug_assert_eq!(expenditure.kind, SourceKind::Expenditure);
    let merged = left_join(&seed(expenditure), life_expectancy);
    let merged = sort_by_country(&retain_allowed(&merged, allowed));
    let merged = left_join(&merged, income);
    left_join(&merged, obesity)
}
