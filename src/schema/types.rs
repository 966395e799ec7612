// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four scraped tables that feed the dataset.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Expenditure,
    LifeExpectancy,
    DisposableIncome,
    ObesityRate,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Expenditure,
        SourceKind::LifeExpectancy,
        SourceKind::DisposableIncome,
        SourceKind::ObesityRate,
    ];

    /// Canonical name of the value column this source contributes.
    pub fn column(self) -> &'static str {
        match self {
            SourceKind::Expenditure => "Expenditure",
            SourceKind::LifeExpectancy => "Life_Expectancy",
            SourceKind::DisposableIncome => "Disposable_Income",
            SourceKind::ObesityRate => "Obesity_Rate",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One normalized `(Country, value)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRow {
    #[serde(rename = "Country")]
    pub country: String,
    pub value: Option<f64>,
}

/// A source table reduced to its canonical two-column shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    pub kind: SourceKind,
    pub rows: Vec<CleanRow>,
}

impl CleanTable {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, country: impl Into<String>, value: Option<f64>) {
        self.rows.push(CleanRow {
            country: country.into(),
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row of the in-progress joined table. Columns that no join has
/// supplied yet, or that found no match, stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRow {
    pub country: String,
    pub expenditure: Option<f64>,
    pub life_expectancy: Option<f64>,
    pub disposable_income: Option<f64>,
    pub obesity_rate: Option<f64>,
}

impl MergedRow {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, kind: SourceKind) -> Option<f64> {
        match kind {
            SourceKind::Expenditure => self.expenditure,
            SourceKind::LifeExpectancy => self.life_expectancy,
            SourceKind::DisposableIncome => self.disposable_income,
            SourceKind::ObesityRate => self.obesity_rate,
        }
    }

    pub fn with(mut self, kind: SourceKind, value: Option<f64>) -> Self {
        match kind {
            SourceKind::Expenditure => self.expenditure = value,
            SourceKind::LifeExpectancy => self.life_expectancy = value,
            SourceKind::DisposableIncome => self.disposable_income = value,
            SourceKind::ObesityRate => self.obesity_rate = value,
        }
        self
    }

    /// All four source values, or `None` if any is missing.
    pub fn complete(&self) -> Option<CompleteRow> {
        Some(CompleteRow {
            country: self.country.clone(),
            expenditure: self.expenditure?,
            life_expectancy: self.life_expectancy?,
            disposable_income: self.disposable_income?,
            obesity_rate: self.obesity_rate?,
        })
    }

    /// Names of the source columns that are still absent.
    pub fn missing(&self) -> Vec<&'static str> {
        SourceKind::ALL
            .iter()
            .filter(|k| self.get(**k).is_none())
            .map(|k| k.column())
            .collect()
    }
}

/// A joined row with every source value present.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRow {
    pub country: String,
    pub expenditure: f64,
    pub life_expectancy: f64,
    pub disposable_income: f64,
    pub obesity_rate: f64,
}

/// Final per-country record, in the column order of `healthcare.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Expenditure")]
    pub expenditure: f64,
    #[serde(rename = "Life_Expectancy")]
    pub life_expectancy: f64,
    #[serde(rename = "Disposable_Income")]
    pub disposable_income: f64,
    #[serde(rename = "Expenditure_As_Percent_of_Income")]
    pub expenditure_pct_of_income: f64,
    #[serde(rename = "Expenditure_As_Percent_of_Income_Trend")]
    pub expenditure_pct_trend: f64,
    #[serde(rename = "Excess_Expenditure_as_Percent")]
    pub excess_expenditure_pct: f64,
    #[serde(rename = "Obesity_Rate")]
    pub obesity_rate: f64,
    #[serde(rename = "Life_Expectancy_Trend")]
    pub life_expectancy_trend: f64,
    #[serde(rename = "Years_Added")]
    pub years_added: f64,
    #[serde(rename = "Excess_Disposable_Income")]
    pub excess_disposable_income: f64,
}
