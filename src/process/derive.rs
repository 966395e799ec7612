// src/process/derive.rs

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::info;

use crate::schema::{CompleteRow, CountryRecord};

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Closed-form simple linear regression.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            bail!("regression input length mismatch: {} x vs {} y", xs.len(), ys.len());
        }
        if xs.len() < 2 {
            bail!("regression needs at least two points, got {}", xs.len());
        }
        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - x_mean;
            sxy += dx * (y - y_mean);
            sxx += dx * dx;
        }
        if sxx == 0.0 {
            bail!("regression is degenerate: independent variable has zero variance");
        }

        let slope = sxy / sxx;
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Derived dataset plus the two trend fits behind it.
#[derive(Debug, Clone)]
pub struct Derived {
    pub records: Vec<CountryRecord>,
    /// Expenditure-% of income against disposable income.
    pub expenditure_fit: LinearFit,
    /// Life expectancy against obesity rate.
    pub life_expectancy_fit: LinearFit,
}

pub fn expenditure_pct_of_income(expenditure: f64, income: f64) -> f64 {
    expenditure / income * 100.0
}

/// Add the ratio, trend and residual columns. Row order is preserved.
#[tracing::instrument(level = "info", skip_all, fields(rows = rows.len()))]
pub fn derive(rows: &[CompleteRow]) -> Result<Derived> {
    let pct: Vec<f64> = rows
        .iter()
        .map(|r| expenditure_pct_of_income(r.expenditure, r.disposable_income))
        .collect();
    let income: Vec<f64> = rows.iter().map(|r| r.disposable_income).collect();
    let obesity: Vec<f64> = rows.iter().map(|r| r.obesity_rate).collect();
    let life: Vec<f64> = rows.iter().map(|r| r.life_expectancy).collect();

    let expenditure_fit = LinearFit::fit(&income, &pct)?;
    let life_expectancy_fit = LinearFit::fit(&obesity, &life)?;
    info!(?expenditure_fit, ?life_expectancy_fit, "fitted trends");

    let records = rows
        .iter()
        .zip(pct)
        .map(|(r, pct)| {
            let pct_trend = expenditure_fit.predict(r.disposable_income);
            let life_trend = life_expectancy_fit.predict(r.obesity_rate);
            CountryRecord {
                country: r.country.clone(),
                expenditure: r.expenditure,
                life_expectancy: r.life_expectancy,
                disposable_income: r.disposable_income,
                expenditure_pct_of_income: pct,
                expenditure_pct_trend: pct_trend,
                excess_expenditure_pct: pct - pct_trend,
                obesity_rate: r.obesity_rate,
                life_expectancy_trend: life_trend,
                years_added: r.life_expectancy - life_trend,
                excess_disposable_income: r.disposable_income - r.expenditure,
            }
        })
        .collect();

    Ok(Derived {
        records,
        expenditure_fit,
        life_expectancy_fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn row(country: &str, exp: f64, life: f64, inc: f64, ob: f64) -> CompleteRow {
        CompleteRow {
            country: country.to_string(),
            expenditure: exp,
            life_expectancy: life,
            disposable_income: inc,
            obesity_rate: ob,
        }
    }

    #[test]
    fn two_country_scenario() -> Result<()> {
        let rows = vec![
            row("A", 5000.0, 82.0, 50000.0, 20.0),
            row("B", 10000.0, 78.0, 25000.0, 35.0),
        ];
        let d = derive(&rows)?;
        assert!((d.records[0].expenditure_pct_of_income - 10.0).abs() < EPS);
        assert!((d.records[1].expenditure_pct_of_income - 40.0).abs() < EPS);
        assert!((d.records[0].excess_disposable_income - 45000.0).abs() < EPS);
        assert!((d.records[1].excess_disposable_income - 15000.0).abs() < EPS);
        // two points lie exactly on their own line
        for r in &d.records {
            assert!(r.excess_expenditure_pct.abs() < 1e-6);
            assert!(r.years_added.abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn fit_matches_closed_form() -> Result<()> {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.1, 3.9, 6.2, 7.8, 10.1];
        let fit = LinearFit::fit(&xs, &ys)?;
        // slope = Sxy / Sxx = 19.9 / 10, intercept = 6.02 - 1.99 * 3
        assert!((fit.slope - 1.99).abs() < EPS);
        assert!((fit.intercept - 0.05).abs() < EPS);
        Ok(())
    }

    #[test]
    fn fitted_line_minimizes_squared_error() -> Result<()> {
        let xs = [30000.0, 42000.0, 25000.0, 51000.0, 38000.0];
        let ys = [12.0, 11.5, 9.0, 19.0, 10.5];
        let fit = LinearFit::fit(&xs, &ys)?;
        let sse = |slope: f64, intercept: f64| -> f64 {
            xs.iter()
                .zip(&ys)
                .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
                .sum()
        };
        let best = sse(fit.slope, fit.intercept);
        for (ds, di) in [(1e-6, 0.0), (-1e-6, 0.0), (0.0, 0.01), (0.0, -0.01)] {
            assert!(best <= sse(fit.slope + ds, fit.intercept + di));
        }
        Ok(())
    }

    #[test]
    fn residual_columns_are_observed_minus_trend() -> Result<()> {
        let rows = vec![
            row("A", 5000.0, 83.0, 40000.0, 12.0),
            row("B", 12000.0, 77.0, 60000.0, 36.0),
            row("C", 2000.0, 80.5, 18000.0, 28.0),
            row("D", 6500.0, 82.0, 35000.0, 22.0),
        ];
        let d = derive(&rows)?;
        for r in &d.records {
            assert!(
                (r.expenditure_pct_of_income - r.expenditure / r.disposable_income * 100.0).abs()
                    < EPS
            );
            assert!(
                (r.excess_expenditure_pct - (r.expenditure_pct_of_income - r.expenditure_pct_trend))
                    .abs()
                    < EPS
            );
            assert!((r.years_added - (r.life_expectancy - r.life_expectancy_trend)).abs() < EPS);
        }
        // OLS residuals sum to zero
        let total: f64 = d.records.iter().map(|r| r.years_added).sum();
        assert!(total.abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn degenerate_inputs_are_errors() {
        assert!(LinearFit::fit(&[1.0], &[2.0]).is_err());
        assert!(LinearFit::fit(&[3.0, 3.0], &[1.0, 2.0]).is_err());
        assert!(LinearFit::fit(&[1.0, 2.0], &[1.0]).is_err());
    }
}
