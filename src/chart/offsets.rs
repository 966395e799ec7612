// src/chart/offsets.rs
//
// Hand-tuned label nudges, in data units of each chart's axes. Keyed by
// country so a change in row order cannot misplace a label.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::ChartView;

pub type Offsets = HashMap<&'static str, (f64, f64)>;

static EMPTY: Lazy<Offsets> = Lazy::new(HashMap::new);

static BY_EXPENDITURE: Lazy<Offsets> = Lazy::new(|| index(EXPENDITURE_VS_LIFE));
static BY_PCT_OF_INCOME: Lazy<Offsets> = Lazy::new(|| index(PCT_OF_INCOME_VS_INCOME));
static BY_OBESITY: Lazy<Offsets> = Lazy::new(|| index(OBESITY_VS_LIFE));
static BY_YEARS_ADDED: Lazy<Offsets> = Lazy::new(|| index(YEARS_ADDED_VS_EXCESS_INCOME));

fn index(rows: &'static [(&'static str, f64, f64)]) -> Offsets {
    rows.iter().map(|(c, dx, dy)| (*c, (*dx, *dy))).collect()
}

/// Label offsets for `view`; bar charts have none.
pub fn for_view(view: ChartView) -> &'static Offsets {
    match view {
        ChartView::LifeExpectancyVsExpenditure => &*BY_EXPENDITURE,
        ChartView::ExpenditureByIncome | ChartView::ExpenditureByIncomeTrend => &*BY_PCT_OF_INCOME,
        ChartView::LifeExpectancyVsObesity | ChartView::LifeExpectancyVsObesityTrend => &*BY_OBESITY,
        ChartView::ExcessIncomeByYearsAdded => &*BY_YEARS_ADDED,
        ChartView::ExcessExpenditure | ChartView::YearsAdded => &*EMPTY,
    }
}

/// Offset for `country`, zero when it has no entry.
pub fn offset(view: ChartView, country: &str) -> (f64, f64) {
    for_view(view).get(country).copied().unwrap_or((0.0, 0.0))
}

/// Life expectancy vs health expenditure.
static EXPENDITURE_VS_LIFE: &[(&str, f64, f64)] = &[
    ("Australia", -750.0, -0.15),
    ("Austria", 100.0, -0.05),
    ("Belgium", 100.0, 0.15),
    ("Canada", 100.0, 0.00),
    ("Chile", 100.0, 0.00),
    ("Costa Rica", 100.0, 0.00),
    ("Denmark", -300.0, -0.15),
    ("Estonia", -300.0, -0.15),
    ("Finland", -1100.0, -0.07),
    ("France", 0.0, 0.05),
    ("Germany", -800.0, -0.15),
    ("Greece", -800.0, -0.15),
    ("Hungary", -800.0, -0.15),
    ("Ireland", -1100.0, -0.03),
    ("Italy", -800.0, 0.0),
    ("Japan", -1000.0, -0.1),
    ("Latvia", -1000.0, -0.15),
    ("Lithuania", -1000.0, -0.15),
    ("Luxembourg", -1000.0, -0.1),
    ("Mexico", 100.0, 0.1),
    ("Netherlands", 100.0, -0.05),
    ("New Zealand", -2100.0, -0.03),
    ("Norway", -200.0, -0.15),
    ("Poland", -1100.0, -0.03),
    ("Portugal", -1400.0, -0.03),
    ("Slovakia", -1000.0, -0.15),
    ("Slovenia", -1000.0, -0.15),
    ("South Korea", -1000.0, -0.15),
    ("Spain", 50.0, -0.15),
    ("Sweden", -1000.0, -0.15),
    ("Switzerland", -500.0, -0.15),
    ("United Kingdom", -1200.0, -0.15),
    ("United States", -2200.0, -0.02),
];

/// Expenditure share of income vs disposable income, with and without trend.
static PCT_OF_INCOME_VS_INCOME: &[(&str, f64, f64)] = &[
    ("Australia", 0.1, -200.0),
    ("Austria", -1.0, -1000.0),
    ("Belgium", -1.7, -200.0),
    ("Canada", 0.2, -300.0),
    ("Chile", -0.5, -1000.0),
    ("Costa Rica", -1.0, -1000.0),
    ("Denmark", -1.0, -1000.0),
    ("Estonia", 0.2, -200.0),
    ("Finland", -1.0, -1000.0),
    ("France", -1.0, -1000.0),
    ("Germany", -0.5, -1000.0),
    ("Greece", -1.0, -1000.0),
    ("Hungary", 0.2, -200.0),
    ("Ireland", -1.0, -1000.0),
    ("Italy", -1.0, -1000.0),
    ("Japan", -0.5, -1000.0),
    ("Latvia", 0.2, -200.0),
    ("Lithuania", -1.0, -1000.0),
    ("Luxembourg", -1.0, -1000.0),
    ("Mexico", 0.0, -1000.0),
    ("Netherlands", -1.0, -1000.0),
    ("New Zealand", -1.0, -1000.0),
    ("Norway", -0.5, -1000.0),
    ("Poland", -1.0, -1000.0),
    ("Portugal", -1.6, -1000.0),
    ("Slovakia", -1.0, -1000.0),
    ("Slovenia", 0.2, -200.0),
    ("South Korea", -1.0, -1000.0),
    ("Spain", 0.0, -1000.0),
    ("Sweden", 0.1, 0.0),
    ("Switzerland", 0.2, -100.0),
    ("United Kingdom", -0.5, -1000.0),
    ("United States", -2.5, -1000.0),
];

/// Life expectancy vs obesity rate, with and without trend.
static OBESITY_VS_LIFE: &[(&str, f64, f64)] = &[
    ("Australia", -1.8, -0.16),
    ("Austria", -1.8, -0.16),
    ("Belgium", -1.8, -0.16),
    ("Canada", -1.8, -0.16),
    ("Chile", -1.8, -0.16),
    ("Costa Rica", -1.8, -0.16),
    ("Denmark", -4.8, -0.1),
    ("Estonia", -1.8, -0.16),
    ("Finland", -1.8, -0.16),
    ("France", -1.8, -0.16),
    ("Germany", -1.8, -0.16),
    ("Greece", -1.8, -0.16),
    ("Hungary", -1.8, -0.16),
    ("Ireland", 0.4, -0.05),
    ("Italy", 0.4, -0.05),
    ("Japan", 0.4, -0.05),
    ("Latvia", 0.4, -0.05),
    ("Lithuania", -1.8, -0.16),
    ("Luxembourg", -1.8, 0.16),
    ("Mexico", -2.8, -0.16),
    ("Netherlands", -6.3, 0.0),
    ("New Zealand", 0.4, -0.05),
    ("Norway", 0.4, -0.05),
    ("Poland", -1.8, -0.16),
    ("Portugal", -1.8, -0.16),
    ("Slovakia", -1.8, -0.16),
    ("Slovenia", -1.8, -0.16),
    ("South Korea", -1.8, -0.16),
    ("Spain", -1.8, -0.16),
    ("Sweden", -1.8, -0.16),
    ("Switzerland", -1.8, -0.16),
    ("United Kingdom", -1.5, -0.16),
    ("United States", -2.8, 0.16),
];

/// Excess disposable income vs years added.
static YEARS_ADDED_VS_EXCESS_INCOME: &[(&str, f64, f64)] = &[
    ("Australia", -0.5, -800.0),
    ("Austria", -0.5, -800.0),
    ("Belgium", 0.1, -200.0),
    ("Canada", 0.1, -200.0),
    ("Chile", -0.5, -800.0),
    ("Costa Rica", -0.5, -800.0),
    ("Denmark", -0.5, -800.0),
    ("Estonia", -0.5, -800.0),
    ("Finland", 0.1, -200.0),
    ("France", -0.5, -800.0),
    ("Germany", -0.5, -800.0),
    ("Greece", -0.5, -800.0),
    ("Hungary", -0.9, -800.0),
    ("Ireland", -0.5, -800.0),
    ("Italy", 0.1, -200.0),
    ("Japan", 0.1, -200.0),
    ("Latvia", 0.1, -200.0),
    ("Lithuania", 0.1, -200.0),
    ("Luxembourg", -0.5, -800.0),
    ("Mexico", 0.1, -200.0),
    ("Netherlands", -0.5, -1200.0),
    ("New Zealand", 0.1, -200.0),
    ("Norway", -0.5, -800.0),
    ("Poland", -0.5, -800.0),
    ("Portugal", 0.1, -200.0),
    ("Slovakia", 0.1, -200.0),
    ("Slovenia", 0.1, -200.0),
    ("South Korea", -0.5, -800.0),
    ("Spain", -0.5, -800.0),
    ("Sweden", -0.5, -800.0),
    ("Switzerland", 0.1, -200.0),
    ("United Kingdom", -0.5, -800.0),
    ("United States", -0.5, -800.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ALLOW_LIST;

    #[test]
    fn scatter_views_cover_the_allow_list() {
        for view in ChartView::ALL {
            let table = for_view(view);
            if view.is_bar() {
                assert!(table.is_empty());
                continue;
            }
            for country in ALLOW_LIST {
                assert!(table.contains_key(country), "{:?} lacks {}", view, country);
            }
        }
    }

    #[test]
    fn lookup_is_by_name() {
        assert_eq!(offset(ChartView::LifeExpectancyVsExpenditure, "United States"), (-2200.0, -0.02));
        assert_eq!(offset(ChartView::LifeExpectancyVsObesity, "Netherlands"), (-6.3, 0.0));
        assert_eq!(offset(ChartView::ExcessIncomeByYearsAdded, "Atlantis"), (0.0, 0.0));
    }
}
