// src/chart/mod.rs

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tracing::info;

use crate::schema::{CountryRecord, HIGHLIGHT};

pub mod offsets;
pub mod render;

/// The eight views, in the order they are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    LifeExpectancyVsExpenditure,
    ExpenditureByIncome,
    ExpenditureByIncomeTrend,
    ExcessExpenditure,
    LifeExpectancyVsObesity,
    LifeExpectancyVsObesityTrend,
    YearsAdded,
    ExcessIncomeByYearsAdded,
}

/// How an axis tick is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFormat {
    Plain,
    Dollars,
    Percent,
    OneDecimal,
}

impl AxisFormat {
    pub fn format(self, v: f64) -> String {
        match self {
            AxisFormat::Plain => grouped(v),
            AxisFormat::Dollars => format!("${}", grouped(v)),
            AxisFormat::Percent => format!("{}%", grouped(v)),
            AxisFormat::OneDecimal => format!("{:.1}", v),
        }
    }
}

/// `12345.6` → `12,346`.
pub fn grouped(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{}", rounded.abs() as i64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Static description of one view.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub x_fmt: AxisFormat,
    pub y_fmt: AxisFormat,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

impl ChartView {
    pub const ALL: [ChartView; 8] = [
        ChartView::LifeExpectancyVsExpenditure,
        ChartView::ExpenditureByIncome,
        ChartView::ExpenditureByIncomeTrend,
        ChartView::ExcessExpenditure,
        ChartView::LifeExpectancyVsObesity,
        ChartView::LifeExpectancyVsObesityTrend,
        ChartView::YearsAdded,
        ChartView::ExcessIncomeByYearsAdded,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ChartView::LifeExpectancyVsExpenditure => "life_expectancy_vs_expenditure",
            ChartView::ExpenditureByIncome => "expenditure_by_income",
            ChartView::ExpenditureByIncomeTrend => "expenditure_by_income_trend",
            ChartView::ExcessExpenditure => "excess_expenditure",
            ChartView::LifeExpectancyVsObesity => "life_expectancy_vs_obesity",
            ChartView::LifeExpectancyVsObesityTrend => "life_expectancy_vs_obesity_trend",
            ChartView::YearsAdded => "years_added",
            ChartView::ExcessIncomeByYearsAdded => "excess_income_by_years_added",
        }
    }

    pub fn file_name(self) -> String {
        let n = Self::ALL.iter().position(|v| *v == self).unwrap_or(0) + 1;
        format!("{:02}_{}.svg", n, self.slug())
    }

    pub fn is_bar(self) -> bool {
        matches!(self, ChartView::ExcessExpenditure | ChartView::YearsAdded)
    }

    pub fn spec(self) -> ChartSpec {
        use AxisFormat::*;
        match self {
            ChartView::LifeExpectancyVsExpenditure => ChartSpec {
                title: "Life expectancy vs health expenditure",
                x_desc: "Health Expenditure per capita",
                y_desc: "Life Expectancy",
                x_fmt: Dollars,
                y_fmt: Plain,
                x_range: Some((1000.0, 13000.0)),
                y_range: Some((75.0, 85.0)),
            },
            ChartView::ExpenditureByIncome => ChartSpec {
                title: "Health expenditure by disposable income",
                x_desc: "Health expenditure percent of disposable income",
                y_desc: "Disposable income",
                x_fmt: Percent,
                y_fmt: Dollars,
                x_range: None,
                y_range: None,
            },
            ChartView::ExpenditureByIncomeTrend => ChartSpec {
                title: "Health expenditure percent by disposable income",
                ..ChartView::ExpenditureByIncome.spec()
            },
            ChartView::ExcessExpenditure => ChartSpec {
                title: "Excess expenditure (percent) of disposable income",
                x_desc: "Excess expenditure",
                y_desc: "Country",
                x_fmt: Percent,
                y_fmt: Plain,
                x_range: None,
                y_range: None,
            },
            ChartView::LifeExpectancyVsObesity => ChartSpec {
                title: "Life expectancy vs obesity rate",
                x_desc: "Obesity rate",
                y_desc: "Life expectancy",
                x_fmt: Percent,
                y_fmt: Plain,
                x_range: None,
                y_range: None,
            },
            ChartView::LifeExpectancyVsObesityTrend => ChartView::LifeExpectancyVsObesity.spec(),
            ChartView::YearsAdded => ChartSpec {
                title: "Years added (adjusted for obesity rate)",
                x_desc: "Years Added",
                y_desc: "Country",
                x_fmt: OneDecimal,
                y_fmt: Plain,
                x_range: None,
                y_range: None,
            },
            ChartView::ExcessIncomeByYearsAdded => ChartSpec {
                title: "Excess disposable income by years added",
                x_desc: "Years added",
                y_desc: "Excess disposable income",
                x_fmt: Plain,
                y_fmt: Dollars,
                x_range: None,
                y_range: Some((15000.0, 55000.0)),
            },
        }
    }
}

/// One labelled point of a scatter view.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub highlight: bool,
    /// Label position relative to the point.
    pub offset: (f64, f64),
}

/// One bar of a bar view.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub highlight: bool,
}

/// Everything a backend needs to draw a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Scatter {
        points: Vec<Point>,
        trend: Option<Vec<(f64, f64)>>,
        vline: Option<f64>,
    },
    Bars(Vec<Bar>),
}

fn xy(view: ChartView, r: &CountryRecord) -> (f64, f64) {
    match view {
        ChartView::LifeExpectancyVsExpenditure => (r.expenditure, r.life_expectancy),
        ChartView::ExpenditureByIncome | ChartView::ExpenditureByIncomeTrend => {
            (r.expenditure_pct_of_income, r.disposable_income)
        }
        ChartView::LifeExpectancyVsObesity | ChartView::LifeExpectancyVsObesityTrend => {
            (r.obesity_rate, r.life_expectancy)
        }
        ChartView::ExcessIncomeByYearsAdded => (r.years_added, r.excess_disposable_income),
        ChartView::ExcessExpenditure => (r.excess_expenditure_pct, 0.0),
        ChartView::YearsAdded => (r.years_added, 0.0),
    }
}

/// Project the final records onto `view`.
pub fn chart_data(view: ChartView, records: &[CountryRecord]) -> ChartData {
    if view.is_bar() {
        let mut bars: Vec<Bar> = records
            .iter()
            .map(|r| Bar {
                label: r.country.clone(),
                value: xy(view, r).0,
                highlight: r.country == HIGHLIGHT,
            })
            .collect();
        bars.sort_by(|a, b| a.value.total_cmp(&b.value));
        return ChartData::Bars(bars);
    }

    let points = records
        .iter()
        .map(|r| {
            let (x, y) = xy(view, r);
            Point {
                label: r.country.clone(),
                x,
                y,
                highlight: r.country == HIGHLIGHT,
                offset: offsets::offset(view, &r.country),
            }
        })
        .collect();

    let trend = match view {
        ChartView::ExpenditureByIncomeTrend => {
            let mut line: Vec<(f64, f64)> = records
                .iter()
                .map(|r| (r.expenditure_pct_trend, r.disposable_income))
                .collect();
            line.sort_by(|a, b| a.1.total_cmp(&b.1));
            Some(line)
        }
        ChartView::LifeExpectancyVsObesityTrend => {
            let mut line: Vec<(f64, f64)> = records
                .iter()
                .map(|r| (r.obesity_rate, r.life_expectancy_trend))
                .collect();
            line.sort_by(|a, b| a.0.total_cmp(&b.0));
            Some(line)
        }
        _ => None,
    };
    let vline = (view == ChartView::ExcessIncomeByYearsAdded).then_some(0.0);

    ChartData::Scatter {
        points,
        trend,
        vline,
    }
}

/// Consumes the final dataset, one view at a time.
pub trait Presenter {
    fn render(&self, view: ChartView, records: &[CountryRecord]) -> Result<()>;
}

/// Writes each view as an SVG file under `dir`.
pub struct SvgPresenter {
    dir: PathBuf,
}

impl SvgPresenter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create `{}`", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, view: ChartView) -> PathBuf {
        self.dir.join(view.file_name())
    }
}

impl Presenter for SvgPresenter {
    fn render(&self, view: ChartView, records: &[CountryRecord]) -> Result<()> {
        let path = self.path_for(view);
        let spec = view.spec();
        match chart_data(view, records) {
            ChartData::Scatter {
                points,
                trend,
                vline,
            } => render::scatter(&path, &spec, &points, trend.as_deref(), vline),
            ChartData::Bars(bars) => render::bars(&path, &spec, &bars),
        }
        .with_context(|| format!("rendering {}", path.display()))?;
        info!(view = view.slug(), path = %path.display(), "chart written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, years_added: f64, excess: f64) -> CountryRecord {
        CountryRecord {
            country: country.to_string(),
            expenditure: 5000.0,
            life_expectancy: 81.0,
            disposable_income: 40000.0,
            expenditure_pct_of_income: 12.5,
            expenditure_pct_trend: 11.0,
            excess_expenditure_pct: excess,
            obesity_rate: 20.0,
            life_expectancy_trend: 80.0,
            years_added,
            excess_disposable_income: 35000.0,
        }
    }

    #[test]
    fn grouping_and_axis_formats() {
        assert_eq!(grouped(1234567.4), "1,234,567");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(-15000.0), "-15,000");
        assert_eq!(AxisFormat::Dollars.format(13000.0), "$13,000");
        assert_eq!(AxisFormat::Percent.format(12.4), "12%");
        assert_eq!(AxisFormat::OneDecimal.format(-1.26), "-1.3");
    }

    #[test]
    fn file_names_are_numbered_in_order() {
        assert_eq!(
            ChartView::LifeExpectancyVsExpenditure.file_name(),
            "01_life_expectancy_vs_expenditure.svg"
        );
        assert_eq!(
            ChartView::ExcessIncomeByYearsAdded.file_name(),
            "08_excess_income_by_years_added.svg"
        );
    }

    #[test]
    fn bars_sort_ascending_and_highlight() {
        let recs = vec![
            record("Japan", 2.0, -1.0),
            record("United States", -3.0, 6.0),
            record("Chile", 0.5, 0.0),
        ];
        let ChartData::Bars(bars) = chart_data(ChartView::YearsAdded, &recs) else {
            panic!("years added is a bar view");
        };
        let names: Vec<_> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(names, vec!["United States", "Chile", "Japan"]);
        assert!(bars[0].highlight);
        assert!(!bars[2].highlight);
    }

    #[test]
    fn scatter_offsets_follow_country_not_position() {
        // reversed order must not shift labels
        let recs = vec![record("United States", 0.0, 0.0), record("Australia", 0.0, 0.0)];
        let ChartData::Scatter { points, trend, vline } =
            chart_data(ChartView::LifeExpectancyVsExpenditure, &recs)
        else {
            panic!("scatter view");
        };
        assert_eq!(points[0].offset, (-2200.0, -0.02));
        assert_eq!(points[1].offset, (-750.0, -0.15));
        assert!(trend.is_none());
        assert!(vline.is_none());
    }

    #[test]
    fn trend_views_carry_a_line() {
        let recs = vec![record("Japan", 1.0, 0.0), record("Chile", -1.0, 0.0)];
        match chart_data(ChartView::LifeExpectancyVsObesityTrend, &recs) {
            ChartData::Scatter { trend: Some(line), .. } => {
                assert_eq!(line, vec![(20.0, 80.0), (20.0, 80.0)])
            }
            other => panic!("unexpected {:?}", other),
        }
        match chart_data(ChartView::ExcessIncomeByYearsAdded, &recs) {
            ChartData::Scatter { vline, .. } => assert_eq!(vline, Some(0.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn years_added_axes_have_no_percent_suffix() {
        let bars = ChartView::YearsAdded.spec();
        assert_eq!(bars.x_fmt, AxisFormat::OneDecimal);
        assert_eq!(bars.x_fmt.format(2.345), "2.3");
        let scatter = ChartView::ExcessIncomeByYearsAdded.spec();
        assert_eq!(scatter.x_fmt, AxisFormat::Plain);
        assert_eq!(scatter.x_fmt.format(-3.0), "-3");
    }

    #[test]
    fn svg_presenter_writes_every_view() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let presenter = SvgPresenter::new(dir.path().join("charts"))?;
        let recs = vec![
            record("Japan", 1.0, -2.0),
            record("United States", -2.0, 5.0),
            record("Chile", 0.4, 1.0),
        ];
        for view in ChartView::ALL {
            presenter.render(view, &recs)?;
            let svg = std::fs::read_to_string(presenter.path_for(view))?;
            assert!(svg.contains("<svg"));
        }
        Ok(())
    }
}
