// src/chart/render.rs

use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use super::{Bar, ChartSpec, Point};

const SIZE: (u32, u32) = (675, 1200);
const POINT: RGBColor = RGBColor(0x32, 0x7e, 0xbd);
const HIGHLIGHT: RGBColor = RGBColor(0xbd, 0x32, 0x32);
const TREND: RGBColor = RGBColor(0x64, 0x64, 0x64);
const FONT: &str = "sans-serif";

/// Padded `[min, max]` of `values`, never zero-width.
fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.08 } else { lo.abs().max(1.0) * 0.1 };
    (lo - pad, hi + pad)
}

fn colour(highlight: bool) -> RGBColor {
    if highlight {
        HIGHLIGHT
    } else {
        POINT
    }
}

pub fn scatter(
    path: &Path,
    spec: &ChartSpec,
    points: &[Point],
    trend: Option<&[(f64, f64)]>,
    vline: Option<f64>,
) -> Result<()> {
    let trend_pts = trend.unwrap_or(&[]);
    let (x0, x1) = spec.x_range.unwrap_or_else(|| {
        span(
            points
                .iter()
                .map(|p| p.x)
                .chain(trend_pts.iter().map(|p| p.0))
                .chain(vline),
        )
    });
    let (y0, y1) = spec.y_range.unwrap_or_else(|| {
        span(
            points
                .iter()
                .map(|p| p.y)
                .chain(trend_pts.iter().map(|p| p.1)),
        )
    });

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (FONT, 20))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .x_label_formatter(&|x| spec.x_fmt.format(*x))
        .y_label_formatter(&|y| spec.y_fmt.format(*y))
        .draw()?;

    if let Some(x) = vline {
        chart.draw_series(LineSeries::new(vec![(x, y0), (x, y1)], &TREND.mix(0.35)))?;
    }
    if !trend_pts.is_empty() {
        chart.draw_series(LineSeries::new(trend_pts.iter().copied(), &TREND))?;
    }

    // highlighted point last so it sits on top
    let (plain, marked): (Vec<&Point>, Vec<&Point>) = points.iter().partition(|p| !p.highlight);
    chart.draw_series(
        plain
            .iter()
            .chain(marked.iter())
            .map(|p| Circle::new((p.x, p.y), 4, colour(p.highlight).filled())),
    )?;

    let label_style = (FONT, 12).into_font().color(&BLACK.mix(0.55));
    chart.draw_series(points.iter().map(|p| {
        Text::new(
            p.label.clone(),
            (p.x + p.offset.0, p.y + p.offset.1),
            label_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

pub fn bars(path: &Path, spec: &ChartSpec, bars: &[Bar]) -> Result<()> {
    let (x0, x1) = spec
        .x_range
        .unwrap_or_else(|| span(bars.iter().map(|b| b.value).chain(std::iter::once(0.0))));
    let n = bars.len().max(1);
    let names: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (FONT, 20))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(120)
        .build_cartesian_2d(x0..x1, (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .x_label_formatter(&|x| spec.x_fmt.format(*x))
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => names.get(*i).map(|s| s.to_string()).unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(i)), (b.value, SegmentValue::Exact(i + 1))],
            colour(b.highlight).filled(),
        );
        bar.set_margin(3, 3, 0, 0);
        bar
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_pads_and_never_collapses() {
        let (lo, hi) = span([10.0, 20.0].into_iter());
        assert!(lo < 10.0 && hi > 20.0);
        let (lo, hi) = span([5.0, 5.0].into_iter());
        assert!(lo < 5.0 && hi > 5.0);
        assert_eq!(span(std::iter::empty()), (0.0, 1.0));
    }
}
