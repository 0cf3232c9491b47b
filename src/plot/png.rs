//! PNG chart rendering with Plotters' bitmap backend.
//!
//! Each function takes already-prepared series (see `series`) and writes one
//! image. Empty inputs write nothing.

use std::error::Error;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use super::series::{CategoryRates, padded_range};

pub type DrawResult<T> = Result<T, Box<dyn Error>>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const RATE_AXIS: &str = "EA interest rate (%)";

/// Line chart of the rate over resolution dates.
pub fn render_history(path: &Path, series: &[(NaiveDate, f64)]) -> DrawResult<()> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Ok(());
    };
    let Some((y0, y1)) = padded_range(series.iter().map(|(_, rate)| *rate)) else {
        return Ok(());
    };
    // A single day still needs a non-degenerate axis.
    let (x0, x1) = if first.0 == last.0 {
        (first.0 - Duration::days(1), last.0 + Duration::days(1))
    } else {
        (first.0, last.0)
    };

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Current bank interest rate history (EA)", CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Resolution date")
        .y_desc(RATE_AXIS)
        .x_labels(10)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
        .y_label_formatter(&|v: &f64| format!("{v:.1}"))
        .draw()?;

    chart.draw_series(LineSeries::new(series.iter().copied(), BLUE.stroke_width(2)))?;

    root.present()?;
    Ok(())
}

/// Box plot of rates per credit type.
pub fn render_distribution(path: &Path, groups: &[CategoryRates]) -> DrawResult<()> {
    let groups: Vec<&CategoryRates> = groups.iter().filter(|g| !g.rates.is_empty()).collect();
    if groups.is_empty() {
        return Ok(());
    }
    let Some((y0, y1)) = padded_range(groups.iter().flat_map(|g| g.rates.iter().copied())) else {
        return Ok(());
    };
    let n = groups.len() as i32;

    let root = BitMapBackend::new(path, (1400, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Interest rate distribution by credit type", CAPTION_FONT)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), y0 as f32..y1 as f32)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Credit type")
        .y_desc(RATE_AXIS)
        .x_labels(groups.len() + 1)
        .x_label_formatter(&|v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) => groups
                .get(*i as usize)
                .map(|g| g.label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(groups.iter().enumerate().map(|(i, g)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(i as i32), &Quartiles::new(&g.rates))
            .width(40)
            .whisker_width(0.5)
            .style(BLUE)
    }))?;

    root.present()?;
    Ok(())
}

/// Horizontal bars for the highest rates, highest on top.
pub fn render_top_rates(path: &Path, top: &[(String, f64)]) -> DrawResult<()> {
    if top.is_empty() {
        return Ok(());
    }
    let n = top.len() as i32;
    let x_max = top.iter().map(|(_, rate)| *rate).fold(0.0, f64::max).max(1.0) * 1.1;
    // Bars are stacked bottom-up, so the first (highest) entry gets the last row.
    let row_of = |i: usize| n - 1 - i as i32;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Top {} highest recorded rates", top.len()), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(280)
        .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(RATE_AXIS)
        .y_labels(top.len() + 1)
        .y_label_formatter(&|v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(row) => top
                .get((n - 1 - *row) as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(top.iter().enumerate().map(|(i, (_, rate))| {
        let row = row_of(i);
        Rectangle::new(
            [(0.0, SegmentValue::Exact(row)), (*rate, SegmentValue::Exact(row + 1))],
            BLUE.mix(0.8).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
