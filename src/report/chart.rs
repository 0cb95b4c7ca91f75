//! SVG line charts of a thread-count series.
//!
//! Rendering is delegated to `plotters`. Two x-axis layouts exist:
//! evenly spaced categories labeled with the thread counts, so that
//! 1, 2, 4 ... 128 do not bunch up on the left, and a logarithmic axis.

use crate::models::SeriesPoint;
use anyhow::{Context, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info};

const LINE_COLOR: RGBColor = BLUE;
const POINT_RADIUS: i32 = 5;

/// Layout of the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis {
    /// One evenly spaced tick per point, labeled with its thread count.
    Categorical,
    /// Logarithmic numeric axis.
    Log,
}

/// Everything the renderer needs besides the data.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series_label: String,
    pub x_axis: XAxis,
    /// Values are counts (iterations); label the y axis with integers only.
    pub whole_numbers: bool,
    pub width: u32,
    pub height: u32,
}

/// Render the series to an SVG file.
pub fn render_chart(series: &[SeriesPoint], spec: &ChartSpec, path: &Path) -> Result<()> {
    if series.is_empty() {
        anyhow::bail!("Nothing to plot");
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    debug!(
        "Rendering {} point(s) with {:?} x axis to {}",
        series.len(),
        spec.x_axis,
        path.display()
    );

    let drawn = match spec.x_axis {
        XAxis::Categorical => draw_categorical(series, spec, path),
        XAxis::Log => draw_log(series, spec, path),
    };
    drawn.with_context(|| format!("Failed to render chart to {}", path.display()))?;

    info!("Chart written to {}", path.display());
    Ok(())
}

/// Upper bound of the value axis with some headroom above the largest point.
fn y_upper(series: &[SeriesPoint]) -> f64 {
    let max = series.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Y-axis tick label. Fractional ticks are left blank for whole-number data.
fn y_label(value: f64, whole_numbers: bool) -> String {
    if !whole_numbers {
        format!("{:.1}", value)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        String::new()
    }
}

/// Log-axis bounds padded so the outermost points are not on the frame.
fn x_log_bounds(series: &[SeriesPoint]) -> (f64, f64) {
    let min = series
        .iter()
        .map(|p| p.thread_count)
        .min()
        .unwrap_or(1)
        .max(1) as f64;
    let max = series.iter().map(|p| p.thread_count).max().unwrap_or(1) as f64;
    (min / 1.5, max * 1.5)
}

fn draw_categorical(
    series: &[SeriesPoint],
    spec: &ChartSpec,
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let count = series.len() as u32;
    let labels: Vec<String> = series.iter().map(|p| p.thread_count.to_string()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..count).into_segmented(), 0f64..y_upper(series))?;

    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .x_labels(series.len() + 1)
        .x_label_formatter(&label_for)
        .y_label_formatter(&|y: &f64| y_label(*y, spec.whole_numbers))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .light_line_style(&BLACK.mix(0.05))
        .draw()?;

    let points: Vec<(SegmentValue<u32>, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (SegmentValue::CenterOf(i as u32), p.value))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), LINE_COLOR.stroke_width(2)))?
        .label(spec.series_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &LINE_COLOR));
    chart.draw_series(
        points
            .into_iter()
            .map(|p| Circle::new(p, POINT_RADIUS, LINE_COLOR.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_log(
    series: &[SeriesPoint],
    spec: &ChartSpec,
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = x_log_bounds(series);
    let ticks: Vec<f64> = series.iter().map(|p| p.thread_count as f64).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (x_min..x_max).log_scale().with_key_points(ticks),
            0f64..y_upper(series),
        )?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x: &f64| format!("{}", x.round()))
        .y_label_formatter(&|y: &f64| y_label(*y, spec.whole_numbers))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .light_line_style(&BLACK.mix(0.05))
        .draw()?;

    let points: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (p.thread_count as f64, p.value))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), LINE_COLOR.stroke_width(2)))?
        .label(spec.series_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &LINE_COLOR));
    chart.draw_series(
        points
            .into_iter()
            .map(|p| Circle::new(p, POINT_RADIUS, LINE_COLOR.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
