//! Report generation modules.
//!
//! This module provides the console table, the JSON report and the
//! SVG chart.

pub mod chart;
pub mod generator;

pub use chart::{render_chart, ChartSpec, XAxis};
pub use generator::{generate_json_report, generate_summary_table};
