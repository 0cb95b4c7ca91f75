//! Console and JSON summaries.
//!
//! The text table is what gets printed before the chart is written; the
//! JSON form carries the same numbers plus the raw grouped values.

use crate::models::{Pattern, Report, SeriesPoint};
use anyhow::Result;

/// Generate the plain-text summary table, one line per series point.
pub fn generate_summary_table(
    heading: &str,
    series: &[SeriesPoint],
    pattern: Pattern,
    averaged: bool,
) -> String {
    let mut output = String::new();

    output.push_str(heading);
    output.push('\n');

    for point in series {
        output.push_str(&format_point(point, pattern, averaged));
        output.push('\n');
    }

    output
}

fn format_point(point: &SeriesPoint, pattern: Pattern, averaged: bool) -> String {
    match (pattern, averaged) {
        (Pattern::RawTime, true) => format!(
            "{} Threads: {:.2} {}",
            point.thread_count,
            point.value,
            pattern.unit()
        ),
        (Pattern::RawTime, false) => format!(
            "{} Threads: {:.0} {}",
            point.thread_count,
            point.value,
            pattern.unit()
        ),
        (Pattern::Convergence, _) => {
            format!("{} Threads: iteration {}", point.thread_count, point.value)
        }
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aggregate, ReportMetadata, ResultRecord};
    use chrono::Utc;
    use std::path::PathBuf;

    fn point(thread_count: u32, value: f64) -> SeriesPoint {
        SeriesPoint {
            thread_count,
            value,
        }
    }

    #[test]
    fn test_average_table() {
        let table = generate_summary_table(
            "Average run time for each thread count:",
            &[point(2, 150.0), point(4, 50.0)],
            Pattern::RawTime,
            true,
        );

        assert_eq!(
            table,
            "Average run time for each thread count:\n2 Threads: 150.00 ms\n4 Threads: 50.00 ms\n"
        );
    }

    #[test]
    fn test_raw_table_and_convergence_table() {
        let raw = generate_summary_table("Runs:", &[point(1, 74.0)], Pattern::RawTime, false);
        assert!(raw.contains("1 Threads: 74 ms"));

        let conv = generate_summary_table(
            "Convergence:",
            &[point(8, 12.0), point(16, 7.5)],
            Pattern::Convergence,
            true,
        );
        assert!(conv.contains("8 Threads: iteration 12\n"));
        assert!(conv.contains("16 Threads: iteration 7.5\n"));
    }

    #[test]
    fn test_generate_json_report() {
        let aggregate: Aggregate = [(2, 100), (2, 200), (4, 50)]
            .into_iter()
            .filter_map(|(t, m)| ResultRecord::new(t, m))
            .collect();

        let report = Report {
            metadata: ReportMetadata {
                mode: "average".to_string(),
                pattern: Pattern::RawTime,
                averaged: true,
                inputs: vec![PathBuf::from("res1.txt")],
                chart_path: None,
                generated_at: Utc::now(),
            },
            aggregate,
            series: vec![point(2, 150.0), point(4, 50.0)],
        };

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["pattern"], "raw_time");
        assert_eq!(value["aggregate"]["2"], serde_json::json!([100, 200]));
        assert_eq!(value["series"][0]["value"], 150.0);
        assert!(value["metadata"].get("chart_path").is_none());
    }
}
