//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and the presets behind each `--mode`.

use crate::models::Pattern;
use crate::report::XAxis;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Threadplot - chart parallel simulation results against thread count
///
/// Reads the result logs written by a multi-threaded simulation run,
/// groups the numbers by thread count and writes an SVG line chart.
///
/// Examples:
///   threadplot --mode summary
///   threadplot --mode average res1.txt res2.txt res3.txt
///   threadplot --mode convergence --dir ./runs
///   threadplot --mode average --format json --report averages.json
///   threadplot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Result files to read
    ///
    /// Overrides the inputs of the selected mode (the summary file, the
    /// averaged run files, or the directory scan for convergence logs).
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Which workflow to run
    ///
    /// Can also be set via THREADPLOT_MODE or .threadplot.toml.
    #[arg(short, long, value_name = "MODE", env = "THREADPLOT_MODE")]
    pub mode: Option<Mode>,

    /// Directory to scan for convergence logs
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File-name prefix of convergence logs
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Output path for the SVG chart
    ///
    /// Defaults to threadplot_<mode>.svg in the current directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip chart rendering and only print the summary
    #[arg(long)]
    pub no_chart: bool,

    /// Summary format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the JSON summary to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Chart title
    #[arg(long)]
    pub title: Option<String>,

    /// Chart width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Chart height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .threadplot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .threadplot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text table (default)
    #[default]
    Text,
    /// JSON document with the aggregate and the plotted series
    Json,
}

/// Workflow presets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plot every record of a single summary file as read
    Summary,
    /// Average run times across several result files
    #[default]
    Average,
    /// Plot the first iteration reaching 100% defectors per thread count
    Convergence,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Summary => "summary",
            Mode::Average => "average",
            Mode::Convergence => "convergence",
        }
    }

    /// Line pattern the mode's input files follow.
    pub fn pattern(&self) -> Pattern {
        match self {
            Mode::Summary | Mode::Average => Pattern::RawTime,
            Mode::Convergence => Pattern::Convergence,
        }
    }

    /// Whether values are collapsed to one mean per thread count.
    pub fn averaging(&self) -> bool {
        !matches!(self, Mode::Summary)
    }

    /// Convergence runs double the thread count each step, so they get a log axis.
    pub fn x_axis(&self) -> XAxis {
        match self {
            Mode::Summary | Mode::Average => XAxis::Categorical,
            Mode::Convergence => XAxis::Log,
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Mode::Summary => "Parallel Population Protocol Execution Time",
            Mode::Average => "Average Time per Number of Threads",
            Mode::Convergence => "Convergence Speed vs Number of Threads",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            Mode::Summary => "Execution Time (ms)",
            Mode::Average => "Average Time (ms)",
            Mode::Convergence => "Iteration Number (Convergence)",
        }
    }

    pub fn series_label(&self) -> &'static str {
        match self {
            Mode::Summary => "Execution Time",
            Mode::Average => "Average Time",
            Mode::Convergence => "Convergence Iteration",
        }
    }

    /// Heading printed above the console table.
    pub fn table_heading(&self) -> &'static str {
        match self {
            Mode::Summary => "Execution time for each run:",
            Mode::Average => "Average run time for each thread count:",
            Mode::Convergence => "Convergence iteration for each thread count:",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.report.is_some() && self.format != OutputFormat::Json {
            return Err("--report requires --format json".to_string());
        }

        if self.no_chart && self.output.is_some() {
            return Err("Cannot use both --no-chart and --output".to_string());
        }

        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(px) = value {
                if px < 100 {
                    return Err(format!("Chart {} must be at least 100 pixels", name));
                }
            }
        }

        if let Some(ref prefix) = self.prefix {
            if prefix.is_empty() {
                return Err("Prefix must not be empty".to_string());
            }
        }

        if let Some(ref dir) = self.dir {
            if !dir.is_dir() {
                return Err(format!("Directory does not exist: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            files: Vec::new(),
            mode: None,
            dir: None,
            prefix: None,
            output: None,
            no_chart: false,
            format: OutputFormat::Text,
            report: None,
            title: None,
            width: None,
            height: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "threadplot",
            "--mode",
            "convergence",
            "--dir",
            ".",
            "-o",
            "conv.svg",
            "a.txt",
            "b.txt",
        ])
        .unwrap();

        assert_eq!(args.mode, Some(Mode::Convergence));
        assert_eq!(args.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(args.output, Some(PathBuf::from("conv.svg")));
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_report_needs_json() {
        let mut args = make_args();
        args.report = Some(PathBuf::from("out.json"));
        assert!(args.validate().is_err());

        args.format = OutputFormat::Json;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_chart_size() {
        let mut args = make_args();
        args.width = Some(20);
        assert!(args.validate().is_err());

        args.width = Some(800);
        args.height = Some(500);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_dir() {
        let mut args = make_args();
        args.dir = Some(PathBuf::from("/no/such/results/dir"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_mode_presets() {
        assert_eq!(Mode::default(), Mode::Average);

        assert_eq!(Mode::Summary.pattern(), Pattern::RawTime);
        assert!(!Mode::Summary.averaging());
        assert_eq!(Mode::Summary.x_axis(), XAxis::Categorical);

        assert!(Mode::Average.averaging());

        assert_eq!(Mode::Convergence.pattern(), Pattern::Convergence);
        assert_eq!(Mode::Convergence.x_axis(), XAxis::Log);
    }
}
