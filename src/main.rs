//! Threadplot - thread-count charts for parallel simulation logs
//!
//! A CLI tool that reads the result files written by a multi-threaded
//! simulation, groups execution times or convergence iterations by
//! thread count, prints a summary table and renders an SVG line chart.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (missing input file, no data points, bad config, render failure)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod parser;
mod report;
mod scanner;

use analysis::AggregateConfig;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Mode, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{Pattern, Report, ReportMetadata};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("Threadplot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .threadplot.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change input files, chart size and titles.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` wins when set.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Aggregate the inputs, print the summary and render the chart.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let mode = config.general.mode;
    let input_paths = resolve_inputs(&config, &args.files)?;

    println!(
        "📂 Reading {} file(s) in {} mode...",
        input_paths.len(),
        mode.name()
    );
    for path in &input_paths {
        debug!("Input: {}", path.display());
    }

    let aggregate_config = AggregateConfig {
        input_paths,
        pattern: mode.pattern(),
        prefix: config.input.prefix.clone(),
    };
    let (aggregate, series) = analysis::build_series(&aggregate_config, mode.averaging())
        .context("Aggregation failed")?;

    let mut chart_path = None;
    for step in output_steps(args.format, args.report.is_some(), config.chart.enabled) {
        match step {
            OutputStep::SummaryTable => {
                println!();
                print!(
                    "{}",
                    report::generate_summary_table(
                        mode.table_heading(),
                        &series,
                        mode.pattern(),
                        mode.averaging()
                    )
                );
            }
            OutputStep::Chart => {
                let path = config.chart_path();
                report::render_chart(&series, &chart_spec(mode, &config), &path)?;
                println!("\n📈 Chart saved to: {}", path.display());
                chart_path = Some(path);
            }
            OutputStep::JsonReport => {
                let report = Report {
                    metadata: ReportMetadata {
                        mode: mode.name().to_string(),
                        pattern: mode.pattern(),
                        averaged: mode.averaging(),
                        inputs: aggregate_config.input_paths.clone(),
                        chart_path: chart_path.clone(),
                        generated_at: Utc::now(),
                    },
                    aggregate: aggregate.clone(),
                    series: series.clone(),
                };
                let json = report::generate_json_report(&report)?;

                match args.report {
                    Some(ref path) => {
                        std::fs::write(path, &json).with_context(|| {
                            format!("Failed to write report to {}", path.display())
                        })?;
                        println!("📝 Report saved to: {}", path.display());
                    }
                    None => println!("{}", json),
                }
            }
        }
    }

    if !config.chart.enabled {
        info!("Chart rendering disabled");
    }

    Ok(())
}

/// One piece of output produced after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputStep {
    SummaryTable,
    Chart,
    JsonReport,
}

/// Order of the outputs for a run.
///
/// The table comes first, then the chart, then the JSON report (which needs
/// the chart path). JSON going to stdout replaces the table.
fn output_steps(format: OutputFormat, report_to_file: bool, chart: bool) -> Vec<OutputStep> {
    let json = format == OutputFormat::Json;
    let mut steps = Vec::with_capacity(3);

    if !json || report_to_file {
        steps.push(OutputStep::SummaryTable);
    }
    if chart {
        steps.push(OutputStep::Chart);
    }
    if json {
        steps.push(OutputStep::JsonReport);
    }
    steps
}

/// Build the chart description for a mode.
fn chart_spec(mode: Mode, config: &Config) -> report::ChartSpec {
    report::ChartSpec {
        title: config.chart_title(),
        x_label: "Number of Threads".to_string(),
        y_label: mode.y_label().to_string(),
        series_label: mode.series_label().to_string(),
        x_axis: mode.x_axis(),
        whole_numbers: mode.pattern() == Pattern::Convergence,
        width: config.chart.width,
        height: config.chart.height,
    }
}

/// Decide which files to read: explicit arguments first, then the mode's preset.
fn resolve_inputs(config: &Config, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }

    let inputs = match config.general.mode {
        Mode::Summary => vec![PathBuf::from(&config.input.summary_file)],
        Mode::Average => config
            .input
            .average_files
            .iter()
            .map(PathBuf::from)
            .collect(),
        Mode::Convergence => {
            let scan_config = scanner::ScanConfig::from(&config.input);
            let found = scanner::ResultScanner::new(scan_config).scan()?;
            if found.is_empty() {
                warn!(
                    "No {}*.txt files in {}",
                    config.input.prefix, config.input.directory
                );
            }
            found
        }
    };

    Ok(inputs)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
