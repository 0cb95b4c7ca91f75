//! Aggregation of parsed records and per-thread-count statistics.
//!
//! [`aggregate`] is a pure function of its [`AggregateConfig`] and the
//! contents of the files it names. Files are read one at a time, each
//! handle dropped before the next file is opened.

use crate::error::AggregateError;
use crate::models::{Aggregate, Pattern, ResultRecord, SeriesPoint};
use crate::parser::{self, LineMatch};
use crate::scanner::ThreadCountPattern;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to read and how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Files to read, in order.
    pub input_paths: Vec<PathBuf>,
    /// Line pattern to apply.
    pub pattern: Pattern,
    /// File-name prefix in front of the thread count of convergence logs.
    pub prefix: String,
}

/// Read every input file and group its records by thread count.
pub fn aggregate(config: &AggregateConfig) -> Result<Aggregate, AggregateError> {
    let mut aggregate = Aggregate::new();
    let names = match config.pattern {
        Pattern::RawTime => None,
        Pattern::Convergence => Some(ThreadCountPattern::new(&config.prefix)?),
    };

    for path in &config.input_paths {
        let before = aggregate.value_count();
        match names {
            None => aggregate_time_file(path, &mut aggregate)?,
            Some(ref names) => aggregate_convergence_file(path, names, &mut aggregate)?,
        }
        debug!(
            "{}: {} value(s)",
            path.display(),
            aggregate.value_count() - before
        );
    }

    info!(
        "Aggregated {} value(s) across {} thread count(s) from {} file(s)",
        aggregate.value_count(),
        aggregate.len(),
        config.input_paths.len()
    );
    Ok(aggregate)
}

fn open(path: &Path) -> Result<BufReader<File>, AggregateError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| AggregateError::read(path, e))
}

/// Append every raw-time record in the file.
fn aggregate_time_file(path: &Path, aggregate: &mut Aggregate) -> Result<(), AggregateError> {
    let reader = open(path)?;
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line.map_err(|e| AggregateError::read(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match parser::parse_time_line(&line) {
            LineMatch::Parsed(record) => aggregate.push(record),
            LineMatch::NoMatch => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("{}: skipped {} unrecognized line(s)", path.display(), skipped);
    }
    Ok(())
}

/// Record the first convergence iteration, keyed by the file name's thread count.
fn aggregate_convergence_file(
    path: &Path,
    names: &ThreadCountPattern,
    aggregate: &mut Aggregate,
) -> Result<(), AggregateError> {
    let thread_count = names
        .thread_count(path)
        .ok_or_else(|| AggregateError::ThreadCountFromName {
            path: path.to_path_buf(),
        })?;

    let reader = open(path)?;
    let iteration = parser::first_convergence(reader).map_err(|e| AggregateError::read(path, e))?;

    match iteration.and_then(|i| ResultRecord::new(thread_count, i as u64)) {
        Some(record) => aggregate.push(record),
        None => warn!(
            "{}: convergence not reached, no data point for {} thread(s)",
            path.display(),
            thread_count
        ),
    }
    Ok(())
}

/// Arithmetic mean of a non-empty slice.
pub fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|v| *v as f64).sum();
    Some(sum / values.len() as f64)
}

/// Flatten an aggregate into the series handed to the renderer.
///
/// With `averaging` each thread count becomes one point holding its mean.
/// Without it every raw value becomes a point; points of the same thread
/// count keep the order they were read in.
pub fn summarize(aggregate: &Aggregate, averaging: bool) -> Vec<SeriesPoint> {
    let mut series = Vec::with_capacity(aggregate.value_count());

    for (thread_count, values) in aggregate.iter() {
        if averaging {
            if let Some(value) = mean(values) {
                series.push(SeriesPoint {
                    thread_count,
                    value,
                });
            }
        } else {
            series.extend(values.iter().map(|v| SeriesPoint {
                thread_count,
                value: *v as f64,
            }));
        }
    }

    series
}

/// Aggregate and summarize in one step, failing when nothing matched.
pub fn build_series(
    config: &AggregateConfig,
    averaging: bool,
) -> Result<(Aggregate, Vec<SeriesPoint>), AggregateError> {
    let aggregate = aggregate(config)?;
    if aggregate.is_empty() {
        return Err(AggregateError::EmptyAggregate {
            files: config.input_paths.len(),
        });
    }
    let series = summarize(&aggregate, averaging);
    Ok((aggregate, series))
}
