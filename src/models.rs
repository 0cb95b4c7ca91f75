//! Data models for the log aggregator.
//!
//! This module contains the core data structures shared by the parser,
//! the aggregator and the report generators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which kind of result file is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// One `"<N> Threads | <M> ms"` record per line.
    RawTime,
    /// Free-form log where a line may report `"Defector: <P>%"`.
    Convergence,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::RawTime => write!(f, "raw-time"),
            Pattern::Convergence => write!(f, "convergence"),
        }
    }
}

impl Pattern {
    /// Unit label used when printing a value of this kind.
    pub fn unit(&self) -> &'static str {
        match self {
            Pattern::RawTime => "ms",
            Pattern::Convergence => "iterations",
        }
    }
}

/// A single (thread count, metric) pair parsed from one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Number of worker threads, always positive.
    pub thread_count: u32,
    /// Execution time in milliseconds or a convergence iteration index.
    pub metric: u64,
}

impl ResultRecord {
    /// Builds a record, rejecting a zero thread count.
    pub fn new(thread_count: u32, metric: u64) -> Option<Self> {
        if thread_count == 0 {
            return None;
        }
        Some(Self {
            thread_count,
            metric,
        })
    }
}

/// Raw metric values grouped by thread count.
///
/// Keys only exist once a value has been pushed for them, so every list is
/// non-empty. Iteration order is ascending thread count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregate {
    groups: BTreeMap<u32, Vec<u64>>,
}

impl Aggregate {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record's metric to its thread-count group.
    pub fn push(&mut self, record: ResultRecord) {
        self.groups
            .entry(record.thread_count)
            .or_default()
            .push(record.metric);
    }

    /// Values recorded for one thread count.
    #[cfg(test)]
    pub fn get(&self, thread_count: u32) -> Option<&[u64]> {
        self.groups.get(&thread_count).map(Vec::as_slice)
    }

    /// Iterates groups in ascending thread-count order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u64])> {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Number of distinct thread counts.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of raw values across all groups.
    pub fn value_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl FromIterator<ResultRecord> for Aggregate {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        for record in iter {
            aggregate.push(record);
        }
        aggregate
    }
}

/// One point of the series handed to the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub thread_count: u32,
    pub value: f64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Preset the run used (summary, average, convergence).
    pub mode: String,
    /// Pattern applied to the input lines.
    pub pattern: Pattern,
    /// Whether values were averaged per thread count.
    pub averaged: bool,
    /// Files that were read, in order.
    pub inputs: Vec<PathBuf>,
    /// Where the chart was written, if it was rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<PathBuf>,
    /// Date and time of the run.
    pub generated_at: DateTime<Utc>,
}

/// Complete output of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Raw values grouped by thread count.
    pub aggregate: Aggregate,
    /// Ordered series as plotted.
    pub series: Vec<SeriesPoint>,
}
