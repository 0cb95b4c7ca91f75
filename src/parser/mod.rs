//! Line-level parsing of result logs.
//!
//! Every function here is infallible: a line that does not carry the
//! expected pattern yields [`LineMatch::NoMatch`] and is skipped by the
//! caller.

use crate::models::ResultRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;
use tracing::trace;

/// `"1 Threads | 74 ms"`; the simulator omits the space after the bar.
static THREADS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s+Threads\s*\|\s*(\d+)\s+ms").expect("valid threads-line regex")
});

/// `"... Defector: 100.00% ..."` anywhere in the line.
static DEFECTOR_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Defector: (\d+\.\d+)%").expect("valid defector regex"));

/// Percentage that marks full convergence, compared exactly.
pub const CONVERGED_PERCENT: f64 = 100.0;

/// Outcome of parsing a single line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineMatch<T> {
    Parsed(T),
    NoMatch,
}

impl<T> LineMatch<T> {
    /// Converts into an `Option`, dropping the no-match case.
    pub fn into_option(self) -> Option<T> {
        match self {
            LineMatch::Parsed(value) => Some(value),
            LineMatch::NoMatch => None,
        }
    }
}

impl<T> From<Option<T>> for LineMatch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => LineMatch::Parsed(v),
            None => LineMatch::NoMatch,
        }
    }
}

/// Parse a raw-time line into a record.
///
/// Accepts the full `"<N> Threads | <M> ms"` form first, then the compact
/// `"<N> | <M>"` form where each side of the bar may carry trailing tokens.
pub fn parse_time_line(line: &str) -> LineMatch<ResultRecord> {
    let line = line.trim();
    if line.is_empty() {
        return LineMatch::NoMatch;
    }

    let parsed = parse_threads_form(line).or_else(|| parse_compact_form(line));
    if parsed.is_none() {
        trace!("Skipping unrecognized line: {:?}", line);
    }
    parsed.into()
}

fn parse_threads_form(line: &str) -> Option<ResultRecord> {
    let caps = THREADS_LINE.captures(line)?;
    let threads = caps[1].parse::<u32>().ok()?;
    let metric = caps[2].parse::<u64>().ok()?;
    ResultRecord::new(threads, metric)
}

fn parse_compact_form(line: &str) -> Option<ResultRecord> {
    let (left, right) = line.split_once('|')?;
    let threads = left.split_whitespace().next()?.parse::<u32>().ok()?;
    let metric = right.split_whitespace().next()?.parse::<u64>().ok()?;
    ResultRecord::new(threads, metric)
}

/// Extract the defector percentage reported on a line, if any.
pub fn parse_defector_percent(line: &str) -> LineMatch<f64> {
    DEFECTOR_MARKER
        .captures(line.trim())
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .into()
}

/// True when the line reports exactly 100% defectors.
pub fn is_converged_line(line: &str) -> bool {
    parse_defector_percent(line)
        .into_option()
        .is_some_and(|percent| percent == CONVERGED_PERCENT)
}

/// Index (0-based, blank lines included) of the first converged line.
///
/// Returns `Ok(None)` when no line reaches full convergence.
pub fn first_convergence<R: BufRead>(reader: R) -> std::io::Result<Option<usize>> {
    for (index, line) in reader.lines().enumerate() {
        if is_converged_line(&line?) {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
