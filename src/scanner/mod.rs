//! Discovery of per-thread-count result files.
//!
//! Convergence logs are written one per run as `<prefix><N>.txt`
//! (`results_threads_<N>.txt` by default); this module finds them in a
//! directory and reads the thread count back out of the file name.

use crate::error::AggregateError;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Prefix of per-run convergence logs.
pub const DEFAULT_PREFIX: &str = "results_threads_";

/// Suffix of every result file.
pub const RESULT_SUFFIX: &str = ".txt";

/// Configuration for result-file discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory to list (not recursed into).
    pub directory: PathBuf,
    /// Required file-name prefix.
    pub prefix: String,
    /// Required file-name suffix.
    pub suffix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: RESULT_SUFFIX.to_string(),
        }
    }
}

impl From<&crate::config::InputConfig> for ScanConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            prefix: config.prefix.clone(),
            ..Self::default()
        }
    }
}

/// Finds result files in a single directory.
pub struct ResultScanner {
    config: ScanConfig,
}

impl ResultScanner {
    /// Create a new scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// List matching files, sorted by file name.
    pub fn scan(&self) -> Result<Vec<PathBuf>, AggregateError> {
        let dir = &self.config.directory;
        if !dir.is_dir() {
            return Err(AggregateError::Scan {
                path: dir.clone(),
                message: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| AggregateError::Scan {
                path: dir.clone(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if self.matches(&name) {
                files.push(entry.into_path());
            } else {
                debug!("Ignoring {}", name);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("Found {} result files in {}", files.len(), dir.display());
        Ok(files)
    }

    /// Check a file name against the prefix and suffix filter.
    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.config.prefix) && name.ends_with(&self.config.suffix)
    }
}

/// Matches `<prefix><N>.txt` file names and yields `N`.
#[derive(Debug, Clone)]
pub struct ThreadCountPattern {
    regex: Regex,
}

impl ThreadCountPattern {
    /// Build the file-name pattern for a prefix, taken literally.
    pub fn new(prefix: &str) -> Result<Self, AggregateError> {
        let source = format!(
            r"^{}(\d+){}$",
            regex::escape(prefix),
            regex::escape(RESULT_SUFFIX)
        );
        let regex = Regex::new(&source).map_err(|e| AggregateError::InvalidPrefix {
            prefix: prefix.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Read the thread count out of a file name; `None` when absent or zero.
    pub fn thread_count(&self, path: &Path) -> Option<u32> {
        let name = path.file_name()?.to_str()?;
        let caps = self.regex.captures(name)?;
        caps[1].parse::<u32>().ok().filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_thread_count_from_file_name() {
        let pattern = ThreadCountPattern::new(DEFAULT_PREFIX).unwrap();
        let count = |name: &str| pattern.thread_count(Path::new(name));

        assert_eq!(count("results_threads_16.txt"), Some(16));
        assert_eq!(count("runs/a/results_threads_1.txt"), Some(1));
        assert_eq!(count("results_threads_x.txt"), None);
        assert_eq!(count("results_threads_0.txt"), None);
        assert_eq!(count("results_summary.txt"), None);
    }

    #[test]
    fn test_thread_count_with_custom_prefix() {
        let pattern = ThreadCountPattern::new("run.threads+").unwrap();

        assert_eq!(pattern.thread_count(Path::new("run.threads+8.txt")), Some(8));
        // The prefix is literal, not a regex.
        assert_eq!(pattern.thread_count(Path::new("runXthreadsss8.txt")), None);
        assert_eq!(
            pattern.thread_count(Path::new("results_threads_8.txt")),
            None
        );
    }

    #[test]
    fn test_scan_and_read_custom_prefix() {
        let dir = TempDir::new().unwrap();
        for name in ["run_threads_4.txt", "run_threads_32.txt", "results_threads_2.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = ResultScanner::new(ScanConfig {
            directory: dir.path().to_path_buf(),
            prefix: "run_threads_".to_string(),
            ..ScanConfig::default()
        })
        .scan()
        .unwrap();

        let pattern = ThreadCountPattern::new("run_threads_").unwrap();
        let counts: Vec<Option<u32>> = files.iter().map(|p| pattern.thread_count(p)).collect();
        assert_eq!(counts, vec![Some(32), Some(4)]);
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in [
            "results_threads_8.txt",
            "results_threads_1.txt",
            "results_threads_16.txt",
            "results_summary.txt",
            "results_threads_2.log",
            "notes.md",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("results_threads_4.txt")).unwrap();

        let scanner = ResultScanner::new(ScanConfig {
            directory: dir.path().to_path_buf(),
            ..ScanConfig::default()
        });
        let names: Vec<String> = scanner
            .scan()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        // Lexical order; numeric ordering happens after aggregation.
        assert_eq!(
            names,
            vec![
                "results_threads_1.txt",
                "results_threads_16.txt",
                "results_threads_8.txt"
            ]
        );
    }

    #[test]
    fn test_scan_missing_directory() {
        let scanner = ResultScanner::new(ScanConfig {
            directory: PathBuf::from("/definitely/not/here"),
            ..ScanConfig::default()
        });
        let err = scanner.scan().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"));
    }
}
