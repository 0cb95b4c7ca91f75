//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.threadplot.toml` files.

use crate::cli::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".threadplot.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input file selection.
    #[serde(default)]
    pub input: InputConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Workflow to run when `--mode` is not given.
    #[serde(default)]
    pub mode: Mode,
}

/// Where each mode finds its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Single file plotted by the summary mode.
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// Files averaged by the average mode.
    #[serde(default = "default_average_files")]
    pub average_files: Vec<String>,

    /// Directory scanned by the convergence mode.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// File-name prefix of convergence logs.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            summary_file: default_summary_file(),
            average_files: default_average_files(),
            directory: default_directory(),
            prefix: default_prefix(),
        }
    }
}

fn default_summary_file() -> String {
    "results_summary.txt".to_string()
}

fn default_average_files() -> Vec<String> {
    (1..=5).map(|i| format!("res{}.txt", i)).collect()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_prefix() -> String {
    crate::scanner::DEFAULT_PREFIX.to_string()
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Render the chart at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Output path; `threadplot_<mode>.svg` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Title override; each mode has its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output: None,
            title: None,
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.threadplot.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(mode) = args.mode {
            self.general.mode = mode;
        }

        if let Some(ref dir) = args.dir {
            self.input.directory = dir.to_string_lossy().to_string();
        }
        if let Some(ref prefix) = args.prefix {
            self.input.prefix = prefix.clone();
        }

        if args.no_chart {
            self.chart.enabled = false;
        }
        if let Some(ref output) = args.output {
            self.chart.output = Some(output.to_string_lossy().to_string());
        }
        if let Some(ref title) = args.title {
            self.chart.title = Some(title.clone());
        }
        if let Some(width) = args.width {
            self.chart.width = width;
        }
        if let Some(height) = args.height {
            self.chart.height = height;
        }
    }

    /// Chart path for the active mode.
    pub fn chart_path(&self) -> PathBuf {
        match self.chart.output {
            Some(ref output) => PathBuf::from(output),
            None => PathBuf::from(format!("threadplot_{}.svg", self.general.mode.name())),
        }
    }

    /// Chart title for the active mode.
    pub fn chart_title(&self) -> String {
        self.chart
            .title
            .clone()
            .unwrap_or_else(|| self.general.mode.default_title().to_string())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, OutputFormat};
    use tempfile::TempDir;

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
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.mode, Mode::Average);
        assert_eq!(config.input.summary_file, "results_summary.txt");
        assert_eq!(
            config.input.average_files,
            vec!["res1.txt", "res2.txt", "res3.txt", "res4.txt", "res5.txt"]
        );
        assert_eq!(config.input.prefix, "results_threads_");
        assert!(config.chart.enabled);
        assert_eq!(config.chart_path(), PathBuf::from("threadplot_average.svg"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
mode = "convergence"

[input]
directory = "runs"

[chart]
title = "Speedup"
width = 800
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.mode, Mode::Convergence);
        assert_eq!(config.input.directory, "runs");
        assert_eq!(config.input.prefix, "results_threads_");
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, 600);
        assert_eq!(config.chart_title(), "Speedup");
        assert_eq!(
            config.chart_path(),
            PathBuf::from("threadplot_convergence.svg")
        );
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.mode = Some(Mode::Summary);
        args.output = Some(PathBuf::from("out/summary.svg"));
        args.width = Some(640);
        args.no_chart = true;

        config.merge_with_args(&args);

        assert_eq!(config.general.mode, Mode::Summary);
        assert_eq!(config.chart_path(), PathBuf::from("out/summary.svg"));
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 600);
        assert!(!config.chart.enabled);
        assert_eq!(
            config.chart_title(),
            "Parallel Population Protocol Execution Time"
        );
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[general]\nmode = \"summary\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.general.mode, Mode::Summary);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[general\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[chart]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.input.average_files.len(), 5);
    }
}
