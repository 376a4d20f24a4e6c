use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Everything the dashboard needs from outside: where the data lives and a
/// few display parameters. Every key is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset file; relative paths are resolved against the config file's directory.
    pub data_path: PathBuf,
    /// Buckets in the salary histogram.
    pub histogram_bins: usize,
    /// Job titles shown in the top-salaries chart.
    pub top_n: usize,
    /// Job title used for the per-country salary chart.
    pub focus_job_title: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("dados_imersao.csv"),
            histogram_bins: 30,
            top_n: 10,
            focus_job_title: "Data Scientist".to_string(),
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        if config.data_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_path = dir.join(&config.data_path);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Pick the configuration for this run.
    ///
    /// An explicit path must exist. Otherwise [`DEFAULT_CONFIG_FILE`] in `dir`
    /// is used when present, else the built-in defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_json_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            log::info!("Using config file {}", candidate.display());
            return Self::from_json_file(&candidate);
        }
        log::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        Ok(())
    }
}
