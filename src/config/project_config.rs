//! Project-level configuration support
//!
//! Loads configuration from `ews.toml` next to the scored data file, or from
//! an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # ews.toml
//!
//! [alert]
//! default_rate = 0.30
//! min_rate = 0.10
//! max_rate = 0.50
//! step = 0.05
//!
//! [data]
//! score_column = "ews_score"
//! outcome_column = "default_6m"
//! id_column = "loan_id"
//!
//! [report]
//! top_n = 50
//! histogram_bins = 50
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILENAME: &str = "ews.toml";

/// Example config written by `ews init`
pub const EXAMPLE_CONFIG: &str = r#"# Early-warning monitor configuration

[alert]
# Alert rate used when --rate is not given (fraction of portfolio flagged)
default_rate = 0.30
# Range the operator may choose from (inclusive)
min_rate = 0.10
max_rate = 0.50
# Grid step for `ews sweep`
step = 0.05

[data]
# CSV column holding the early-warning score (higher = riskier)
score_column = "ews_score"
# CSV column holding the observed outcome (0/1, true/false)
outcome_column = "default_6m"
# Optional identifier column; row numbers are used when it is missing
id_column = "loan_id"

[report]
# Rows in the flagged-accounts table
top_n = 50
# Bins in the score distribution histogram
histogram_bins = 50
"#;

/// Complete project configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub alert: AlertSettings,
    pub data: DataConfig,
    pub report: ReportSettings,
}

/// Operator alert-rate settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertSettings {
    pub default_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    pub step: f64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            default_rate: 0.30,
            min_rate: 0.10,
            max_rate: 0.50,
            step: 0.05,
        }
    }
}

/// CSV column mapping
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub score_column: String,
    pub outcome_column: String,
    pub id_column: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            score_column: "ews_score".to_string(),
            outcome_column: "default_6m".to_string(),
            id_column: Some("loan_id".to_string()),
        }
    }
}

/// Report defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 50,
            histogram_bins: 50,
        }
    }
}

impl ProjectConfig {
    /// Check internal consistency of the settings
    pub fn validate(&self) -> Result<()> {
        let a = &self.alert;
        if !(a.min_rate > 0.0 && a.min_rate <= a.default_rate) {
            bail!(
                "alert.min_rate must be in (0, default_rate], got {} (default_rate {})",
                a.min_rate,
                a.default_rate
            );
        }
        if !(a.default_rate <= a.max_rate && a.max_rate < 1.0) {
            bail!(
                "alert.max_rate must be in [default_rate, 1), got {} (default_rate {})",
                a.max_rate,
                a.default_rate
            );
        }
        if !(a.step > 0.0) {
            bail!("alert.step must be positive, got {}", a.step);
        }
        if self.report.histogram_bins == 0 {
            bail!("report.histogram_bins must be at least 1");
        }
        if self.data.score_column.trim().is_empty() || self.data.outcome_column.trim().is_empty() {
            bail!("data.score_column and data.outcome_column must not be empty");
        }
        Ok(())
    }

    /// Resolve the alert rate for a run: explicit value or the default,
    /// which must lie inside the configured operator range.
    pub fn resolve_rate(&self, requested: Option<f64>) -> Result<f64> {
        let rate = requested.unwrap_or(self.alert.default_rate);
        // Small tolerance so 0.1 + 0.05 style values typed by hand still pass
        let eps = 1e-9;
        if !(rate + eps >= self.alert.min_rate && rate - eps <= self.alert.max_rate) {
            bail!(
                "alert rate {} is outside the allowed range [{}, {}]",
                rate,
                self.alert.min_rate,
                self.alert.max_rate
            );
        }
        Ok(rate)
    }
}

/// Load configuration from an explicit file, or `ews.toml` in `dir`.
///
/// An explicit path must exist and parse. The implicit file falls back to
/// defaults (with a warning) when it cannot be read or parsed.
pub fn load_project_config(explicit: Option<&Path>, dir: &Path) -> Result<ProjectConfig> {
    let config = match explicit {
        Some(path) => {
            let config = load_toml_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            debug!("Loaded project config from {}", path.display());
            config
        }
        None => {
            let toml_path = dir.join(CONFIG_FILENAME);
            if toml_path.exists() {
                match load_toml_config(&toml_path) {
                    Ok(config) => {
                        debug!("Loaded project config from {}", toml_path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Failed to load {}: {}", toml_path.display(), e);
                        ProjectConfig::default()
                    }
                }
            } else {
                debug!("No project config found, using defaults");
                ProjectConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}
