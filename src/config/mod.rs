//! Configuration module for the early-warning monitor
//!
//! This module handles:
//! - Project-level configuration (ews.toml)
//! - Operator alert-rate range and sweep grid
//! - CSV column mapping
//! - Report defaults

mod project_config;

pub use project_config::{
    load_project_config, AlertSettings, DataConfig, ProjectConfig, ReportSettings,
    CONFIG_FILENAME, EXAMPLE_CONFIG,
};
