//! `--config` file loading

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use linepunch_engine::DetectionOptions;
use linepunch_report::AnalyzeOptions;
use serde::Deserialize;

/// Settings read from a TOML file
///
/// ```toml
/// [detection]
/// header_scan_up = 30
/// header_min_width = 4
///
/// [analyze]
/// max_cells_per_sheet = 5000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub detection: DetectionOptions,
    pub analyze: AnalyzeOptions,
}

impl Config {
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let detection = &self.detection;
        ensure!(
            (0.0..=1.0).contains(&detection.header_threshold_ratio),
            "detection.header_threshold_ratio must be between 0 and 1"
        );
        ensure!(
            detection.width_hard_cap > 0,
            "detection.width_hard_cap must be at least 1"
        );
        ensure!(
            detection.header_scan_cols > 0 && detection.vertical_scan_cols > 0,
            "detection scan widths must be at least 1"
        );
        ensure!(
            !self.analyze.extensions.is_empty(),
            "analyze.extensions must name at least one extension"
        );
        Ok(())
    }
}
