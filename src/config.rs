// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline configuration.
//!
//! Tunables are read from a YAML file named by `BEATLINE_CONFIG`, or from
//! `beatline.yaml` in the working directory. Missing fields take defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "BEATLINE_CONFIG";
pub const CONFIG_FILE: &str = "beatline.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Smallest span a drag may leave a beat with, in percent.
    pub min_span_pct: f64,
    /// Template seeds narrower than this get widened.
    pub template_min_span_pct: f64,
    /// Amount a narrow template seed is widened by.
    pub template_widen_pct: f64,
    /// Rendered beats are never shorter than this.
    pub min_visible_px: f32,
    /// Height of a beat collapsed into a single act header.
    pub collapsed_marker_px: f32,
    pub hook_label: String,
    pub hook_color: String,
    pub hook_span_pct: f64,
    pub mutation_debounce_ms: u64,
    pub startup_retry_ms: Vec<u64>,
    /// Restrict drags to the acts a beat currently spans.
    pub act_containment: bool,
    /// Re-anchor moved endpoints to the outline when a drag is committed,
    /// snapping them to the elements they were dropped on. Otherwise a
    /// commit clears the beat's anchors and the dropped percentages stand.
    pub reanchor_on_drag: bool,
    pub autosave_debounce_ms: u64,
    pub default_template: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_span_pct: 1.0,
            template_min_span_pct: 1.0,
            template_widen_pct: 2.0,
            min_visible_px: 20.0,
            collapsed_marker_px: 20.0,
            hook_label: "Hook".to_string(),
            hook_color: "#f59e0b".to_string(),
            hook_span_pct: 2.0,
            mutation_debounce_ms: 50,
            startup_retry_ms: vec![100, 300, 600, 1000],
            act_containment: false,
            reanchor_on_drag: false,
            autosave_debounce_ms: 2000,
            default_template: crate::models::template::DEFAULT_TEMPLATE_ID.to_string(),
        }
    }
}

impl TimelineConfig {
    pub fn mutation_debounce(&self) -> Duration {
        Duration::from_millis(self.mutation_debounce_ms)
    }

    pub fn startup_retries(&self) -> Vec<Duration> {
        self.startup_retry_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    /// Parse a configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Load the configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(CONFIG_FILE);
                local.exists().then_some(local)
            });

        match path {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::error!("{:#}; using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: TimelineConfig =
            serde_yaml::from_str("min_visible_px: 32.0\nact_containment: true\n").unwrap();
        assert_eq!(config.min_visible_px, 32.0);
        assert!(config.act_containment);
        assert_eq!(config.hook_label, "Hook");
        assert_eq!(config.startup_retry_ms, vec![100, 300, 600, 1000]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = std::env::temp_dir().join("beatline-config-does-not-exist.yaml");
        assert!(TimelineConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_durations() {
        let config = TimelineConfig::default();
        assert_eq!(config.mutation_debounce(), Duration::from_millis(50));
        assert_eq!(config.startup_retries().len(), 4);
        assert_eq!(config.startup_retries()[3], Duration::from_millis(1000));
    }
}
