//! Dashboard configuration.
//!
//! Everything a page render needs besides the dataset: filter selections,
//! manual KPI inputs, the normalization unit and both cost rate tables.
//! The UI builds one of these per render and passes it down; no core
//! function reads global state.
//!
//! ## Loading order
//!
//! 1. `--config <path>` on the command line
//! 2. `PRODIGY_CONFIG` environment variable
//! 3. `dashboard.toml` in the current working directory
//! 4. Built-in defaults

use crate::cost::CostConfig;
use crate::error::{DashboardError, Result};
use crate::filters::{find_bin, FilterConfig, DEPTH_BINS, MUD_WEIGHT_BINS};
use crate::kpi::{ManualInputs, NormalizationUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "PRODIGY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub filters: FilterConfig,
    pub manual_inputs: ManualInputs,
    pub normalization: NormalizationUnit,
    pub cost: CostConfig,
}

impl DashboardConfig {
    /// Resolve and load the configuration, falling back to defaults when no
    /// file is configured or present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from_file(&PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_file(&local);
        }
        info!("No dashboard config found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DashboardError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents).map_err(|source| DashboardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), "Loaded dashboard config");
        debug!(?config, "Effective config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Reject values no render could make sense of.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(DashboardError::Configuration { message });

        if let Some(label) = self.filters.depth_bin.value() {
            if find_bin(&DEPTH_BINS, label).is_none() {
                return invalid(format!("unknown depth bin '{label}'"));
            }
        }
        if let Some(label) = self.filters.mud_weight_bin.value() {
            if find_bin(&MUD_WEIGHT_BINS, label).is_none() {
                return invalid(format!("unknown mud weight bin '{label}'"));
            }
        }
        if let Some((min, max)) = self.filters.year_range {
            if min > max {
                return invalid(format!("year range {min}..{max} is reversed"));
            }
        }
        if self.cost.marker.trim().is_empty() {
            return invalid("cost.marker must not be empty".to_string());
        }
        for label in [&self.cost.primary_label, &self.cost.secondary_label] {
            if label.trim().is_empty() {
                return invalid("cost category label must not be empty".to_string());
            }
        }
        if self.cost.primary_label == self.cost.secondary_label {
            return invalid(format!(
                "cost categories share the label '{}'",
                self.cost.primary_label
            ));
        }
        Ok(())
    }
}
