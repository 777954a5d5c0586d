//! Error types for loading, configuration and export.
//!
//! The analytic core (filters, KPIs, costs) never fails; these errors only
//! come from the I/O boundary around it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Config file not found at path: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("No dataset loaded. Load the CSV file first (option 1).")]
    NoDataLoaded,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
