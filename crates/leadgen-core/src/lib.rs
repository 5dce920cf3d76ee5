pub mod app_config;
pub mod config;
pub mod export;
pub mod lead;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use export::{export_filename, to_csv, CSV_HEADERS, CSV_MIME_TYPE};
pub use lead::{Lead, LeadId, LeadStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid lead status transition: {from} -> {to}")]
    InvalidTransition { from: LeadStatus, to: LeadStatus },
}
