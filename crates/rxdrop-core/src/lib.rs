//! Shared domain types and runtime configuration for the rxdrop workspace.

mod app_config;
mod config;
mod search;
mod sites;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_log_level};
pub use search::{SearchRadius, ZipCode};
pub use sites::SiteRecord;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised while validating a caller's search request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("zipCode is required")]
    MissingZipCode,

    #[error("invalid ZIP code \"{0}\": expected 5 digits or ZIP+4")]
    InvalidZipCode(String),

    #[error("invalid radius \"{0}\": must be one of 5, 10, 20, 50")]
    UnsupportedRadius(String),
}
