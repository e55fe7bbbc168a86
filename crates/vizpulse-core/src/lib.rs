//! Shared domain types and configuration for vizpulse.
//!
//! Holds the snapshot and social-channel shapes that flow between the storage
//! adapter, the scoring crate and the HTTP/CLI surfaces, plus the freshness
//! policy that decides whether a snapshot can be shown without an "outdated"
//! treatment.

pub mod app_config;
pub mod config;
pub mod freshness;
pub mod snapshot;
pub mod social;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use freshness::{is_fresh, FRESHNESS_WINDOW_MINUTES};
pub use snapshot::{LatestSnapshot, RatingsDistribution, Snapshot, Staleness};
pub use social::SocialChannel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
