//! Shared domain types and configuration for the shopfeed workspace.
//!
//! [`CanonicalProduct`] is the one record shape every source is normalized
//! into; [`ImportPayload`] is its catalog-import projection.

pub mod app_config;
pub mod config;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{CanonicalProduct, ImportPayload, ProductDraft};

/// Reasons a scraped draft cannot become a [`CanonicalProduct`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("product name is empty")]
    EmptyName,

    #[error("unit price must be positive, got {0}")]
    NonPositivePrice(rust_decimal::Decimal),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
