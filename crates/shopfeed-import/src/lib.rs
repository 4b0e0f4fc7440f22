//! Client for the catalog service's bulk product import endpoint.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ImportClient, DEFAULT_BATCH_SIZE};
pub use error::ImportError;
pub use types::{ImportOptions, ImportSummary, MatchBy};
