//! Shared domain types and configuration for AIVIS.
//!
//! Execution records arrive from the upstream execution engine already
//! fetched and authorized; this crate only describes their shape, the
//! tracking file that names the business and its competitors, and the
//! environment configuration used by the binaries.

pub mod app_config;
pub mod config;
pub mod error;
pub mod records;
pub mod tracking;

pub use app_config::{AppConfig, Environment};
pub use config::{build_app_config, load_app_config};
pub use error::ConfigError;
pub use records::{ExecutionRecord, SourceCitation};
pub use tracking::{
    load_tracking, BrandAliases, BusinessProfile, Competitor, PlatformEntry, TrackingConfig,
};
