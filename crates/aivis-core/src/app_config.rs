use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the AIVIS binaries.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Fallback `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// YAML file naming the business, its competitors, platforms and aliases.
    pub tracking_path: PathBuf,
    /// JSON export of execution records produced by the upstream engine.
    pub records_path: PathBuf,
    /// Look-back window, in days, used when a request names no dates.
    pub default_days: u32,
}
