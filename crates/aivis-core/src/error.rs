use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tracking file {path}: {source}")]
    TrackingFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tracking file: {0}")]
    TrackingFileParse(#[source] serde_yaml::Error),

    #[error("tracking validation failed: {0}")]
    Validation(String),
}
