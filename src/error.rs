//! Error types for quickrank
//!
//! Ranking itself never fails. These errors only surface from the explicit
//! I/O entry points (config files, the adaptive store).

use thiserror::Error;

/// Errors that can occur while loading or persisting ranking state
#[derive(Debug, Error)]
pub enum RankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Adaptive store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for quickrank operations
pub type RankResult<T> = Result<T, RankError>;
