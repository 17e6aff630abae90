//! Error types
//!
//! DOM and timer conditions never surface as errors from the controller's
//! entry points; they degrade to a no-op for the affected feature. These
//! variants cover binding-time lookups and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    /// A selector resolved to nothing
    #[error("no element matches `{0}`")]
    MissingElement(String),

    /// A selector outside the supported subset
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Configuration file could not be read
    #[error("failed to read {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or layout payload is malformed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PageError>;
