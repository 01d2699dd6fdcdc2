//! Error types for `mailgun-openapi-tools`.

use thiserror::Error;

/// Main error type for the Mailgun tool layer.
#[derive(Error, Debug)]
pub enum MailgunToolsError {
    /// Configuration errors (missing credential, bad base URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// API description errors (document malformed, operation missing).
    #[error("Spec error: {0}")]
    Spec(String),

    #[error("Spec error: failed to read description file '{path}': {source}")]
    SpecReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Spec error: failed to parse description file '{path}': {source}")]
    SpecParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Runtime errors (unknown tool, dispatch failure).
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Tool-call arguments rejected by the tool's validation schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// HTTP errors (failed API calls).
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Mailgun tool-layer operations.
pub type Result<T> = std::result::Result<T, MailgunToolsError>;
