//! Error types and handling for the marketplace publisher
//!
//! Every failure an invocation can hit is one variant of [`CliError`]. Validation
//! errors are raised before the network is touched; transport and upstream
//! errors come from the single upload request.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for publisher operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error types for a publish invocation
#[derive(Error, Debug)]
pub enum CliError {
    // ═══════════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════════
    /// No API key in the environment nor on the command line
    #[error(
        "No API Key is set to authenticate the request to the marketplace. \
         Please set the env var MARKETPLACE_API_KEY or the option --api-key=[...]"
    )]
    MissingCredential,

    /// A required option was not supplied
    #[error("Option {0} must be set.")]
    MissingRequiredOption(String),

    /// No candidate location holds the file
    #[error("File {} was not found", path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but cannot be read
    #[error("File {} cannot be read: {reason}", path.display())]
    FileUnreadable { path: PathBuf, reason: String },

    /// Metadata file is not a non-empty JSON object of scalars
    #[error("Metadata can't be loaded; please check your JSON: {0}")]
    InvalidMetadataJson(String),

    /// Update type outside the allowed set
    #[error("Unrecognized update type \"{value}\", allowed values are: {allowed}")]
    InvalidUpdateType { value: String, allowed: String },

    // ═══════════════════════════════════════════════════════════════
    // Network & Upstream Errors
    // ═══════════════════════════════════════════════════════════════
    /// Network, DNS or TLS failure while talking to the marketplace
    #[error("Request to the marketplace failed: {0}")]
    Transport(String),

    /// Marketplace answered with something other than HTTP 200
    #[error("Marketplace rejected the upload (HTTP {status})")]
    UpstreamFailure { status: u16 },

    // ═══════════════════════════════════════════════════════════════
    // Other Errors
    // ═══════════════════════════════════════════════════════════════
    /// Writing to the terminal failed
    #[error("Failed to write output: {0}")]
    Output(String),
}

impl CliError {
    /// Get the exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredential
            | Self::Transport(_)
            | Self::UpstreamFailure { .. }
            | Self::Output(_) => 1,
            Self::MissingRequiredOption(_)
            | Self::FileNotFound { .. }
            | Self::FileUnreadable { .. }
            | Self::InvalidMetadataJson(_)
            | Self::InvalidUpdateType { .. } => 2,
        }
    }

    /// Whether the error was raised while validating input, before any request
    pub const fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::Transport(_) | Self::UpstreamFailure { .. } | Self::Output(_)
        )
    }
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}
