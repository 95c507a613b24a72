//! Error types for testalign validation runs.
//!
//! Validators decide for themselves which failures are fatal. Anything that
//! leaves nothing meaningful to validate (a missing routes file, a missing
//! test directory, an unreadable manifest) is returned as an [`Error`]. Soft
//! failures of a single probe are absorbed where they happen and never show
//! up here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for testalign operations
#[derive(Debug, Error)]
pub enum Error {
    /// The route-declaration source does not exist
    #[error("Routes file not found at {}", path.display())]
    MissingRoutesFile { path: PathBuf },

    /// The e2e test directory does not exist
    #[error("E2E tests directory not found at {}", path.display())]
    MissingTestsDir { path: PathBuf },

    /// The project manifest does not exist
    #[error("Project manifest not found at {}", path.display())]
    MissingManifest { path: PathBuf },

    /// The project manifest exists but is not valid JSON
    #[error("Invalid project manifest {}: {source}", path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration file could not be read or parsed
    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The browser helper could not be launched or broke protocol
    #[error("Browser error: {0}")]
    Browser(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a browser error from any message
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser(message.into())
    }

    /// Create a configuration error with path context
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error means required project inputs are absent.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            Self::MissingRoutesFile { .. }
                | Self::MissingTestsDir { .. }
                | Self::MissingManifest { .. }
        )
    }
}

/// Result type alias for testalign operations
pub type Result<T> = std::result::Result<T, Error>;
