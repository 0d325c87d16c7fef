//! Error types for modpak.

use std::path::PathBuf;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Result type for modpak operations.
pub type PakResult<T> = Result<T, PakError>;

/// Error type for modpak operations.
#[derive(Debug, Error)]
pub enum PakError {
    /// No mod directory was given on the command line.
    #[error("Directory with the mod files wasn't specified through command line arguments")]
    MissingModDirectory,

    /// The mod directory given on the command line does not exist.
    #[error("Directory with the mod files doesn't exist: \"{}\"", .0.display())]
    ModDirectoryNotFound(PathBuf),

    /// The packager executable is missing from the engine installation.
    #[error("UnrealPak not found at: {}", .0.display())]
    PackagerNotFound(PathBuf),

    /// The packager executable exists but could not be started.
    #[error("Failed to start {}: {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// User cancelled a prompt (ESC or Ctrl+C).
    #[error("Operation cancelled")]
    Cancelled,

    /// The line source ran out while a value was still required.
    #[error("Input closed before a value was entered")]
    InputClosed,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PakError {
    /// Short category used when rendering the error on the console.
    pub fn kind(&self) -> &'static str {
        match self {
            PakError::MissingModDirectory => "missing-input",
            PakError::ModDirectoryNotFound(_) | PakError::PackagerNotFound(_) => "invalid-path",
            PakError::Launch { .. } => "launch",
            PakError::Io(_) => "io",
            PakError::Cancelled => "cancelled",
            PakError::InputClosed => "input",
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
