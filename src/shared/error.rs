use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// A generation run that ends as a duplicate of the latest version is still a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (missing artifact, I/O failure, bad configuration, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Caller-visible failures of the ledger.
///
/// Internal plumbing errors travel as `anyhow::Error`; these variants are the
/// ones a user is expected to act on, so each carries a hint.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("SBOM not found: {id}\n\n💡 Hint: Run `sbom-ledger list` to see the available ids (format: <project>-v<N>)")]
    ArtifactNotFound { id: String },

    #[error("Unknown project: {name}\n\n💡 Hint: Configured projects are: {available}")]
    ProjectNotFound { name: String, available: String },

    #[error("Configuration file not found: {path}\n\n💡 Hint: Create sbom-ledger.config.yml in the working directory or pass --config <PATH>")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("A generation run is already in progress for project '{project}'\n\n💡 Hint: Wait for it to finish. If no run is active, remove the stale lock file: {lock_path}")]
    GenerationInProgress { project: String, lock_path: PathBuf },

    #[error("Version directory already exists: {path}\n\n💡 Hint: Version directories are never overwritten; re-run generation to pick the next free number")]
    VersionConflict { path: PathBuf },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
