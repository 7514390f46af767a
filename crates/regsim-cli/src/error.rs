//! Error types for regsim-cli

use std::process::ExitCode;

use regsim::RegsimError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Plan, flags or evaluation mode rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A simulation or report failed
    #[error("Simulation failed: {0}")]
    Simulation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Numeric exit code
    pub fn code(&self) -> u8 {
        match self {
            Self::Simulation(_) => 1,
            Self::Config(_) => 2,
            Self::Io(_) => 7,
        }
    }
}

impl From<RegsimError> for CliError {
    fn from(e: RegsimError) -> Self {
        match e {
            RegsimError::Io(io) => Self::Io(io),
            RegsimError::InvalidConfig(_) | RegsimError::UnsupportedEvaluation(_) => {
                Self::Config(e.to_string())
            }
            other => Self::Simulation(other.to_string()),
        }
    }
}
