//! CLI error handling

use std::fmt;

use sigcheck_errors::UserFacingError;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INTEGRITY_FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const TIMEOUT: i32 = 3;
    pub const OTHER: i32 = 4;
}

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error returned by configuration loading or verification
    Verify(sigcheck_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// Report could not be written
    Output(String),
}

impl CliError {
    /// Exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Verify(e) if e.is_integrity_violation() => exit_code::INTEGRITY_FAILURE,
            CliError::Verify(e) if e.is_config_error() => exit_code::CONFIG_ERROR,
            CliError::Verify(sigcheck_errors::Error::Timeout { .. }) => exit_code::TIMEOUT,
            CliError::InvalidArguments(_) => exit_code::CONFIG_ERROR,
            CliError::Verify(_) | CliError::Output(_) => exit_code::OTHER,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Verify(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Output(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Verify(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sigcheck_errors::Error> for CliError {
    fn from(e: sigcheck_errors::Error) -> Self {
        CliError::Verify(e)
    }
}

impl From<sigcheck_errors::ConfigError> for CliError {
    fn from(e: sigcheck_errors::ConfigError) -> Self {
        CliError::Verify(e.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
