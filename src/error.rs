//! Error types for pmrun
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Exit status used for usage errors (unknown mode, missing argument)
pub const EXIT_USAGE: i32 = 2;

/// Exit status when the engine binary exists but cannot be executed
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Exit status when the engine binary cannot be found
pub const EXIT_NOT_FOUND: i32 = 127;

/// All error types that can occur while dispatching
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Mode token is not in the accepted set
    #[error("Unknown mode: '{0}' (expected one of: {accepted})", accepted = crate::mode::accepted_tokens().join(", "))]
    UnknownMode(String),

    /// Fewer positional arguments than the mode requires
    #[error("Missing argument for {mode}: <{name}> (position {position})")]
    MissingArgument {
        mode: String,
        name: &'static str,
        position: usize,
    },

    /// The external engine could not be started
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl DispatchError {
    /// Process exit status this error maps to
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::UnknownMode(_) | DispatchError::MissingArgument { .. } => EXIT_USAGE,
            DispatchError::Launch { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => EXIT_NOT_FOUND,
                std::io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => 1,
            },
            DispatchError::Config(_) => 1,
        }
    }
}

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;
