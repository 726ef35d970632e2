//! CLI-specific error types with exit codes.
//!
//! Wraps library errors and maps each failure class to a stable exit code
//! so scripts can branch without parsing messages.

use std::fmt;
use warden::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),

    /// Semantic failure (e.g., lookup found nothing) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure (lookup miss, already-bound conflict)
    /// - 2: Port pool exhausted
    /// - 3: Store integrity failure requiring operator attention
    /// - 4: Store unavailable
    /// - 5: Invalid arguments
    /// - 6: I/O error
    /// - 7: Configuration error
    /// - 8: Other library error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                LibError::PoolExhausted => 2,
                LibError::InitializationIntegrity { .. }
                | LibError::PortIntegrity { .. }
                | LibError::PortInstanceInconsistency { .. }
                | LibError::StateCorruption { .. } => 3,
                LibError::StoreUnavailable { .. } => 4,
                _ => 8,
            },
            CliError::InvalidArguments(_) => 5,
            CliError::Io(_) => 6,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::SemanticFailure("miss".into()).exit_code(), 1);
        assert_eq!(CliError::Library(LibError::PoolExhausted).exit_code(), 2);
        assert_eq!(
            CliError::Library(LibError::StateCorruption {
                details: "bad".into()
            })
            .exit_code(),
            3
        );
        assert_eq!(
            CliError::Library(LibError::StoreUnavailable {
                reason: "gone".into()
            })
            .exit_code(),
            4
        );
        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 5);
        assert_eq!(CliError::Config("x".into()).exit_code(), 7);
        assert_eq!(
            CliError::Library(LibError::AlreadyInitialized).exit_code(),
            8
        );
    }
}
