//! Error types for shelf-tui
//!
//! Wraps service layer errors and terminal/IO errors so the event loop has a
//! single error type.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] libbookshelf::BookshelfError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl TuiError {
    /// Process exit code, following the library's codes for service errors
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Service(e) => e.exit_code(),
            TuiError::Terminal(_) | TuiError::Runtime(_) => 1,
        }
    }
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use libbookshelf::error::ServiceError;
    use libbookshelf::BookshelfError;

    #[test]
    fn test_exit_codes() {
        let err: TuiError = BookshelfError::InvalidInput("bad".to_string()).into();
        assert_eq!(err.exit_code(), 3);

        let err: TuiError =
            BookshelfError::Service(ServiceError::Network("down".to_string())).into();
        assert_eq!(err.exit_code(), 2);

        let err: TuiError = std::io::Error::new(std::io::ErrorKind::Other, "tty").into();
        assert_eq!(err.exit_code(), 1);
    }
}
