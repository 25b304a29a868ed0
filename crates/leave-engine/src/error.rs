//! Error types for leave-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaveError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, LeaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_prefixed_with_category() {
        let err = LeaveError::InvalidDate("'2025-13-01'".to_string());
        assert_eq!(err.to_string(), "Invalid date: '2025-13-01'");

        let err = LeaveError::InvalidOverride("unknown directive 'X'".to_string());
        assert!(err.to_string().starts_with("Invalid override"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<LeaveError>();
    }
}
