//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only construction can fail. Lookups report absence with `None`, a full
/// cache evicts instead of erroring, and key types without value equality
/// are rejected by the compiler.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dedicated expiry runtime failed to start
    #[error("Failed to start expiry runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig("max_items must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_items must be greater than 0"
        );
    }

    #[test]
    fn test_runtime_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Runtime(_)));
        assert!(err.to_string().contains("no threads"));
    }
}
