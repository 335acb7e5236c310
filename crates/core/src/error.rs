// Error types for registry operations

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised by registry operations.
///
/// Business-rule rejections (duplicates, missing rows) are not errors; they are
/// reported through `ActionResult`.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Caller lacks an administrator session
    #[error("not allowed")]
    NotAllowed,

    /// API key encryption or decryption failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Failure propagated from the data store
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl RegistryError {
    /// Create an encryption error
    pub fn encryption(msg: impl Into<String>) -> Self {
        RegistryError::Encryption(msg.into())
    }

    /// Whether this error is an authorization rejection
    pub fn is_not_allowed(&self) -> bool {
        matches!(self, RegistryError::NotAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_allowed_message() {
        assert_eq!(RegistryError::NotAllowed.to_string(), "not allowed");
        assert!(RegistryError::NotAllowed.is_not_allowed());
    }

    #[test]
    fn test_storage_from_anyhow() {
        let err: RegistryError = anyhow::anyhow!("connection reset").into();
        assert!(!err.is_not_allowed());
        assert!(err.to_string().contains("connection reset"));
    }
}
