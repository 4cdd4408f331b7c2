//! Error types and handling for the sluice library.
//!
//! Hot-path outcomes are deliberately not errors: a push onto a full ring
//! returns [`Full`] with the rejected value, and a pop from an empty ring
//! returns `None`. [`SluiceError`] covers everything that can go wrong
//! outside the hot path (configuration, allocation, pinning, metrics).

use std::fmt;

use thiserror::Error;

/// Result type alias for sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Main error type for the sluice library
#[derive(Error, Debug)]
pub enum SluiceError {
    /// I/O errors surfaced by the operating system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration parameter
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the configuration issue
        message: String,
    },

    /// System resource errors (allocation, mlock, CPU affinity)
    #[error("system resource error: {message}")]
    SystemResource {
        /// Error message describing the system resource issue
        message: String,
    },

    /// Latency/metrics facility errors
    #[error("metrics error: {message}")]
    Metrics {
        /// Error message describing the metrics issue
        message: String,
    },
}

impl SluiceError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new system resource error
    pub fn system_resource(message: impl Into<String>) -> Self {
        Self::SystemResource {
            message: message.into(),
        }
    }

    /// Create a new metrics error
    pub fn metrics(message: impl Into<String>) -> Self {
        Self::Metrics {
            message: message.into(),
        }
    }

    /// Check if retrying the failed operation can ever succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Check if this error is related to system resources
    pub fn is_system_resource_error(&self) -> bool {
        matches!(self, Self::SystemResource { .. })
    }
}

/// Error returned by a push onto a full ring.
///
/// Carries the rejected value back to the caller, so retry loops need
/// neither `Clone` nor a side stash. The buffer itself is unchanged.
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Recover the value that did not fit
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Manual impls keep `Full<T>` an error for payloads that are not themselves
// Debug/Display.
impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ring buffer is full")
    }
}

impl<T> std::error::Error for Full<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SluiceError::config("test message");
        assert!(matches!(err, SluiceError::InvalidConfig { .. }));
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "invalid configuration: test message");
    }

    #[test]
    fn test_error_classification() {
        let resource = SluiceError::system_resource("mlock failed");
        assert!(resource.is_system_resource_error());
        assert!(!resource.is_recoverable());

        let io = SluiceError::from(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert!(io.is_recoverable());
        assert!(!io.is_system_resource_error());
    }

    #[test]
    fn test_full_hands_value_back() {
        struct NoDebug(u32);

        let full = Full(NoDebug(7));
        assert_eq!(full.to_string(), "ring buffer is full");
        assert_eq!(format!("{full:?}"), "Full(..)");
        assert_eq!(full.into_inner().0, 7);
    }
}
