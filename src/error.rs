//! Error types for IIO analog input access.
//!
//! Every failure is returned to the immediate caller. Nothing here is logged,
//! retried or swallowed; hot-unplug recovery is the caller's job.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for analog input operations.
pub type Result<T> = std::result::Result<T, AdcError>;

/// Errors that can occur when reading an IIO ADC channel.
#[derive(Error, Debug)]
pub enum AdcError {
    /// The channel file does not exist (raised at construction only)
    #[error(
        "'{}' is not a valid iio device channel. Please check arguments and device tree overlays.",
        .path.display()
    )]
    ResourceNotFound { path: PathBuf },

    /// The channel file existed at construction but could not be read now
    #[error("Failed to read '{}': {source}", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The channel file did not hold a base-10 integer
    #[error("Invalid raw value {contents:?} in '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        contents: String,
        #[source]
        source: ParseIntError,
    },
}

impl AdcError {
    /// Path of the channel file involved in the failure.
    pub fn path(&self) -> &Path {
        match self {
            Self::ResourceNotFound { path }
            | Self::ResourceUnavailable { path, .. }
            | Self::ParseError { path, .. } => path,
        }
    }

    /// Check if this is a construction-time "channel not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Check if the channel file could not be read.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ResourceUnavailable { .. })
    }

    /// Check if the channel file held something other than an integer.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = AdcError::ResourceNotFound {
            path: PathBuf::from("/sys/bus/iio/devices/iio:device99/in_voltage0_raw"),
        };
        let msg = err.to_string();
        assert!(msg.contains("iio:device99/in_voltage0_raw"));
        assert!(msg.contains("device tree overlays"));
        assert!(err.is_not_found());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_parse_error_display() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = AdcError::ParseError {
            path: PathBuf::from("/tmp/in_voltage0_raw"),
            contents: "abc".to_string(),
            source,
        };
        assert!(err.to_string().contains("\"abc\""));
        assert!(err.is_parse_error());
        assert_eq!(err.path(), Path::new("/tmp/in_voltage0_raw"));
    }

    #[test]
    fn test_unavailable_keeps_source() {
        let err = AdcError::ResourceUnavailable {
            path: PathBuf::from("/tmp/gone"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_unavailable());
        assert!(std::error::Error::source(&err).is_some());
    }
}
