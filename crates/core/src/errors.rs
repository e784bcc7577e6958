//! Error types for the usermap core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Mapper errors
// ---------------------------------------------------------------------------

/// Errors from name mapper lifecycle steps.
///
/// A lookup miss is never an error; it is reported as `None` by
/// [`NameMapper::map`](crate::mapper::NameMapper::map).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapperError {
    /// Required mapper configuration is missing. Fatal for the mapper
    /// instance that reported it.
    #[error("mapper configuration error: {0}")]
    Configuration(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapper_error_message() {
        let err = MapperError::Configuration("mappings cannot be null".into());
        assert_eq!(
            err.to_string(),
            "mapper configuration error: mappings cannot be null"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: CoreError = ConfigError::FileNotFound("/etc/usermap.toml".into()).into();
        assert_eq!(
            err.to_string(),
            "configuration file not found: /etc/usermap.toml"
        );
        assert!(matches!(err, CoreError::Config(ConfigError::FileNotFound(_))));
    }
}
