//! TOML-based configuration for usermap.
//!
//! The `[mapper]` table selects a mapper strategy with its `kind` field and
//! carries that strategy's settings. [`MapperConfig::build`] turns it into a
//! started, immutable mapper ready to share between threads.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ConfigError, MapperError};
use crate::mapper::{start_mapper, ConstantNameMapper, DictionaryNameMapper, NameMapper};

/// Tracing levels accepted in `log.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Name mapper selection and settings.
    pub mapper: MapperConfig,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapper
// ---------------------------------------------------------------------------

/// Mapper strategy and its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapperConfig {
    /// Lookup table with optional default.
    Dictionary(DictionaryNameMapper),
    /// One fixed user name for every principal.
    Constant(ConstantNameMapper),
}

impl MapperConfig {
    /// The `kind` string this config was selected with.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dictionary(_) => "dictionary",
            Self::Constant(_) => "constant",
        }
    }

    /// Start the configured mapper and freeze it for shared use.
    pub fn build(self) -> Result<Arc<dyn NameMapper>, MapperError> {
        let mapper: Arc<dyn NameMapper> = match self {
            Self::Dictionary(mapper) => Arc::new(mapper),
            Self::Constant(mapper) => Arc::new(mapper),
        };
        start_mapper(mapper.as_ref())?;

        debug!(?mapper, "name mapper ready");
        Ok(mapper)
    }
}

impl fmt::Display for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dictionary(mapper) => fmt::Display::fmt(mapper, f),
            Self::Constant(mapper) => fmt::Display::fmt(mapper, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// This does **not** start the mapper -- call
    /// [`MapperConfig::build`] afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse an [`AppConfig`] from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(kind = config.mapper.kind(), "configuration parsed successfully");
        Ok(config)
    }

    /// Validate settings that the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".into(),
                detail: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dictionary_toml() -> &'static str {
        r#"
[log]
level = "debug"

[mapper]
kind = "dictionary"
default_name = "guest"

[mapper.mappings]
alice = "hdfs"
bob = "yarn"
"#
    }

    #[test]
    fn test_parse_dictionary_config() {
        let config = AppConfig::from_toml_str(dictionary_toml()).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.mapper.kind(), "dictionary");

        let MapperConfig::Dictionary(ref mapper) = config.mapper else {
            panic!("expected dictionary mapper");
        };
        assert_eq!(mapper.default_name(), Some("guest"));
        assert_eq!(mapper.mappings().unwrap()["alice"], "hdfs");
    }

    #[test]
    fn test_parse_constant_config() {
        let config = AppConfig::from_toml_str(
            r#"
[mapper]
kind = "constant"
user_name = "svc"
"#,
        )
        .unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(
            config.mapper,
            MapperConfig::Constant(ConstantNameMapper::new(Some("svc".into())))
        );
    }

    #[test]
    fn test_constant_without_name() {
        let config = AppConfig::from_toml_str("[mapper]\nkind = \"constant\"\n").unwrap();
        let mapper = config.mapper.build().unwrap();
        assert_eq!(mapper.map(Some("alice")), None);
    }

    #[test]
    fn test_build_dictionary() {
        let config = AppConfig::from_toml_str(dictionary_toml()).unwrap();
        let mapper = config.mapper.build().unwrap();
        assert_eq!(mapper.map(Some("alice")).as_deref(), Some("hdfs"));
        assert_eq!(mapper.map(Some("carol")).as_deref(), Some("guest"));
        assert_eq!(mapper.map(None).as_deref(), Some("guest"));
    }

    #[test]
    fn test_build_dictionary_without_mappings_fails() {
        let config = AppConfig::from_toml_str(
            r#"
[mapper]
kind = "dictionary"
default_name = "guest"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.mapper.build(),
            Err(MapperError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = AppConfig::from_toml_str("[mapper]\nkind = \"kerberos\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = AppConfig::from_toml_str(
            "[mapper]\nkind = \"constant\"\ndefault_name = \"guest\"\n",
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(dictionary_toml().as_bytes()).unwrap();

        let config = AppConfig::load_from_file(f.path()).unwrap();
        assert_eq!(config.mapper.kind(), "dictionary");
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/usermap.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = AppConfig::from_toml_str(dictionary_toml()).unwrap();
        assert!(config.validate().is_ok());

        config.log.level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "log.level"
        ));
    }

    #[test]
    fn test_display() {
        let config = AppConfig::from_toml_str(dictionary_toml()).unwrap();
        assert_eq!(
            config.mapper.to_string(),
            "dictionary (2 entries, default 'guest')"
        );
    }
}
