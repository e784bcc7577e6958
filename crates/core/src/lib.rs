//! usermap core library.
//!
//! Translates the principal name a remote filesystem client operates under
//! into the user name used for the corresponding local operation. Provides
//! the [`NameMapper`] capability, its dictionary and constant strategies,
//! and TOML configuration for selecting between them.

pub mod config;
pub mod errors;
pub mod mapper;

// Re-exports for convenience.
pub use config::{AppConfig, MapperConfig};
pub use errors::{ConfigError, CoreError, MapperError};
pub use mapper::{ConstantNameMapper, DictionaryNameMapper, Lifecycle, NameMapper};
