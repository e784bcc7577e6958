//! Principal name mapping.
//!
//! A [`NameMapper`] translates the name a remote client presents into the
//! name used for the corresponding local operation. Two strategies ship with
//! the crate:
//!
//! 1. [`DictionaryNameMapper`]: explicit lookup table with an optional default
//! 2. [`ConstantNameMapper`]: every principal collapses to one fixed name
//!
//! Mappers that need a startup check expose it through [`Lifecycle`], which
//! callers reach via [`NameMapper::lifecycle`] or the [`start_mapper`] /
//! [`stop_mapper`] helpers.

pub mod constant;
pub mod dictionary;

use std::fmt::Debug;

use tracing::debug;

use crate::errors::MapperError;

pub use constant::ConstantNameMapper;
pub use dictionary::DictionaryNameMapper;

/// Translates an incoming principal name into a local user name.
///
/// Implementations must be pure with respect to their configuration: `map`
/// takes `&self`, performs no I/O and may be called from any number of
/// threads at once.
pub trait NameMapper: Debug + Send + Sync {
    /// Map `name` to the name that should be used locally.
    ///
    /// `None` as input means no principal was supplied. `None` as output
    /// means there is no mapping and the caller should fall back to its own
    /// identity.
    fn map(&self, name: Option<&str>) -> Option<String>;

    /// Startup/shutdown hooks, if this mapper has any.
    fn lifecycle(&self) -> Option<&dyn Lifecycle> {
        None
    }
}

/// Startup and shutdown hooks for mappers that validate their configuration.
pub trait Lifecycle {
    /// Validate configuration. Must succeed before the first `map` call.
    fn start(&self) -> Result<(), MapperError>;

    /// Release resources held by the mapper.
    fn stop(&self) -> Result<(), MapperError> {
        Ok(())
    }
}

/// Run the startup hook of `mapper`, if it has one.
pub fn start_mapper(mapper: &dyn NameMapper) -> Result<(), MapperError> {
    match mapper.lifecycle() {
        Some(lifecycle) => lifecycle.start(),
        None => {
            debug!(?mapper, "mapper has no lifecycle, nothing to start");
            Ok(())
        }
    }
}

/// Run the shutdown hook of `mapper`, if it has one.
pub fn stop_mapper(mapper: &dyn NameMapper) -> Result<(), MapperError> {
    match mapper.lifecycle() {
        Some(lifecycle) => lifecycle.stop(),
        None => Ok(()),
    }
}
