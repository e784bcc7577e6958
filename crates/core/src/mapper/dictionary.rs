//! Lookup-table name mapper.
//!
//! ```toml
//! [mapper]
//! kind = "dictionary"
//! default_name = "guest"
//!
//! [mapper.mappings]
//! alice = "hdfs"
//! bob = "yarn"
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{Lifecycle, NameMapper};
use crate::errors::MapperError;

/// Maps one user name to another based on a predefined table.
///
/// Names missing from the table map to [`default_name`](Self::default_name),
/// which may itself be absent. The table must be set before
/// [`Lifecycle::start`] is called; an empty table is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionaryNameMapper {
    /// Principal name -> local user name.
    #[serde(default)]
    mappings: Option<HashMap<String, String>>,

    /// Returned when a name is not in `mappings`.
    #[serde(default)]
    default_name: Option<String>,
}

impl DictionaryNameMapper {
    /// Create a mapper with the given table and no default.
    pub fn new(mappings: HashMap<String, String>) -> Self {
        Self {
            mappings: Some(mappings),
            default_name: None,
        }
    }

    /// Set the name returned on a lookup miss.
    pub fn with_default_name(mut self, default_name: impl Into<String>) -> Self {
        self.default_name = Some(default_name.into());
        self
    }

    /// The lookup table, or `None` if it was never set.
    pub fn mappings(&self) -> Option<&HashMap<String, String>> {
        self.mappings.as_ref()
    }

    /// Replace the whole table. Entries are not merged with the old table.
    pub fn set_mappings(&mut self, mappings: Option<HashMap<String, String>>) {
        self.mappings = mappings;
    }

    /// Name used when the table has no entry for the requested name.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// `None` makes a lookup miss return `None`.
    pub fn set_default_name(&mut self, default_name: Option<String>) {
        self.default_name = default_name;
    }
}

impl NameMapper for DictionaryNameMapper {
    fn map(&self, name: Option<&str>) -> Option<String> {
        debug_assert!(
            self.mappings.is_some(),
            "DictionaryNameMapper::map called before a successful start"
        );

        let hit = match (self.mappings.as_ref(), name) {
            (Some(mappings), Some(name)) => mappings.get(name),
            _ => None,
        };

        match hit {
            Some(mapped) => {
                trace!(?name, mapped = %mapped, "found in mapping table");
                Some(mapped.clone())
            }
            None => {
                trace!(?name, default = ?self.default_name, "no mapping, using default");
                self.default_name.clone()
            }
        }
    }

    fn lifecycle(&self) -> Option<&dyn Lifecycle> {
        Some(self)
    }
}

impl Lifecycle for DictionaryNameMapper {
    fn start(&self) -> Result<(), MapperError> {
        let Some(mappings) = &self.mappings else {
            return Err(MapperError::Configuration("mappings cannot be null".into()));
        };

        info!(
            count = mappings.len(),
            default_name = ?self.default_name,
            "dictionary name mapper started"
        );
        Ok(())
    }

    fn stop(&self) -> Result<(), MapperError> {
        debug!("dictionary name mapper stopped");
        Ok(())
    }
}

impl fmt::Display for DictionaryNameMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mappings {
            Some(mappings) if mappings.len() == 1 => write!(f, "dictionary (1 entry")?,
            Some(mappings) => write!(f, "dictionary ({} entries", mappings.len())?,
            None => write!(f, "dictionary (no mappings")?,
        }
        match &self.default_name {
            Some(name) => write!(f, ", default '{}')", name),
            None => write!(f, ", no default)"),
        }
    }
}
