//! Constant name mapper: every request runs as the same user.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NameMapper;

/// Maps every principal to one fixed user name.
///
/// With no user name configured the mapper returns `None` for every input,
/// meaning the caller should use the process owner's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantNameMapper {
    #[serde(default)]
    user_name: Option<String>,
}

impl ConstantNameMapper {
    pub fn new(user_name: Option<String>) -> Self {
        Self { user_name }
    }

    /// User name applied to all requests. `None` defers to the process owner.
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, user_name: Option<String>) {
        self.user_name = user_name;
    }
}

impl NameMapper for ConstantNameMapper {
    fn map(&self, _name: Option<&str>) -> Option<String> {
        self.user_name.clone()
    }
}

impl fmt::Display for ConstantNameMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user_name {
            Some(name) => write!(f, "constant ('{}')", name),
            None => write!(f, "constant (process owner)"),
        }
    }
}
