use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{validate_name, NameKey};
use crate::error::{NetworkError, NetworkResult};

/// A named supply node with a fixed positive capacity (kW).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    name: String,
    capacity: u32,
}

impl Generator {
    /// Create a generator, rejecting non-positive capacities and blank names.
    pub fn new(name: impl AsRef<str>, capacity: i64) -> NetworkResult<Self> {
        let name = validate_name(name.as_ref())?;
        if capacity <= 0 {
            return Err(NetworkError::InvalidAttribute(format!(
                "capacity of generator {} must be positive, got {}",
                name, capacity
            )));
        }
        let capacity = u32::try_from(capacity).map_err(|_| {
            NetworkError::InvalidAttribute(format!(
                "capacity of generator {} is too large: {}",
                name, capacity
            ))
        })?;
        Ok(Self { name, capacity })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub(crate) fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} kW)", self.name, self.capacity)
    }
}
