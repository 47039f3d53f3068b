use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

use super::types::{validate_name, NameKey};
use crate::error::{NetworkError, NetworkResult};

/// Consumption class of a house, each mapped to a fixed load.
///
/// The persisted format spells these `BASSE`, `NORMAL` and `FORTE`; `NORMALE`
/// and the English `LOW`/`HIGH` are accepted on input and normalized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ConsumptionClass {
    #[strum(to_string = "BASSE", serialize = "LOW")]
    Low,
    #[strum(to_string = "NORMAL", serialize = "NORMALE")]
    Normal,
    #[strum(to_string = "FORTE", serialize = "HIGH")]
    High,
}

impl ConsumptionClass {
    /// Fixed load in kW.
    pub fn consumption(&self) -> u32 {
        match self {
            ConsumptionClass::Low => 10,
            ConsumptionClass::Normal => 20,
            ConsumptionClass::High => 40,
        }
    }

    /// Parse a class token, mapping unknown text to `InvalidAttribute`.
    pub fn parse(token: &str) -> NetworkResult<Self> {
        Self::from_str(token.trim()).map_err(|_| {
            NetworkError::InvalidAttribute(format!(
                "unknown consumption class '{}', expected BASSE, NORMAL or FORTE",
                token.trim()
            ))
        })
    }
}

/// A named demand node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    name: String,
    class: ConsumptionClass,
}

impl House {
    pub fn new(name: impl AsRef<str>, class: ConsumptionClass) -> NetworkResult<Self> {
        Ok(Self {
            name: validate_name(name.as_ref())?,
            class,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    pub fn class(&self) -> ConsumptionClass {
        self.class
    }

    pub fn consumption(&self) -> u32 {
        self.class.consumption()
    }

    pub(crate) fn set_class(&mut self, class: ConsumptionClass) {
        self.class = class;
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {} kW)", self.name, self.class, self.consumption())
    }
}
