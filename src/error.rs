use std::path::PathBuf;

use thiserror::Error;

/// Which side of the assignment a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EntityKind {
    #[strum(to_string = "generator")]
    Generator,
    #[strum(to_string = "house")]
    House,
}

/// Errors raised by network mutations and cost model construction.
///
/// Every operation returning one of these leaves the network exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("capacity exceeded: consumption {consumption} kW would exceed capacity {capacity} kW")]
    CapacityExceeded { consumption: u64, capacity: u64 },

    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("house {house} is already connected to generator {generator}")]
    AlreadyConnected { house: String, generator: String },

    #[error("house {house} is not connected to generator {generator}")]
    NotConnected { house: String, generator: String },

    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),
}

impl NetworkError {
    pub(crate) fn generator_not_found(name: &str) -> Self {
        NetworkError::NotFound {
            kind: EntityKind::Generator,
            name: name.to_string(),
        }
    }

    pub(crate) fn house_not_found(name: &str) -> Self {
        NetworkError::NotFound {
            kind: EntityKind::House,
            name: name.to_string(),
        }
    }
}

/// Errors raised while reading or writing the persisted text format.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: NetworkError,
    },

    #[error("incomplete network: unconnected houses {}", .unconnected.join(", "))]
    IncompleteNetwork { unconnected: Vec<String> },
}

impl LoadError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        LoadError::Format {
            line,
            message: message.into(),
        }
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
