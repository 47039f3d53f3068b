use std::path::Path;

use tracing::{info, warn};

use crate::domain::Network;
use crate::error::LoadError;

/// Render a network in the persisted text format: generators, then houses,
/// then one `connexion(HOUSE,GENERATOR).` line per link. The house comes
/// first because that is the order the parser tries first when a house and a
/// generator share a name.
pub fn write_network(network: &Network) -> String {
    let generators = network
        .generators()
        .iter()
        .map(|g| format!("generateur({},{}).", g.name(), g.capacity()));
    let houses = network
        .houses()
        .iter()
        .map(|h| format!("maison({},{}).", h.name(), h.class()));
    let connections = network
        .connections()
        .map(|(g, h)| format!("connexion({},{}).", h.name(), g.name()));

    generators
        .chain(houses)
        .chain(connections)
        .map(|line| line + "\n")
        .collect()
}

/// Write a network to `path`, replacing the whole file.
///
/// An incomplete network is still written, but it will not load back.
pub fn save_network(path: impl AsRef<Path>, network: &Network) -> Result<(), LoadError> {
    let path = path.as_ref();
    if !network.is_valid() {
        warn!(path = %path.display(), "saving a network with unconnected houses");
    }
    std::fs::write(path, write_network(network)).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "network saved");
    Ok(())
}
