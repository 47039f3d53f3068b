use serde::{Deserialize, Serialize};

use crate::domain::Network;
use crate::optimizer::{CostBreakdown, CostModel, GeneratorLoad};

/// Per-generator line of a [`NetworkSummary`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSummary {
    pub name: String,
    pub capacity: u32,
    pub load: u64,
    pub utilization: f64,
    pub overload: f64,
    pub houses: Vec<String>,
}

/// Serializable snapshot of a network and its cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub generators: Vec<GeneratorSummary>,
    pub unconnected: Vec<String>,
    pub total_capacity: u64,
    pub total_consumption: u64,
    pub valid: bool,
    pub cost: CostBreakdown,
}

impl NetworkSummary {
    pub fn new(network: &Network, cost: &CostModel) -> Self {
        let generators = network
            .generator_ids()
            .map(|g| {
                let generator = network.generator_at(g);
                let load = GeneratorLoad::new(network.load(g), u64::from(generator.capacity()));
                GeneratorSummary {
                    name: generator.name().to_string(),
                    capacity: generator.capacity(),
                    load: load.load,
                    utilization: load.utilization(),
                    overload: load.overload(),
                    houses: network
                        .houses_on(g)
                        .iter()
                        .map(|h| network.house_at(*h).name().to_string())
                        .collect(),
                }
            })
            .collect();

        Self {
            generators,
            unconnected: network.unconnected().map(|h| h.name().to_string()).collect(),
            total_capacity: network.total_capacity(),
            total_consumption: network.total_consumption(),
            valid: network.is_valid(),
            cost: cost.evaluate(network),
        }
    }
}
