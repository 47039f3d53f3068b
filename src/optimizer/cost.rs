//! Cost model
//!
//! `cost = dispersion + lambda * surcharge`
//!
//! - dispersion: sum of absolute deviations of per-generator utilization from
//!   the mean utilization (load balance)
//! - surcharge: sum of per-generator fractional overcapacity (feasibility)
//!
//! Every function is recomputed from the live network on each call; nothing is
//! cached between calls.

use serde::{Deserialize, Serialize};

use crate::domain::Network;
use crate::error::{NetworkError, NetworkResult};

/// Default severity weight applied to surcharge
pub const DEFAULT_LAMBDA: f64 = 10.0;

/// Load and capacity of one generator, in kW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorLoad {
    pub load: u64,
    pub capacity: u64,
}

impl GeneratorLoad {
    pub fn new(load: u64, capacity: u64) -> Self {
        Self { load, capacity }
    }

    /// Fraction of capacity in use; 0 for a zero capacity.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.load as f64 / self.capacity as f64
    }

    /// Fractional overcapacity, `max(0, (load - capacity) / capacity)`.
    pub fn overload(&self) -> f64 {
        if self.capacity == 0 || self.load <= self.capacity {
            return 0.0;
        }
        (self.load - self.capacity) as f64 / self.capacity as f64
    }
}

/// Cost components of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub dispersion: f64,
    pub surcharge: f64,
    pub lambda: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    lambda: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
        }
    }
}

impl CostModel {
    /// Create a cost model; lambda must be finite and non-negative.
    pub fn new(lambda: f64) -> NetworkResult<Self> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(NetworkError::InvalidAttribute(format!(
                "lambda must be a non-negative number, got {}",
                lambda
            )));
        }
        Ok(Self { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Utilization of the named generator, 0 when it does not exist.
    pub fn utilization(&self, network: &Network, generator: &str) -> f64 {
        generator_load(network, generator)
            .map(|g| g.utilization())
            .unwrap_or(0.0)
    }

    /// Overload of the named generator, 0 when it does not exist.
    pub fn overload(&self, network: &Network, generator: &str) -> f64 {
        generator_load(network, generator)
            .map(|g| g.overload())
            .unwrap_or(0.0)
    }

    pub fn dispersion(&self, network: &Network) -> f64 {
        dispersion_of(&loads(network))
    }

    pub fn surcharge(&self, network: &Network) -> f64 {
        surcharge_of(&loads(network))
    }

    pub fn cost(&self, network: &Network) -> f64 {
        self.cost_of(&loads(network))
    }

    /// Total cost over explicit per-generator loads.
    pub fn cost_of(&self, loads: &[GeneratorLoad]) -> f64 {
        dispersion_of(loads) + self.lambda * surcharge_of(loads)
    }

    pub fn evaluate(&self, network: &Network) -> CostBreakdown {
        let loads = loads(network);
        let dispersion = dispersion_of(&loads);
        let surcharge = surcharge_of(&loads);
        CostBreakdown {
            dispersion,
            surcharge,
            lambda: self.lambda,
            total: dispersion + self.lambda * surcharge,
        }
    }
}

/// Per-generator loads in generator insertion order.
pub fn loads(network: &Network) -> Vec<GeneratorLoad> {
    network
        .generator_ids()
        .map(|g| GeneratorLoad::new(network.load(g), u64::from(network.generator_at(g).capacity())))
        .collect()
}

fn generator_load(network: &Network, generator: &str) -> Option<GeneratorLoad> {
    let id = network.generator_id(generator).ok()?;
    Some(GeneratorLoad::new(
        network.load(id),
        u64::from(network.generator_at(id).capacity()),
    ))
}

pub fn dispersion_of(loads: &[GeneratorLoad]) -> f64 {
    if loads.is_empty() {
        return 0.0;
    }
    let utilizations: Vec<f64> = loads.iter().map(GeneratorLoad::utilization).collect();
    let mean = utilizations.iter().sum::<f64>() / utilizations.len() as f64;
    utilizations.iter().map(|u| (u - mean).abs()).sum()
}

pub fn surcharge_of(loads: &[GeneratorLoad]) -> f64 {
    loads.iter().map(GeneratorLoad::overload).sum()
}
