use serde::{Deserialize, Serialize};

use super::CostModel;
use crate::domain::Network;

/// What to do with a trial move whose cost equals the cost before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Keep equal-cost moves (sideways exploration)
    #[default]
    Accept,
    /// Revert equal-cost moves; only strict improvements survive
    Reject,
}

impl TiePolicy {
    pub fn from_accept_ties(accept: bool) -> Self {
        if accept {
            TiePolicy::Accept
        } else {
            TiePolicy::Reject
        }
    }

    /// Whether a move from `before` to `after` is kept.
    pub fn keeps(&self, before: f64, after: f64) -> bool {
        match self {
            TiePolicy::Accept => after <= before,
            TiePolicy::Reject => after < before,
        }
    }
}

/// Result of a search run. The network is handed back by value: the caller
/// gave it up for the duration of the run, so no intermediate trial state is
/// ever observable from outside.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub network: Network,
    pub strategy: &'static str,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub accepted_moves: usize,
    pub reverted_moves: usize,
    /// Iterations for hill climbing, passes for descent
    pub iterations: usize,
    /// False when descent stopped on its pass cap rather than a fixed point
    pub converged: bool,
}

/// Serializable view of a [`SearchReport`] without the network itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    pub strategy: String,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub accepted_moves: usize,
    pub reverted_moves: usize,
    pub iterations: usize,
    pub converged: bool,
}

impl SearchReport {
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            strategy: self.strategy.to_string(),
            initial_cost: self.initial_cost,
            final_cost: self.final_cost,
            accepted_moves: self.accepted_moves,
            reverted_moves: self.reverted_moves,
            iterations: self.iterations,
            converged: self.converged,
        }
    }
}

/// A local search over house-to-generator assignments.
pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    fn search(&mut self, network: Network, cost: &CostModel) -> SearchReport;
}

pub struct NetworkOptimizer {
    pub strategy: Box<dyn SearchStrategy>,
    pub cost: CostModel,
}

impl NetworkOptimizer {
    pub fn new(strategy: Box<dyn SearchStrategy>, cost: CostModel) -> Self {
        Self { strategy, cost }
    }

    pub fn optimize(&mut self, network: Network) -> SearchReport {
        self.strategy.search(network, &self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_policy() {
        assert!(TiePolicy::Accept.keeps(1.0, 1.0));
        assert!(TiePolicy::Accept.keeps(1.0, 0.5));
        assert!(!TiePolicy::Accept.keeps(1.0, 1.5));

        assert!(!TiePolicy::Reject.keeps(1.0, 1.0));
        assert!(TiePolicy::Reject.keeps(1.0, 0.5));

        assert_eq!(TiePolicy::from_accept_ties(false), TiePolicy::Reject);
        assert_eq!(TiePolicy::default(), TiePolicy::Accept);
    }
}
