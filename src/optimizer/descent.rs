//! Sequential descent
//!
//! Deterministic local search. Each pass walks a snapshot of the connected
//! houses (generator insertion order, then connection order) and tries every
//! other generator for each house in turn. A kept move becomes the new origin
//! for the remaining candidates of the same house, so a house may hop through
//! several generators in one pass: this is first-acceptance, not a best-of-all
//! neighbors search.
//!
//! Passes repeat until one pass keeps no move. With ties accepted an
//! equal-cost cycle can keep that from ever happening, so the number of passes
//! is capped.

use tracing::{debug, info, warn};

use super::{CostModel, SearchReport, SearchStrategy, TiePolicy};
use crate::domain::{GeneratorId, HouseId, Network};

/// Default safety cap on the number of passes
pub const DEFAULT_MAX_PASSES: usize = 64;

#[derive(Debug, Clone)]
pub struct SequentialDescent {
    pub tie_policy: TiePolicy,
    pub max_passes: usize,
}

impl Default for SequentialDescent {
    fn default() -> Self {
        Self {
            tie_policy: TiePolicy::Accept,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl SequentialDescent {
    pub fn new(tie_policy: TiePolicy, max_passes: usize) -> Self {
        Self {
            tie_policy,
            max_passes,
        }
    }

    /// One pass over the current connected houses. Returns the number of kept
    /// and reverted moves.
    fn pass(&self, network: &mut Network, cost: &CostModel, generators: &[GeneratorId]) -> (usize, usize) {
        let snapshot: Vec<HouseId> = generators
            .iter()
            .flat_map(|&g| network.houses_on(g).iter().copied())
            .collect();

        let mut kept = 0;
        let mut reverted = 0;

        for house in snapshot {
            let Some(start) = network.assigned_generator(house) else {
                continue;
            };
            let mut origin = start;

            for &candidate in generators {
                if candidate == start || candidate == origin {
                    continue;
                }

                let before = cost.cost(network);
                let relocation = network.relocate(house, Some(candidate));
                let after = cost.cost(network);

                if self.tie_policy.keeps(before, after) {
                    origin = candidate;
                    kept += 1;
                } else {
                    network.undo(relocation);
                    reverted += 1;
                }
            }
        }

        (kept, reverted)
    }
}

impl SearchStrategy for SequentialDescent {
    fn name(&self) -> &'static str {
        "descent"
    }

    fn search(&mut self, mut network: Network, cost: &CostModel) -> SearchReport {
        let initial_cost = cost.cost(&network);
        let generators: Vec<GeneratorId> = network.generator_ids().collect();

        info!(
            generators = generators.len(),
            max_passes = self.max_passes,
            initial_cost,
            "starting sequential descent"
        );

        let mut accepted_moves = 0;
        let mut reverted_moves = 0;
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;
            let (kept, reverted) = self.pass(&mut network, cost, &generators);
            accepted_moves += kept;
            reverted_moves += reverted;
            debug!(pass = passes, kept, reverted, cost = cost.cost(&network), "pass done");

            if kept == 0 {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                passes,
                "descent stopped on its pass cap before reaching a fixed point"
            );
        }

        let final_cost = cost.cost(&network);
        info!(passes, accepted_moves, final_cost, converged, "sequential descent finished");

        SearchReport {
            network,
            strategy: self.name(),
            initial_cost,
            final_cost,
            accepted_moves,
            reverted_moves,
            iterations: passes,
            converged,
        }
    }
}

/// Run sequential descent with the default settings.
pub fn run_descent_search(network: Network, cost: &CostModel) -> SearchReport {
    SequentialDescent::default().search(network, cost)
}
