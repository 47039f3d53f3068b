//! Randomized hill climbing
//!
//! Each iteration draws one house (connected or not) and one generator
//! uniformly at random, moves the house onto that generator and keeps the move
//! unless it makes the cost worse. Termination is purely budget based.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::{CostModel, SearchReport, SearchStrategy, TiePolicy};
use crate::domain::{GeneratorId, HouseId, Network};

/// Default iteration budget
pub const DEFAULT_ITERATIONS: usize = 1000;

pub struct HillClimber<R: Rng> {
    /// Maximum number of trial moves
    pub iterations: usize,
    pub tie_policy: TiePolicy,
    rng: R,
}

impl<R: Rng> HillClimber<R> {
    pub fn new(iterations: usize, rng: R) -> Self {
        Self {
            iterations,
            tie_policy: TiePolicy::Accept,
            rng,
        }
    }

    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }
}

impl HillClimber<StdRng> {
    /// Reproducible when a seed is given, entropy-seeded otherwise.
    pub fn seeded(iterations: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(iterations, rng)
    }
}

impl<R: Rng> SearchStrategy for HillClimber<R> {
    fn name(&self) -> &'static str {
        "random"
    }

    fn search(&mut self, mut network: Network, cost: &CostModel) -> SearchReport {
        let initial_cost = cost.cost(&network);
        let house_count = network.houses().len();
        let generator_count = network.generators().len();

        info!(
            iterations = self.iterations,
            houses = house_count,
            generators = generator_count,
            initial_cost,
            "starting hill climbing"
        );

        let mut accepted_moves = 0;
        let mut reverted_moves = 0;
        let mut iterations = 0;

        while iterations < self.iterations {
            if house_count == 0 || generator_count == 0 {
                debug!("nothing to move, stopping early");
                break;
            }
            iterations += 1;

            let house = HouseId(self.rng.gen_range(0..house_count));
            let target = GeneratorId(self.rng.gen_range(0..generator_count));
            if network.assigned_generator(house) == Some(target) {
                continue;
            }

            let before = cost.cost(&network);
            let relocation = network.relocate(house, Some(target));
            let after = cost.cost(&network);

            if self.tie_policy.keeps(before, after) {
                accepted_moves += 1;
                trace!(
                    house = network.house_at(house).name(),
                    from = ?relocation.previous().map(|g| network.generator_at(g).name()),
                    to = network.generator_at(target).name(),
                    before,
                    after,
                    "move kept"
                );
            } else {
                network.undo(relocation);
                reverted_moves += 1;
            }
        }

        let final_cost = cost.cost(&network);
        info!(
            iterations,
            accepted_moves, reverted_moves, final_cost, "hill climbing finished"
        );

        SearchReport {
            network,
            strategy: self.name(),
            initial_cost,
            final_cost,
            accepted_moves,
            reverted_moves,
            iterations,
            converged: true,
        }
    }
}

/// Run randomized hill climbing for `iterations` trial moves with the given
/// random source.
pub fn run_random_search<R: Rng>(
    network: Network,
    cost: &CostModel,
    iterations: usize,
    rng: &mut R,
) -> SearchReport {
    HillClimber::new(iterations, rng).search(network, cost)
}
