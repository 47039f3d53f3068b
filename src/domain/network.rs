//! # Network Model
//!
//! Owns the generators, the houses and the assignment between them.
//!
//! Hard invariant: total consumption (every house, connected or not) never
//! exceeds total capacity. Upserts that would break it are rejected and leave
//! the network untouched. A single generator carrying more than its own
//! capacity is allowed here; it is penalized by the cost model instead.
//!
//! All assignment changes go through `Network::relocate`, and all aggregate
//! changes through the two upsert gates, so the running totals and the
//! per-generator feeds cannot drift apart.

use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use super::types::{GeneratorId, HouseId, NameKey};
use super::{Generator, House};
use crate::error::{NetworkError, NetworkResult};

/// Enough of an assignment change to reverse it exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Relocation {
    house: HouseId,
    from: Option<(GeneratorId, usize)>,
    to: Option<GeneratorId>,
}

impl Relocation {
    pub(crate) fn previous(&self) -> Option<GeneratorId> {
        self.from.map(|(g, _)| g)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Network {
    generators: Vec<Generator>,
    houses: Vec<House>,
    generator_index: HashMap<NameKey, GeneratorId>,
    house_index: HashMap<NameKey, HouseId>,
    /// Houses fed by each generator, in connection order
    feeds: Vec<Vec<HouseId>>,
    /// Generator feeding each house, `None` while unconnected
    assignment: Vec<Option<GeneratorId>>,
    total_capacity: u64,
    total_consumption: u64,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Upserts
    // ------------------------------------------------------------------------

    /// Add a generator, or update the capacity of an existing one with the same
    /// (case-insensitive) name.
    pub fn add_generator(&mut self, generator: Generator) -> NetworkResult<GeneratorId> {
        let capacity = u64::from(generator.capacity());

        if let Some(&id) = self.generator_index.get(&generator.key()) {
            let old_capacity = u64::from(self.generators[id.0].capacity());
            let new_total = self.total_capacity - old_capacity + capacity;
            if new_total < self.total_consumption {
                debug!(
                    generator = generator.name(),
                    new_total, consumption = self.total_consumption,
                    "capacity update rejected"
                );
                return Err(NetworkError::CapacityExceeded {
                    consumption: self.total_consumption,
                    capacity: new_total,
                });
            }

            self.generators[id.0].set_capacity(generator.capacity());
            self.total_capacity = new_total;
            debug!(
                generator = self.generators[id.0].name(),
                capacity, total_capacity = self.total_capacity,
                "generator capacity updated"
            );
            return Ok(id);
        }

        let id = GeneratorId(self.generators.len());
        self.generator_index.insert(generator.key(), id);
        self.total_capacity += capacity;
        debug!(
            generator = generator.name(),
            capacity, total_capacity = self.total_capacity,
            "generator added"
        );
        self.generators.push(generator);
        self.feeds.push(Vec::new());
        Ok(id)
    }

    /// Add a house (unconnected), or update the consumption class of an existing
    /// one whether it is connected or not.
    pub fn add_house(&mut self, house: House) -> NetworkResult<HouseId> {
        let consumption = u64::from(house.consumption());

        if let Some(&id) = self.house_index.get(&house.key()) {
            let old_consumption = u64::from(self.houses[id.0].consumption());
            let new_total = self.total_consumption - old_consumption + consumption;
            if new_total > self.total_capacity {
                debug!(house = house.name(), new_total, "consumption update rejected");
                return Err(NetworkError::CapacityExceeded {
                    consumption: new_total,
                    capacity: self.total_capacity,
                });
            }

            self.houses[id.0].set_class(house.class());
            self.total_consumption = new_total;
            debug!(
                house = self.houses[id.0].name(),
                class = %house.class(),
                total_consumption = self.total_consumption,
                "house class updated"
            );
            return Ok(id);
        }

        let new_total = self.total_consumption + consumption;
        if new_total > self.total_capacity {
            debug!(house = house.name(), new_total, "house rejected");
            return Err(NetworkError::CapacityExceeded {
                consumption: new_total,
                capacity: self.total_capacity,
            });
        }

        let id = HouseId(self.houses.len());
        self.house_index.insert(house.key(), id);
        self.total_consumption = new_total;
        debug!(
            house = house.name(),
            class = %house.class(),
            total_consumption = self.total_consumption,
            "house added"
        );
        self.houses.push(house);
        self.assignment.push(None);
        Ok(id)
    }

    // ------------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------------

    /// Link an unconnected house to a generator.
    pub fn connect(&mut self, house: &str, generator: &str) -> NetworkResult<()> {
        let h = self.house_id(house)?;
        let g = self.generator_id(generator)?;

        if let Some(current) = self.assignment[h.0] {
            return Err(NetworkError::AlreadyConnected {
                house: self.houses[h.0].name().to_string(),
                generator: self.generators[current.0].name().to_string(),
            });
        }

        self.relocate(h, Some(g));
        debug!(
            house = self.houses[h.0].name(),
            generator = self.generators[g.0].name(),
            "connected"
        );
        Ok(())
    }

    /// Break the link between a house and the generator feeding it; the house
    /// becomes unconnected again.
    pub fn disconnect(&mut self, house: &str, generator: &str) -> NetworkResult<()> {
        let h = self.house_id(house)?;
        let g = self.generator_id(generator)?;
        self.ensure_linked(h, g)?;

        self.relocate(h, None);
        debug!(
            house = self.houses[h.0].name(),
            generator = self.generators[g.0].name(),
            "disconnected"
        );
        Ok(())
    }

    /// Move a connected house from one generator to another.
    ///
    /// Total consumption does not change, so the capacity invariant holds
    /// without a re-check.
    pub fn reassign(&mut self, house: &str, from: &str, to: &str) -> NetworkResult<()> {
        let h = self.house_id(house)?;
        let from = self.generator_id(from)?;
        let to = self.generator_id(to)?;
        self.ensure_linked(h, from)?;

        if from == to {
            return Err(NetworkError::AlreadyConnected {
                house: self.houses[h.0].name().to_string(),
                generator: self.generators[to.0].name().to_string(),
            });
        }

        self.relocate(h, Some(to));
        debug!(
            house = self.houses[h.0].name(),
            from = self.generators[from.0].name(),
            to = self.generators[to.0].name(),
            "reassigned"
        );
        Ok(())
    }

    /// Replace the link `old_house -> old_generator` with
    /// `new_house -> new_generator`.
    ///
    /// When both houses are the same this is a reassignment, with the same
    /// `AlreadyConnected` error as [`Network::reassign`] when the generator does
    /// not change. Otherwise the old house is disconnected and the new one
    /// (which must be unconnected) takes its place. Everything is validated
    /// before the first mutation.
    pub fn modify_connection(
        &mut self,
        old_house: &str,
        old_generator: &str,
        new_house: &str,
        new_generator: &str,
    ) -> NetworkResult<()> {
        let old_h = self.house_id(old_house)?;
        let old_g = self.generator_id(old_generator)?;
        let new_h = self.house_id(new_house)?;
        let new_g = self.generator_id(new_generator)?;
        self.ensure_linked(old_h, old_g)?;

        if old_h == new_h {
            if old_g == new_g {
                return Err(NetworkError::AlreadyConnected {
                    house: self.houses[old_h.0].name().to_string(),
                    generator: self.generators[new_g.0].name().to_string(),
                });
            }
            self.relocate(old_h, Some(new_g));
        } else {
            if let Some(current) = self.assignment[new_h.0] {
                return Err(NetworkError::AlreadyConnected {
                    house: self.houses[new_h.0].name().to_string(),
                    generator: self.generators[current.0].name().to_string(),
                });
            }
            self.relocate(old_h, None);
            self.relocate(new_h, Some(new_g));
        }

        debug!(
            old_house = self.houses[old_h.0].name(),
            old_generator = self.generators[old_g.0].name(),
            new_house = self.houses[new_h.0].name(),
            new_generator = self.generators[new_g.0].name(),
            "connection modified"
        );
        Ok(())
    }

    /// Single gate for every assignment change. The returned record undoes the
    /// change exactly, including the house's position in its old feed.
    pub(crate) fn relocate(&mut self, house: HouseId, to: Option<GeneratorId>) -> Relocation {
        let from = self.assignment[house.0].map(|g| {
            let position = self.feeds[g.0]
                .iter()
                .position(|&h| h == house)
                .unwrap_or(self.feeds[g.0].len());
            (g, position)
        });
        let relocation = Relocation { house, from, to };
        if from.map(|(g, _)| g) == to {
            return relocation;
        }
        if let Some((g, position)) = from {
            self.feeds[g.0].remove(position);
        }
        if let Some(g) = to {
            self.feeds[g.0].push(house);
        }
        self.assignment[house.0] = to;
        relocation
    }

    pub(crate) fn undo(&mut self, relocation: Relocation) {
        let Relocation { house, from, to } = relocation;
        if from.map(|(g, _)| g) == to {
            return;
        }
        if let Some(g) = to {
            self.feeds[g.0].retain(|&h| h != house);
        }
        if let Some((g, position)) = from {
            let position = position.min(self.feeds[g.0].len());
            self.feeds[g.0].insert(position, house);
        }
        self.assignment[house.0] = from.map(|(g, _)| g);
    }

    fn ensure_linked(&self, house: HouseId, generator: GeneratorId) -> NetworkResult<()> {
        if self.assignment[house.0] == Some(generator) {
            Ok(())
        } else {
            Err(NetworkError::NotConnected {
                house: self.houses[house.0].name().to_string(),
                generator: self.generators[generator.0].name().to_string(),
            })
        }
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn generator_id(&self, name: &str) -> NetworkResult<GeneratorId> {
        self.generator_index
            .get(&NameKey::new(name))
            .copied()
            .ok_or_else(|| NetworkError::generator_not_found(name))
    }

    pub fn house_id(&self, name: &str) -> NetworkResult<HouseId> {
        self.house_index
            .get(&NameKey::new(name))
            .copied()
            .ok_or_else(|| NetworkError::house_not_found(name))
    }

    /// Resolve a pair of names given in either order: one must name a house and
    /// the other a generator.
    pub fn resolve_pair(&self, a: &str, b: &str) -> NetworkResult<(HouseId, GeneratorId)> {
        if let (Ok(h), Ok(g)) = (self.house_id(a), self.generator_id(b)) {
            return Ok((h, g));
        }
        if let (Ok(h), Ok(g)) = (self.house_id(b), self.generator_id(a)) {
            return Ok((h, g));
        }
        if self.house_id(a).is_err() && self.house_id(b).is_err() {
            Err(NetworkError::house_not_found(a))
        } else if self.house_id(a).is_ok() {
            Err(NetworkError::generator_not_found(b))
        } else {
            Err(NetworkError::generator_not_found(a))
        }
    }

    pub fn generator(&self, name: &str) -> Option<&Generator> {
        self.generator_id(name).ok().map(|id| &self.generators[id.0])
    }

    pub fn house(&self, name: &str) -> Option<&House> {
        self.house_id(name).ok().map(|id| &self.houses[id.0])
    }

    /// # Panics
    ///
    /// If `id` was issued by another network and is out of range here.
    pub fn generator_at(&self, id: GeneratorId) -> &Generator {
        &self.generators[id.0]
    }

    /// # Panics
    ///
    /// If `id` was issued by another network and is out of range here.
    pub fn house_at(&self, id: HouseId) -> &House {
        &self.houses[id.0]
    }

    /// Generators in insertion order.
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Houses in insertion order, connected or not.
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn generator_ids(&self) -> impl Iterator<Item = GeneratorId> + '_ {
        (0..self.generators.len()).map(GeneratorId)
    }

    pub fn house_ids(&self) -> impl Iterator<Item = HouseId> + '_ {
        (0..self.houses.len()).map(HouseId)
    }

    /// Houses fed by a generator, in connection order.
    ///
    /// # Panics
    ///
    /// If `generator` was issued by another network and is out of range here.
    pub fn houses_on(&self, generator: GeneratorId) -> &[HouseId] {
        &self.feeds[generator.0]
    }

    /// # Panics
    ///
    /// If `house` was issued by another network and is out of range here.
    pub fn assigned_generator(&self, house: HouseId) -> Option<GeneratorId> {
        self.assignment[house.0]
    }

    /// The generator currently feeding the named house.
    pub fn generator_of(&self, house: &str) -> Option<&Generator> {
        let h = self.house_id(house).ok()?;
        self.assignment[h.0].map(|g| &self.generators[g.0])
    }

    pub fn unconnected(&self) -> impl Iterator<Item = &House> + '_ {
        self.house_ids()
            .filter(|h| self.assignment[h.0].is_none())
            .map(|h| &self.houses[h.0])
    }

    /// All `(generator, house)` links, generator insertion order first.
    pub fn connections(&self) -> impl Iterator<Item = (&Generator, &House)> + '_ {
        self.generator_ids().flat_map(move |g| {
            self.feeds[g.0]
                .iter()
                .map(move |h| (&self.generators[g.0], &self.houses[h.0]))
        })
    }

    /// Sum of consumption of the houses fed by a generator (kW).
    ///
    /// # Panics
    ///
    /// If `generator` was issued by another network and is out of range here.
    pub fn load(&self, generator: GeneratorId) -> u64 {
        self.feeds[generator.0]
            .iter()
            .map(|h| u64::from(self.houses[h.0].consumption()))
            .sum()
    }

    pub fn total_capacity(&self) -> u64 {
        self.total_capacity
    }

    pub fn total_consumption(&self) -> u64 {
        self.total_consumption
    }

    /// A network is valid when every house is connected. An empty network is
    /// valid.
    pub fn is_valid(&self) -> bool {
        self.assignment.iter().all(Option::is_some)
    }

    /// At least one generator and one unconnected house exist.
    pub fn can_connect(&self) -> bool {
        !self.generators.is_empty() && self.assignment.iter().any(Option::is_none)
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty() && self.houses.is_empty()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== ELECTRICAL NETWORK =====")?;

        if self.generators.is_empty() {
            writeln!(f, "No generator in the network.")?;
        }

        for g in self.generator_ids() {
            writeln!(f, "{} feeds:", self.generators[g.0])?;
            if self.feeds[g.0].is_empty() {
                writeln!(f, "   no house connected")?;
            }
            for h in &self.feeds[g.0] {
                writeln!(f, "   - {}", self.houses[h.0])?;
            }
        }

        let unconnected = self.unconnected().map(|h| h.name()).join(", ");
        if !unconnected.is_empty() {
            writeln!(f, "Unconnected houses: {}", unconnected)?;
        }

        write!(
            f,
            "Total capacity: {} kW | Total consumption: {} kW",
            self.total_capacity, self.total_consumption
        )
    }
}
