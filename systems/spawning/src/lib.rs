#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for placing new tiles on empty cells.
//!
//! Cells are chosen uniformly among the empty ones and values are drawn from a
//! [`SpawnDistribution`]. Randomness comes from any [`rand::Rng`], so callers
//! decide between seeded generators for replays and mocks for tests.

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tilemerge_core::{CellCoord, Grid, TileValue};

/// Probability that a spawned tile is a 4 in the classic game.
pub const CLASSIC_FOUR_PROBABILITY: f64 = 0.1;

/// Errors raised when a spawn distribution is configured with unusable weights.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SpawnConfigError {
    /// The probability of spawning a 4 lies outside `0.0..=1.0` or is not a number.
    #[error("probability of spawning a 4 must lie within 0.0..=1.0, got {0}")]
    ProbabilityOutOfRange(f64),
}

/// Weighting of the two values a spawned tile may take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnDistribution {
    four_probability: f64,
}

impl SpawnDistribution {
    /// Spawns a 4 one time in ten and a 2 otherwise.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            four_probability: CLASSIC_FOUR_PROBABILITY,
        }
    }

    /// Never spawns anything but a 2.
    #[must_use]
    pub const fn always_two() -> Self {
        Self {
            four_probability: 0.0,
        }
    }

    /// Creates a distribution that spawns a 4 with the provided probability.
    pub fn new(four_probability: f64) -> Result<Self, SpawnConfigError> {
        if !(0.0..=1.0).contains(&four_probability) {
            return Err(SpawnConfigError::ProbabilityOutOfRange(four_probability));
        }
        Ok(Self { four_probability })
    }

    /// Probability that a spawned tile is a 4.
    #[must_use]
    pub const fn four_probability(&self) -> f64 {
        self.four_probability
    }

    /// Draws a tile value from the distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TileValue {
        if rng.gen_bool(self.four_probability) {
            TileValue::FOUR
        } else {
            TileValue::TWO
        }
    }
}

impl Default for SpawnDistribution {
    fn default() -> Self {
        Self::classic()
    }
}

/// Placement chosen by the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Spawn {
    /// Previously empty cell that receives the tile.
    pub cell: CellCoord,
    /// Value of the new tile.
    pub value: TileValue,
}

/// Pure system that chooses where new tiles appear.
#[derive(Clone, Copy, Debug, Default)]
pub struct Spawning {
    distribution: SpawnDistribution,
}

impl Spawning {
    /// Creates a spawning system drawing values from `distribution`.
    #[must_use]
    pub const fn new(distribution: SpawnDistribution) -> Self {
        Self { distribution }
    }

    /// Distribution used for tile values.
    #[must_use]
    pub const fn distribution(&self) -> SpawnDistribution {
        self.distribution
    }

    /// Chooses an empty cell and a value without touching the grid.
    ///
    /// Returns `None` when the grid is full.
    pub fn choose<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Option<Spawn> {
        let empty = grid.empty_cells();
        let cell = *empty.choose(rng)?;
        let value = self.distribution.sample(rng);
        Some(Spawn { cell, value })
    }

    /// Places one tile on a random empty cell of `grid`.
    ///
    /// Returns `None` and leaves the grid untouched when no cell is empty.
    pub fn spawn<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Option<Spawn> {
        let spawn = self.choose(grid, rng)?;
        grid.set(spawn.cell, Some(spawn.value));
        Some(spawn)
    }

    /// Places the two tiles that open a game on distinct random empty cells.
    ///
    /// # Panics
    ///
    /// Panics when `grid` has fewer than two empty cells; seeding such a grid
    /// is a programming error.
    pub fn seed_pair<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> [Spawn; 2] {
        let available = grid.empty_cells().len();
        assert!(
            available >= 2,
            "seeding requires two empty cells, found {available}"
        );

        let mut place = || {
            self.spawn(grid, rng)
                .unwrap_or_else(|| unreachable!("an empty cell was counted before seeding"))
        };
        let first = place();
        let second = place();
        [first, second]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_probabilities_outside_unit_interval() {
        assert_eq!(
            SpawnDistribution::new(1.5),
            Err(SpawnConfigError::ProbabilityOutOfRange(1.5))
        );
        assert!(SpawnDistribution::new(-0.1).is_err());
        assert!(SpawnDistribution::new(f64::NAN).is_err());
        assert!(SpawnDistribution::new(0.0).is_ok());
        assert!(SpawnDistribution::new(1.0).is_ok());
    }

    #[test]
    fn default_distribution_is_classic() {
        assert_eq!(
            SpawnDistribution::default().four_probability(),
            CLASSIC_FOUR_PROBABILITY
        );
    }
}
