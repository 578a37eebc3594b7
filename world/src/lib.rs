#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for the tile-merge engine.
//!
//! A [`World`] owns one game: its grid, score, last spawned cell, lifecycle
//! tag and random source. Adapters mutate it through [`apply`] (or the
//! [`World::play`] and [`World::reset`] shorthands) and read it through the
//! [`query`] module. Every operation runs to completion synchronously.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tilemerge_core::{
    CellCoord, Command, Direction, Event, GameState, Grid, GridShapeError, MoveOutcome,
    RejectionReason, SessionSnapshot,
};
use tilemerge_system_game_over::is_game_over;
use tilemerge_system_move_resolution::resolve;
use tilemerge_system_spawning::{SpawnDistribution, Spawning};

const DEFAULT_RNG_SEED: u64 = 0x2048_7d3c_91a5_0e6f;

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    rng_seed: u64,
    spawn: SpawnDistribution,
}

impl WorldConfig {
    /// Creates a new configuration using the provided seed and spawn weighting.
    #[must_use]
    pub const fn new(rng_seed: u64, spawn: SpawnDistribution) -> Self {
        Self { rng_seed, spawn }
    }

    /// Seed of the random source that drives spawns.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Weighting of spawned tile values.
    #[must_use]
    pub const fn spawn(&self) -> SpawnDistribution {
        self.spawn
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED, SpawnDistribution::classic())
    }
}

/// Errors raised when a persisted session cannot be resumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The persisted rows do not describe a square grid.
    #[error("persisted grid is malformed: {0}")]
    Shape(#[from] GridShapeError),
    /// The last spawned marker points outside the grid.
    #[error("last spawned cell {0:?} lies outside the grid")]
    LastSpawnedOutOfBounds(CellCoord),
    /// The last spawned marker points at an empty cell.
    #[error("last spawned cell {0:?} is empty")]
    LastSpawnedEmpty(CellCoord),
    /// The session is recorded as finished although its grid still admits a move.
    #[error("session is recorded as finished but its grid still admits a move")]
    GameOverWithLegalMove,
}

/// Represents one authoritative game session.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    score: u64,
    last_spawned: Option<CellCoord>,
    state: GameState,
    spawning: Spawning,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a freshly seeded session ready for play.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let mut world = Self::blank(config);
        world.reset_session(&mut Vec::new());
        world
    }

    /// Resumes a session from the plain data a persistence collaborator stored.
    ///
    /// A session recorded as in play whose grid admits no move is resumed as
    /// finished. A session recorded as finished must have no move left.
    pub fn from_snapshot(
        snapshot: SessionSnapshot,
        config: WorldConfig,
    ) -> Result<Self, SnapshotError> {
        let grid = Grid::from_rows(&snapshot.rows)?;

        if let Some(cell) = snapshot.last_spawned {
            if !cell.in_bounds() {
                return Err(SnapshotError::LastSpawnedOutOfBounds(cell));
            }
            if grid.get(cell).is_none() {
                return Err(SnapshotError::LastSpawnedEmpty(cell));
            }
        }

        let state = match snapshot.state {
            GameState::InPlay if is_game_over(&grid) => {
                warn!("resumed session has no legal move left; marking it finished");
                GameState::GameOver
            }
            GameState::GameOver if !is_game_over(&grid) => {
                return Err(SnapshotError::GameOverWithLegalMove);
            }
            recorded => recorded,
        };

        let mut world = Self::blank(config);
        world.grid = grid;
        world.score = snapshot.score;
        world.last_spawned = snapshot.last_spawned;
        world.state = state;
        Ok(world)
    }

    /// Discards the current game and seeds a fresh one. Always succeeds.
    pub fn reset(&mut self) {
        self.reset_session(&mut Vec::new());
    }

    /// Plays one move and reports its outcome.
    pub fn play(&mut self, direction: Direction) -> MoveOutcome {
        self.play_move(direction, &mut Vec::new())
    }

    fn blank(config: WorldConfig) -> Self {
        Self {
            grid: Grid::EMPTY,
            score: 0,
            last_spawned: None,
            state: GameState::InPlay,
            spawning: Spawning::new(config.spawn()),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
        }
    }

    fn reset_session(&mut self, out_events: &mut Vec<Event>) {
        let mut grid = Grid::EMPTY;
        let seeds = self.spawning.seed_pair(&mut grid, &mut self.rng);

        self.grid = grid;
        self.score = 0;
        self.last_spawned = None;
        self.state = GameState::InPlay;

        debug!(
            "session reset with seed tiles at {:?} and {:?}",
            seeds[0].cell, seeds[1].cell
        );
        out_events.push(Event::GameReset);
        for seed in seeds {
            out_events.push(Event::TileSpawned {
                cell: seed.cell,
                value: seed.value,
            });
        }
    }

    fn play_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) -> MoveOutcome {
        if self.state == GameState::GameOver {
            debug!("ignoring {direction} move: the game is over");
            out_events.push(Event::MoveRejected {
                direction,
                reason: RejectionReason::GameOver,
            });
            return MoveOutcome::GameOver;
        }

        let resolution = resolve(&self.grid, direction);
        if !resolution.changed(&self.grid) {
            debug!("ignoring {direction} move: the grid would not change");
            out_events.push(Event::MoveRejected {
                direction,
                reason: RejectionReason::Unchanged,
            });
            return MoveOutcome::Invalid;
        }

        let score_delta = resolution.score_delta();
        let merges = resolution.merges();
        let mut grid = resolution.into_grid();
        let spawn = self.spawning.spawn(&mut grid, &mut self.rng);
        let state = match spawn {
            Some(_) if !is_game_over(&grid) => GameState::InPlay,
            _ => GameState::GameOver,
        };

        self.grid = grid;
        self.score += score_delta;
        self.last_spawned = spawn.map(|spawn| spawn.cell);
        self.state = state;

        debug!("{direction} move merged {merges} tiles for {score_delta} points");
        out_events.push(Event::TilesMoved {
            direction,
            score_delta,
            merges,
        });
        if let Some(spawn) = spawn {
            out_events.push(Event::TileSpawned {
                cell: spawn.cell,
                value: spawn.value,
            });
        }

        if state == GameState::GameOver {
            info!("game over with a final score of {}", self.score);
            out_events.push(Event::GameOver { score: self.score });
            return MoveOutcome::GameOver;
        }

        MoveOutcome::Moved { score_delta }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Reset => world.reset_session(out_events),
        Command::Play { direction } => {
            let _ = world.play_move(direction, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tilemerge_core::{CellCoord, Direction, GameState, Grid, SessionSnapshot, TileValue};

    /// Provides read-only access to the current grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Row-major copy of the grid for presentation.
    #[must_use]
    pub fn rows(world: &World) -> Vec<Vec<Option<TileValue>>> {
        world.grid.rows()
    }

    /// Tile stored at `cell`, if any.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid.
    #[must_use]
    pub fn cell(world: &World, cell: CellCoord) -> Option<TileValue> {
        world.grid.get(cell)
    }

    /// Score accumulated during the current game.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Lifecycle tag of the session.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.state == GameState::GameOver
    }

    /// Reports whether `cell` received the most recent spawn.
    #[must_use]
    pub fn is_last_spawned(world: &World, cell: CellCoord) -> bool {
        world.last_spawned == Some(cell)
    }

    /// Cell that received the most recent spawn, if any.
    #[must_use]
    pub fn last_spawned(world: &World) -> Option<CellCoord> {
        world.last_spawned
    }

    /// Largest tile currently on the grid.
    #[must_use]
    pub fn highest_tile(world: &World) -> Option<TileValue> {
        world.grid.highest_tile()
    }

    /// Directions that would currently change the grid.
    #[must_use]
    pub fn legal_directions(world: &World) -> Vec<Direction> {
        if is_game_over(world) {
            return Vec::new();
        }
        tilemerge_system_game_over::legal_directions(&world.grid)
    }

    /// Captures the plain data a persistence collaborator stores.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            rows: world.grid.rows(),
            score: world.score,
            last_spawned: world.last_spawned,
            state: world.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemerge_core::{TileValue, GRID_SIZE};
    use tilemerge_system_spawning::SpawnDistribution;

    fn world_with_rows(rows: [[u32; GRID_SIZE]; GRID_SIZE], state: GameState) -> World {
        world_with_config(rows, state, WorldConfig::default())
    }

    fn world_with_config(
        rows: [[u32; GRID_SIZE]; GRID_SIZE],
        state: GameState,
        config: WorldConfig,
    ) -> World {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|value| TileValue::new(*value)).collect())
            .collect();
        let snapshot = SessionSnapshot {
            rows,
            score: 0,
            last_spawned: None,
            state,
        };
        World::from_snapshot(snapshot, config).expect("valid snapshot")
    }

    #[test]
    fn new_world_is_seeded_with_two_tiles() {
        let world = World::default();
        assert_eq!(world.grid.tiles().count(), 2);
        assert_eq!(world.score, 0);
        assert_eq!(world.state, GameState::InPlay);
        assert_eq!(world.last_spawned, None);
    }

    #[test]
    fn apply_reports_reset_and_seed_spawns() {
        let mut world = World::default();
        let mut events = Vec::new();

        apply(&mut world, Command::Reset, &mut events);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], Event::GameReset);
        assert!(events[1..]
            .iter()
            .all(|event| matches!(event, Event::TileSpawned { .. })));
    }

    #[test]
    fn apply_reports_accepted_move() {
        let mut world = world_with_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], GameState::InPlay);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Play {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events[0],
            Event::TilesMoved {
                direction: Direction::Left,
                score_delta: 4,
                merges: 1,
            }
        );
        match events[1] {
            Event::TileSpawned { cell, .. } => assert_eq!(world.last_spawned, Some(cell)),
            ref other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn apply_reports_rejected_move() {
        let mut world = world_with_rows([[2, 4, 2, 4], [0; 4], [0; 4], [0; 4]], GameState::InPlay);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Play {
                direction: Direction::Right,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                direction: Direction::Right,
                reason: RejectionReason::Unchanged,
            }]
        );
    }

    #[test]
    fn apply_reports_game_over_then_rejects_further_moves() {
        let mut world = world_with_config(
            [
                [8, 8, 32, 64],
                [64, 128, 256, 512],
                [4, 8, 4, 8],
                [8, 4, 8, 4],
            ],
            GameState::InPlay,
            WorldConfig::new(5, SpawnDistribution::always_two()),
        );
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Play {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TilesMoved {
                    direction: Direction::Left,
                    score_delta: 16,
                    merges: 1,
                },
                Event::TileSpawned {
                    cell: CellCoord::new(3, 0),
                    value: TileValue::TWO,
                },
                Event::GameOver { score: 16 },
            ]
        );

        events.clear();
        apply(
            &mut world,
            Command::Play {
                direction: Direction::Right,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                direction: Direction::Right,
                reason: RejectionReason::GameOver,
            }]
        );
        assert_eq!(world.score, 16);
    }
}
