#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tile-merge engine.
//!
//! This crate defines the data surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems operate on immutable [`Grid`] values and return new ones.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells along each edge of the square grid.
pub const GRID_SIZE: usize = 4;

/// Total number of cells stored by a [`Grid`].
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Largest exponent a [`TileValue`] can carry while its value still fits a `u32`.
const MAX_EXPONENT: u8 = 31;

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current game and seeds a fresh one.
    Reset,
    /// Slides every tile toward the provided edge of the grid.
    Play {
        /// Edge the tiles travel toward.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that the session was re-initialised with two seed tiles.
    GameReset,
    /// Confirms that a new tile was placed on a previously empty cell.
    TileSpawned {
        /// Cell that received the tile.
        cell: CellCoord,
        /// Value of the spawned tile.
        value: TileValue,
    },
    /// Confirms that a move changed the grid.
    TilesMoved {
        /// Direction of the accepted move.
        direction: Direction,
        /// Points earned by the merges performed during the move.
        score_delta: u64,
        /// Number of merges performed during the move.
        merges: u32,
    },
    /// Reports that a move request was rejected without mutating the session.
    MoveRejected {
        /// Direction of the rejected move.
        direction: Direction,
        /// Specific reason the move was rejected.
        reason: RejectionReason,
    },
    /// Announces that no legal move remains.
    GameOver {
        /// Final score of the finished game.
        score: u64,
    },
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Resolving the move produced a grid identical to the current one.
    Unchanged,
    /// The session already reached its terminal state.
    GameOver,
}

/// Result of a single `play` call as observed by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The move changed the grid and the game continues.
    Moved {
        /// Points earned by the merges performed during the move.
        score_delta: u64,
    },
    /// The move would not change the grid, so nothing happened.
    Invalid,
    /// The game is over, either before or as a result of this move.
    GameOver,
}

/// Lifecycle tag of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Moves are accepted.
    #[default]
    InPlay,
    /// No legal move remains; only a reset leaves this state.
    GameOver,
}

/// Edge of the grid that tiles slide toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed, deterministic order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Error returned when text cannot be interpreted as a [`Direction`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a direction; expected up, down, left or right")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Self::Up),
            "d" | "down" => Ok(Self::Down),
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            _ => Err(ParseDirectionError(value.to_owned())),
        }
    }
}

/// Location of a single grid cell expressed as column (x) and row (y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the coordinate lies inside a `GRID_SIZE` square grid.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        (self.column as usize) < GRID_SIZE && (self.row as usize) < GRID_SIZE
    }

    /// Cell reached by stepping once toward `direction`, if it stays on the grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_sub(1)),
            Direction::Down => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
        };
        let cell = CellCoord::new(column?, row?);
        cell.in_bounds().then_some(cell)
    }

    fn index(self) -> usize {
        assert!(
            self.in_bounds(),
            "cell ({}, {}) lies outside the {GRID_SIZE}x{GRID_SIZE} grid",
            self.column,
            self.row
        );
        self.row as usize * GRID_SIZE + self.column as usize
    }

    fn from_index(index: usize) -> Self {
        Self::new((index % GRID_SIZE) as u32, (index / GRID_SIZE) as u32)
    }
}

/// Value carried by a tile: always a power of two no smaller than 2.
///
/// Stored as its exponent, so an invalid value cannot be represented.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TileValue(u8);

impl TileValue {
    /// The tile most spawns produce.
    pub const TWO: TileValue = TileValue(1);
    /// The less frequent spawn value.
    pub const FOUR: TileValue = TileValue(2);

    /// Creates a tile from its face value, rejecting anything that is not a power of two ≥ 2.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value < 2 || !value.is_power_of_two() {
            return None;
        }
        Some(Self(value.trailing_zeros() as u8))
    }

    /// Face value of the tile.
    #[must_use]
    pub const fn value(&self) -> u32 {
        1 << self.0
    }

    /// Base-two logarithm of the face value.
    #[must_use]
    pub const fn exponent(&self) -> u8 {
        self.0
    }

    /// Tile produced by merging two tiles of this value.
    #[must_use]
    pub const fn doubled(self) -> Self {
        if self.0 >= MAX_EXPONENT {
            self
        } else {
            Self(self.0 + 1)
        }
    }
}

impl fmt::Debug for TileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileValue({})", self.value())
    }
}

impl fmt::Display for TileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Error returned when a number is not a valid tile value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{0} is not a power of two greater than or equal to 2")]
pub struct InvalidTileValue(pub u32);

impl TryFrom<u32> for TileValue {
    type Error = InvalidTileValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidTileValue(value))
    }
}

impl From<TileValue> for u32 {
    fn from(tile: TileValue) -> Self {
        tile.value()
    }
}

/// Errors raised when row-major data does not describe a square grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridShapeError {
    /// The number of rows differs from [`GRID_SIZE`].
    #[error("expected {} rows, found {0}", GRID_SIZE)]
    RowCount(usize),
    /// A row holds a number of cells different from [`GRID_SIZE`].
    #[error("row {row} holds {found} cells, expected {}", GRID_SIZE)]
    RowLength {
        /// Index of the offending row.
        row: usize,
        /// Number of cells found in the row.
        found: usize,
    },
}

/// Fixed-size square grid of cells stored as a dense arena.
///
/// Cells are addressed by [`CellCoord`] and stored at `row * GRID_SIZE + column`.
/// Accessing a cell outside the grid is a programming error and panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Option<TileValue>; CELL_COUNT],
}

impl Grid {
    /// A grid without any tiles.
    pub const EMPTY: Grid = Grid {
        cells: [None; CELL_COUNT],
    };

    /// Builds a grid from row-major cell data.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridShapeError>
    where
        R: AsRef<[Option<TileValue>]>,
    {
        if rows.len() != GRID_SIZE {
            return Err(GridShapeError::RowCount(rows.len()));
        }

        let mut grid = Grid::EMPTY;
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != GRID_SIZE {
                return Err(GridShapeError::RowLength {
                    row: row_index,
                    found: row.len(),
                });
            }
            let start = row_index * GRID_SIZE;
            grid.cells[start..start + GRID_SIZE].copy_from_slice(row);
        }
        Ok(grid)
    }

    /// Returns the tile stored at `cell`, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<TileValue> {
        self.cells[cell.index()]
    }

    /// Stores `value` at `cell`, replacing whatever was there.
    pub fn set(&mut self, cell: CellCoord, value: Option<TileValue>) {
        self.cells[cell.index()] = value;
    }

    /// Enumerates the empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.cells()
            .filter(|(_, content)| content.is_none())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Reports whether every cell holds a tile.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Iterator over every cell together with its content, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Option<TileValue>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (CellCoord::from_index(index), *cell))
    }

    /// Iterator over every occupied cell together with its tile, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, TileValue)> + '_ {
        self.cells()
            .filter_map(|(cell, content)| content.map(|tile| (cell, tile)))
    }

    /// Copies the grid into row-major rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Option<TileValue>>> {
        self.cells
            .chunks(GRID_SIZE)
            .map(<[Option<TileValue>]>::to_vec)
            .collect()
    }

    /// Largest tile on the grid, if any.
    #[must_use]
    pub fn highest_tile(&self) -> Option<TileValue> {
        self.cells.iter().flatten().copied().max()
    }
}

/// Plain-data image of a session used by persistence collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Row-major cell values; `None` marks an empty cell.
    pub rows: Vec<Vec<Option<TileValue>>>,
    /// Score accumulated by the session.
    pub score: u64,
    /// Cell that received the most recent spawn, if any.
    pub last_spawned: Option<CellCoord>,
    /// Lifecycle tag of the session.
    pub state: GameState,
}
