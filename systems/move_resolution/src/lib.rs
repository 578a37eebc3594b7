#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure move-resolution system that slides and merges tiles.
//!
//! Every line perpendicular to the move is resolved independently in a single
//! pass: tiles are read from the destination edge backwards, equal neighbours
//! merge once, and a tile produced by a merge never merges again within the
//! same move.

use tilemerge_core::{CellCoord, Direction, Grid, TileValue, GRID_SIZE};

/// Grid and score produced by resolving a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    grid: Grid,
    score_delta: u64,
    merges: u32,
}

impl Resolution {
    /// Grid after sliding and merging, before any spawn.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the resolution, yielding the resolved grid.
    #[must_use]
    pub const fn into_grid(self) -> Grid {
        self.grid
    }

    /// Sum of the values of every tile produced by a merge.
    #[must_use]
    pub const fn score_delta(&self) -> u64 {
        self.score_delta
    }

    /// Number of merges performed.
    #[must_use]
    pub const fn merges(&self) -> u32 {
        self.merges
    }

    /// Reports whether the resolved grid differs cell-for-cell from `original`.
    #[must_use]
    pub fn changed(&self, original: &Grid) -> bool {
        self.grid != *original
    }
}

/// Outcome of collapsing a single line toward its destination edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCollapse {
    /// Cells of the line ordered from the destination edge.
    pub cells: [Option<TileValue>; GRID_SIZE],
    /// Points earned by merges within the line.
    pub score: u64,
    /// Number of merges performed within the line.
    pub merges: u32,
}

/// Resolves a move of every tile on `grid` toward `direction`.
///
/// The input grid is left untouched; callers compare it against
/// [`Resolution::grid`] to detect a no-op move.
#[must_use]
pub fn resolve(grid: &Grid, direction: Direction) -> Resolution {
    let mut resolved = Grid::EMPTY;
    let mut score_delta = 0;
    let mut merges = 0;

    for line in 0..GRID_SIZE {
        let cells = line_cells(direction, line);
        let collapse = collapse_line(cells.map(|cell| grid.get(cell)));
        for (cell, value) in cells.into_iter().zip(collapse.cells) {
            resolved.set(cell, value);
        }
        score_delta += collapse.score;
        merges += collapse.merges;
    }

    Resolution {
        grid: resolved,
        score_delta,
        merges,
    }
}

/// Slides and merges one line whose cells are ordered from the destination edge.
#[must_use]
pub fn collapse_line(line: [Option<TileValue>; GRID_SIZE]) -> LineCollapse {
    let mut cells = [None; GRID_SIZE];
    let mut written = 0;
    let mut score = 0;
    let mut merges = 0;
    let mut pending: Option<TileValue> = None;

    for tile in line.into_iter().flatten() {
        match pending {
            Some(current) if current == tile => {
                let merged = current.doubled();
                cells[written] = Some(merged);
                written += 1;
                score += u64::from(merged.value());
                merges += 1;
                pending = None;
            }
            Some(current) => {
                cells[written] = Some(current);
                written += 1;
                pending = Some(tile);
            }
            None => pending = Some(tile),
        }
    }

    if let Some(current) = pending {
        cells[written] = Some(current);
    }

    LineCollapse {
        cells,
        score,
        merges,
    }
}

/// Cells of line `line`, ordered from the edge tiles travel toward.
fn line_cells(direction: Direction, line: usize) -> [CellCoord; GRID_SIZE] {
    std::array::from_fn(|offset| {
        let far = GRID_SIZE - 1 - offset;
        let (column, row) = match direction {
            Direction::Left => (offset, line),
            Direction::Right => (far, line),
            Direction::Up => (line, offset),
            Direction::Down => (line, far),
        };
        CellCoord::new(column as u32, row as u32)
    })
}
