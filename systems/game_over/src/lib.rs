#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides whether any legal move remains on a grid.

use tilemerge_core::{Direction, Grid};
use tilemerge_system_move_resolution::resolve;

/// Reports whether at least one move would change `grid`.
///
/// A move exists when an empty cell borders any other cell, or when two
/// orthogonally adjacent tiles hold the same value. Only right and down
/// neighbours are inspected because adjacency is symmetric.
#[must_use]
pub fn has_legal_move(grid: &Grid) -> bool {
    grid.cells().any(|(cell, content)| {
        [Direction::Right, Direction::Down]
            .into_iter()
            .filter_map(|direction| cell.neighbor(direction))
            .map(|neighbor| grid.get(neighbor))
            .any(|neighbor| content.is_none() || neighbor.is_none() || neighbor == content)
    })
}

/// Reports whether the game is over: the grid is full and no merge is possible.
#[must_use]
pub fn is_game_over(grid: &Grid) -> bool {
    !has_legal_move(grid)
}

/// Directions whose resolution would change `grid`, in [`Direction::ALL`] order.
#[must_use]
pub fn legal_directions(grid: &Grid) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|direction| resolve(grid, *direction).changed(grid))
        .collect()
}
