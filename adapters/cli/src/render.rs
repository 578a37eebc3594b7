//! Plain-text presentation of a session.

use tilemerge_core::CellCoord;
use tilemerge_world::{query, World};

const CELL_WIDTH: usize = 6;
const EMPTY_CELL: &str = ".";
const SPAWN_MARKER: char = '*';

/// Renders the grid, one row per line, followed by a status line.
///
/// The most recently spawned tile carries a trailing `*`.
pub(crate) fn render(world: &World) -> String {
    let mut out = String::new();
    for (row_index, row) in query::rows(world).into_iter().enumerate() {
        let mut line = String::new();
        for (column_index, cell) in row.into_iter().enumerate() {
            let coord = CellCoord::new(column_index as u32, row_index as u32);
            let label = cell.map_or_else(|| EMPTY_CELL.to_owned(), |tile| tile.to_string());
            let marker = if query::is_last_spawned(world, coord) {
                SPAWN_MARKER
            } else {
                ' '
            };
            line.push_str(&format!("{label:>CELL_WIDTH$}{marker}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let best = query::highest_tile(world).map_or(0, |tile| tile.value());
    let state = if query::is_game_over(world) {
        "game over"
    } else {
        "in play"
    };
    out.push_str(&format!(
        "score {}  best {best}  {state}",
        query::score(world)
    ));
    out
}
