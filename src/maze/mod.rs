pub mod cell;
mod grid;

pub use cell::GridCell;
pub use grid::Grid;

/// A grid coordinate as `(row, col)`, 0-indexed from the top-left corner.
pub type Coord = (u16, u16);

/// Unit offsets to the four orthogonal neighbors: up, down, left, right.
pub const UNIT_OFFSETS: [(i16, i16); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Get neighbors of a cell.
/// A neighbor is considered a path cell that is one step away in the cardinal directions,
/// visited in the order up, down, left, right.
pub fn get_neighbors(coord: Coord, grid: &Grid) -> impl Iterator<Item = Coord> + '_ {
    UNIT_OFFSETS
        .into_iter()
        .filter_map(move |offset| grid.step(coord, offset))
        .filter(move |&c| grid[c].is_path())
}
