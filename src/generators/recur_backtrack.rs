use crate::{
    generators::shuffled,
    maze::{Coord, Grid, GridCell},
};
use rand::Rng;

/// Two-step offsets between rooms on the odd-indexed lattice.
const ROOM_OFFSETS: [(i16, i16); 4] = [(-2, 0), (0, 2), (2, 0), (0, -2)];

/// Randomized depth-first backtracking over the odd-indexed rooms, starting at (1, 1).
/// Every room ends up connected to the start by exactly one simple path.
pub fn recursive_backtrack<R: Rng + ?Sized>(rows: u16, cols: u16, rng: &mut R) -> Grid {
    // Initialize the maze with walls
    let mut grid = Grid::new(rows, cols, GridCell::WALL);

    let start: Coord = (1, 1);
    grid.set(start, GridCell::PATH);

    // The stack keeps only path cells
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        let next = shuffled(ROOM_OFFSETS, rng).into_iter().find_map(|offset| {
            let target = grid.step(cell, offset)?;
            (grid.is_interior(target) && grid[target] == GridCell::WALL).then_some((offset, target))
        });

        match next {
            Some((offset, target)) => {
                // Carve the wall in between, then the room itself
                let wall = (
                    cell.0.wrapping_add_signed(offset.0 / 2),
                    cell.1.wrapping_add_signed(offset.1 / 2),
                );
                grid.set(wall, GridCell::PATH);
                grid.set(target, GridCell::PATH);
                stack.push(target);
            }
            None => {
                // Dead end, backtrack
                stack.pop();
            }
        }
    }

    grid
}
