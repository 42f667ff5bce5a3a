use std::collections::{HashMap, VecDeque};

use crate::maze::{Coord, Grid, get_neighbors};

/// Breadth-first search from `start`, yielding every reachable path cell with its
/// distance in discovery order.
fn bfs(grid: &Grid, start: Coord) -> impl Iterator<Item = (Coord, usize)> + '_ {
    let mut queue = VecDeque::from([(start, 0)]);
    let mut visited = HashMap::from([(start, 0)]);

    std::iter::from_fn(move || {
        let (current, dist) = queue.pop_front()?;
        for neighbor in get_neighbors(current, grid) {
            if !visited.contains_key(&neighbor) {
                visited.insert(neighbor, dist + 1);
                queue.push_back((neighbor, dist + 1));
            }
        }
        Some((current, dist))
    })
}

/// Distance from `start` to every path cell reachable from it.
pub fn distances(grid: &Grid, start: Coord) -> HashMap<Coord, usize> {
    bfs(grid, start).collect()
}

/// Find the path cell farthest from `start`.
///
/// Ties go to the cell dequeued first: a later cell only replaces the incumbent
/// when strictly farther.
pub fn farthest_cell(grid: &Grid, start: Coord) -> Coord {
    debug_assert!(grid.is_path(start), "BFS must start on a path cell");

    let mut farthest = (start, 0);
    for (cell, dist) in bfs(grid, start) {
        if dist > farthest.1 {
            farthest = (cell, dist);
        }
    }
    tracing::debug!(
        "[solver] Farthest cell from {:?} is {:?} at distance {}",
        start,
        farthest.0,
        farthest.1
    );
    farthest.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{generate_maze, get_rng};

    #[test]
    fn test_farthest_in_corridor() {
        let grid = Grid::from_rows(&["#######", "#     #", "#######"]);
        assert_eq!(farthest_cell(&grid, (1, 1)), (1, 5));
        assert_eq!(distances(&grid, (1, 1))[&(1, 5)], 4);
    }

    #[test]
    fn test_tie_goes_to_first_discovered() {
        // Both (3, 1) and (1, 3) sit at distance 2; neighbors are expanded
        // up, down, left, right so the downward branch is dequeued first.
        let grid = Grid::from_rows(&["#####", "#   #", "# ###", "# ###", "#####"]);
        assert_eq!(distances(&grid, (1, 1))[&(1, 3)], 2);
        assert_eq!(distances(&grid, (1, 1))[&(3, 1)], 2);
        assert_eq!(farthest_cell(&grid, (1, 1)), (3, 1));
    }

    #[test]
    fn test_isolated_start_is_its_own_farthest() {
        let grid = Grid::from_rows(&["###", "# #", "###"]);
        assert_eq!(farthest_cell(&grid, (1, 1)), (1, 1));
    }

    #[test]
    fn test_farthest_is_maximal_in_generated_maze() {
        let grid = generate_maze(21, 21, &mut get_rng(Some(1234)));
        let dist = distances(&grid, (1, 1));
        let finish = farthest_cell(&grid, (1, 1));
        let max = dist.values().copied().max().unwrap();
        assert_eq!(dist[&finish], max);
        // Every path cell is reachable
        assert_eq!(dist.len(), grid.path_cells().count());
    }
}
