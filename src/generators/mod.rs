use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

mod recur_backtrack;

pub use recur_backtrack::recursive_backtrack;

use crate::maze::Grid;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Return a uniformly random permutation of `items`.
pub fn shuffled<T, R, const N: usize>(mut items: [T; N], rng: &mut R) -> [T; N]
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
    items
}

/// Carve a new `rows` x `cols` maze.
///
/// Panics if either dimension is even or smaller than 5: the two-step carving
/// only keeps its wall/room parity on odd-sized grids.
pub fn generate_maze<R: Rng + ?Sized>(rows: u16, cols: u16, rng: &mut R) -> Grid {
    assert!(
        rows >= 5 && cols >= 5 && rows % 2 == 1 && cols % 2 == 1,
        "Maze dimensions must be odd and at least 5, got {}x{}",
        rows,
        cols
    );
    let grid = recursive_backtrack(rows, cols, rng);
    tracing::debug!(
        "[generator] Carved {}x{} maze with {} path cells",
        rows,
        cols,
        grid.path_cells().count()
    );
    grid
}
