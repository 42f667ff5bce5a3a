use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};

use crate::maze::{Coord, Grid};

/// Chance that an eligible cell becomes a trap, regardless of difficulty.
pub const TRAP_RATE: f64 = 0.05;

/// Path cells other than the start and finish.
fn open_cells(grid: &Grid, start: Coord, finish: Coord) -> impl Iterator<Item = Coord> + '_ {
    grid.path_cells()
        .filter(move |&cell| cell != start && cell != finish)
}

/// Drop a coin on each open cell with probability `coin_rate`.
pub fn place_coins<R: Rng + ?Sized>(
    grid: &Grid,
    start: Coord,
    finish: Coord,
    coin_rate: f64,
    rng: &mut R,
) -> HashSet<Coord> {
    open_cells(grid, start, finish)
        .filter(|_| rng.random_bool(coin_rate))
        .collect()
}

/// Arm a trap on each open, coin-free cell with probability [`TRAP_RATE`].
pub fn place_traps<R: Rng + ?Sized>(
    grid: &Grid,
    start: Coord,
    finish: Coord,
    coins: &HashSet<Coord>,
    rng: &mut R,
) -> HashSet<Coord> {
    open_cells(grid, start, finish)
        .filter(|cell| !coins.contains(cell))
        .filter(|_| rng.random_bool(TRAP_RATE))
        .collect()
}

/// Pick up to `count` distinct open cells uniformly at random.
/// Coins and traps are not excluded.
pub fn place_adversaries<R: Rng + ?Sized>(
    grid: &Grid,
    start: Coord,
    finish: Coord,
    count: usize,
    rng: &mut R,
) -> Vec<Coord> {
    let mut candidates = open_cells(grid, start, finish).collect::<Vec<_>>();
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}
