use std::time::Instant;

use clap::ValueEnum;
use mazerun::game::{Difficulty, Direction, GameSettings, GameState, GameStatus};
use rand::Rng;

/// Give up on a random walk that never ends
const MAX_STEPS: usize = 10_000;
/// Player moves between two adversary ticks
const MOVES_PER_TICK: usize = 4;

fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(100);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s, true).ok())
        .unwrap_or(Difficulty::Extreme);

    let mut rng = rand::rng();
    let (mut won, mut lost, mut unfinished) = (0, 0, 0);
    let mut coins = 0;
    let start_time = Instant::now();

    for i in 0..num_iters {
        let mut state = GameState::new(GameSettings {
            difficulty,
            traps_enabled: true,
            adversaries_enabled: true,
            seed: Some(i as u64),
        });
        for step in 1..=MAX_STEPS {
            if state.status().is_over() {
                break;
            }
            state.move_player(Direction::ALL[rng.random_range(0..Direction::ALL.len())]);
            if step % MOVES_PER_TICK == 0 {
                state.tick();
            }
        }
        coins += state.collected();
        match state.status() {
            GameStatus::Won => won += 1,
            GameStatus::Lost => lost += 1,
            GameStatus::Playing => unfinished += 1,
        }
    }

    tracing::info!(
        "[profile] {} sessions on {:?} in {:?}: {} won, {} lost, {} unfinished, {} coins",
        num_iters,
        difficulty,
        start_time.elapsed(),
        won,
        lost,
        unfinished,
        coins
    );
}
