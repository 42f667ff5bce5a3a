//! Drives the engine through its event queue the way the terminal app does.

use std::{
    sync::mpsc::{RecvTimeoutError, channel},
    time::Duration,
};

use mazerun::game::{
    Difficulty, Direction, EngineExit, GameEngine, GameEvent, GameSettings, GameStatus, Snapshot,
};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn settings(difficulty: Difficulty, adversaries_enabled: bool) -> GameSettings {
    GameSettings {
        difficulty,
        traps_enabled: false,
        adversaries_enabled,
        seed: Some(2024),
    }
}

/// Spawn the engine loop and hand back its queue plus the snapshot stream.
fn spawn_engine(
    settings: GameSettings,
    tick_period: Duration,
) -> (
    std::sync::mpsc::Sender<GameEvent>,
    std::sync::mpsc::Receiver<Snapshot>,
    std::thread::JoinHandle<EngineExit>,
) {
    let engine = GameEngine::new(settings, tick_period);
    let event_tx = engine.sender();
    let (ui_tx, ui_rx) = channel();
    let handle = std::thread::spawn(move || engine.run(ui_tx));
    (event_tx, ui_rx, handle)
}

#[test]
fn adversaries_move_on_their_own() {
    let (event_tx, ui_rx, handle) =
        spawn_engine(settings(Difficulty::Extreme, true), Duration::from_millis(10));

    let initial = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(initial.adversaries.len(), 3);

    // Only the scheduler produces snapshots here; any change must be an adversary step
    let next = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(next.player, initial.player);
    assert_eq!(next.grid, initial.grid);

    event_tx.send(GameEvent::Quit).unwrap();
    assert_eq!(handle.join().unwrap(), EngineExit::Quit);
}

#[test]
fn no_ticks_without_adversaries() {
    let (event_tx, ui_rx, handle) =
        spawn_engine(settings(Difficulty::Hard, false), Duration::from_millis(5));

    let initial = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert!(initial.adversaries.is_empty());
    assert_eq!(
        ui_rx.recv_timeout(Duration::from_millis(100)),
        Err(RecvTimeoutError::Timeout)
    );

    event_tx.send(GameEvent::Menu).unwrap();
    assert_eq!(handle.join().unwrap(), EngineExit::Menu);
}

#[test]
fn walking_the_solution_wins() {
    let (event_tx, ui_rx, handle) =
        spawn_engine(settings(Difficulty::Medium, false), Duration::from_secs(60));
    let initial = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();

    // Follow decreasing distance-to-finish from the start
    let dist = mazerun::solvers::distances(&initial.grid, initial.finish);
    let mut position = initial.player;
    let mut last = initial.clone();
    while position != initial.finish {
        let direction = Direction::ALL
            .into_iter()
            .find(|d| {
                initial
                    .grid
                    .step(position, d.offset())
                    .and_then(|c| dist.get(&c))
                    .is_some_and(|&next| next + 1 == dist[&position])
            })
            .unwrap();
        event_tx.send(GameEvent::Move(direction)).unwrap();
        last = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();
        position = last.player;
    }
    assert_eq!(last.status, GameStatus::Won);
    assert!(last.collected <= initial.coins.len());

    // Moves after winning change nothing and publish nothing
    event_tx.send(GameEvent::Move(Direction::Up)).unwrap();
    assert!(ui_rx.recv_timeout(Duration::from_millis(100)).is_err());

    event_tx.send(GameEvent::Quit).unwrap();
    assert_eq!(handle.join().unwrap(), EngineExit::Quit);
}

#[test]
fn regenerate_starts_over() {
    let (event_tx, ui_rx, handle) =
        spawn_engine(settings(Difficulty::Easy, true), Duration::from_secs(60));
    let initial = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();

    let harder = settings(Difficulty::Hard, true);
    event_tx.send(GameEvent::Regenerate(harder)).unwrap();
    let regenerated = ui_rx.recv_timeout(RECV_TIMEOUT).unwrap();

    assert_eq!(initial.grid.rows(), 11);
    assert_eq!(regenerated.grid.rows(), 21);
    assert_eq!(regenerated.adversaries.len(), 2);
    assert_eq!(regenerated.player, (1, 1));
    assert_eq!(regenerated.collected, 0);
    assert_eq!(regenerated.status, GameStatus::Playing);

    event_tx.send(GameEvent::Quit).unwrap();
    assert_eq!(handle.join().unwrap(), EngineExit::Quit);
}
