pub mod difficulty;
pub mod entities;
mod game_state;
pub mod scheduler;

pub use difficulty::{Difficulty, GameSettings};
pub use game_state::{Direction, GameState, GameStatus, MoveOutcome, START};
pub use scheduler::AdversaryScheduler;

use std::{
    collections::HashSet,
    sync::mpsc::{Receiver, Sender},
    time::Duration,
};

use crate::maze::{Coord, Grid};

/// Everything that can mutate a session. All of it goes through one queue so
/// each event is applied atomically, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Move(Direction),
    /// Adversary step, tagged with the session generation the timer was started for
    Tick { generation: u64 },
    Regenerate(GameSettings),
    /// Leave the session and go back to settings selection
    Menu,
    Quit,
}

/// Why [`GameEngine::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    Menu,
    Quit,
}

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Session state changed and should be redrawn
    Changed,
    Unchanged,
    Exit(EngineExit),
}

/// Read-only copy of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub start: Coord,
    pub finish: Coord,
    pub player: Coord,
    pub coins: HashSet<Coord>,
    pub traps: HashSet<Coord>,
    pub adversaries: Vec<Coord>,
    pub collected: usize,
    pub status: GameStatus,
    pub settings: GameSettings,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Snapshot {
            grid: state.grid().clone(),
            start: state.start(),
            finish: state.finish(),
            player: state.player(),
            coins: state.coins().clone(),
            traps: state.traps().clone(),
            adversaries: state.adversaries().to_vec(),
            collected: state.collected(),
            status: state.status(),
            settings: state.settings(),
        }
    }
}

/// Sole owner of the session. Input and the adversary timer only talk to it
/// through [`GameEvent`]s on its queue.
pub struct GameEngine {
    state: GameState,
    event_rx: Receiver<GameEvent>,
    /// Kept to hand out to the scheduler
    event_tx: Sender<GameEvent>,
    scheduler: Option<AdversaryScheduler>,
    tick_period: Duration,
}

impl GameEngine {
    /// Generate the first session and start the adversary timer if needed.
    pub fn new(settings: GameSettings, tick_period: Duration) -> Self {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let mut engine = GameEngine {
            state: GameState::new(settings),
            event_rx,
            event_tx,
            scheduler: None,
            tick_period,
        };
        engine.restart_scheduler();
        engine
    }

    /// A handle for feeding events into the engine's queue.
    pub fn sender(&self) -> Sender<GameEvent> {
        self.event_tx.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    pub fn scheduler_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(|s| s.is_running())
    }

    fn stop_scheduler(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.cancel();
        }
    }

    fn restart_scheduler(&mut self) {
        self.stop_scheduler();
        if self.state.settings().adversaries_enabled
            && !self.state.adversaries().is_empty()
            && !self.state.status().is_over()
        {
            self.scheduler = Some(AdversaryScheduler::start(
                self.tick_period,
                self.state.generation(),
                self.event_tx.clone(),
            ));
        }
    }

    /// Apply one event to the session.
    pub fn handle(&mut self, event: GameEvent) -> Handled {
        match event {
            GameEvent::Move(direction) => {
                let outcome = self.state.move_player(direction);
                tracing::debug!(
                    "[engine] Move {:?} -> {:?} at {:?}",
                    direction,
                    outcome,
                    self.state.player()
                );
                match outcome {
                    MoveOutcome::Ignored | MoveOutcome::Rejected => Handled::Unchanged,
                    MoveOutcome::Won | MoveOutcome::Lost => {
                        tracing::info!(
                            "[engine] Game over: {:?} with {} coins",
                            self.state.status(),
                            self.state.collected()
                        );
                        self.stop_scheduler();
                        Handled::Changed
                    }
                    MoveOutcome::Moved | MoveOutcome::CoinCollected => Handled::Changed,
                }
            }
            GameEvent::Tick { generation } => {
                if generation != self.state.generation() {
                    tracing::debug!(
                        "[engine] Dropping stale tick for session #{} (current #{})",
                        generation,
                        self.state.generation()
                    );
                    return Handled::Unchanged;
                }
                if self.state.status().is_over() {
                    return Handled::Unchanged;
                }
                if self.state.tick().is_over() {
                    tracing::info!(
                        "[engine] Game over: caught by an adversary with {} coins",
                        self.state.collected()
                    );
                    self.stop_scheduler();
                }
                Handled::Changed
            }
            GameEvent::Regenerate(settings) => {
                // The old timer must be gone before the new maze exists
                self.stop_scheduler();
                self.state.regenerate(settings);
                self.restart_scheduler();
                Handled::Changed
            }
            GameEvent::Menu => {
                self.stop_scheduler();
                Handled::Exit(EngineExit::Menu)
            }
            GameEvent::Quit => {
                self.stop_scheduler();
                Handled::Exit(EngineExit::Quit)
            }
        }
    }

    /// Process events until a [`GameEvent::Menu`] or [`GameEvent::Quit`] arrives,
    /// publishing a snapshot after the initial state and after every change.
    /// It's fine if nobody is listening on `ui_tx` anymore.
    pub fn run(mut self, ui_tx: Sender<Snapshot>) -> EngineExit {
        tracing::info!("[engine] Started event loop");
        ui_tx.send(self.snapshot()).ok();
        loop {
            // The engine holds a sender itself, so the queue never disconnects while we wait
            let Ok(event) = self.event_rx.recv() else {
                self.stop_scheduler();
                return EngineExit::Quit;
            };
            match self.handle(event) {
                Handled::Changed => {
                    if ui_tx.send(self.snapshot()).is_err() {
                        tracing::debug!("[engine] UI receiver dropped, not publishing snapshot");
                    }
                }
                Handled::Unchanged => {}
                Handled::Exit(exit) => {
                    tracing::info!("[engine] Exiting event loop: {:?}", exit);
                    return exit;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(difficulty: Difficulty, seed: u64) -> GameSettings {
        GameSettings {
            difficulty,
            traps_enabled: false,
            adversaries_enabled: true,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_scheduler_only_with_adversaries() {
        let engine = GameEngine::new(settings(Difficulty::Easy, 1), Duration::from_secs(60));
        assert!(!engine.scheduler_running());

        let engine = GameEngine::new(settings(Difficulty::Hard, 1), Duration::from_secs(60));
        assert!(engine.scheduler_running());

        let disabled = GameSettings {
            adversaries_enabled: false,
            ..settings(Difficulty::Hard, 1)
        };
        let engine = GameEngine::new(disabled, Duration::from_secs(60));
        assert!(!engine.scheduler_running());
    }

    #[test]
    fn test_stale_tick_dropped() {
        let mut engine = GameEngine::new(settings(Difficulty::Hard, 2), Duration::from_secs(60));
        engine.handle(GameEvent::Regenerate(engine.state().settings()));
        let adversaries = engine.state().adversaries().to_vec();
        assert_eq!(
            engine.handle(GameEvent::Tick { generation: 0 }),
            Handled::Unchanged
        );
        assert_eq!(engine.state().adversaries(), adversaries.as_slice());
        assert_eq!(
            engine.handle(GameEvent::Tick { generation: 1 }),
            Handled::Changed
        );
    }

    #[test]
    fn test_regenerate_restarts_scheduler_for_new_generation() {
        let mut engine = GameEngine::new(settings(Difficulty::Medium, 3), Duration::from_secs(60));
        engine.handle(GameEvent::Regenerate(settings(Difficulty::Extreme, 3)));
        assert_eq!(engine.state().generation(), 1);
        assert_eq!(
            engine.scheduler.as_ref().map(AdversaryScheduler::generation),
            Some(1)
        );
        engine.handle(GameEvent::Regenerate(settings(Difficulty::Easy, 3)));
        assert!(!engine.scheduler_running());
    }

    #[test]
    fn test_menu_and_quit_stop_scheduler() {
        let mut engine = GameEngine::new(settings(Difficulty::Hard, 4), Duration::from_secs(60));
        assert_eq!(engine.handle(GameEvent::Menu), Handled::Exit(EngineExit::Menu));
        assert!(!engine.scheduler_running());

        let mut engine = GameEngine::new(settings(Difficulty::Hard, 4), Duration::from_secs(60));
        assert_eq!(engine.handle(GameEvent::Quit), Handled::Exit(EngineExit::Quit));
        assert!(engine.scheduler.is_none());
    }

    #[test]
    fn test_catching_tick_stops_scheduler() {
        let mut engine = GameEngine::new(settings(Difficulty::Hard, 6), Duration::from_secs(60));
        assert!(engine.scheduler_running());
        // The adversary's only exit is the player's cell
        engine.state = GameState::from_parts(
            Grid::from_rows(&["#####", "#   #", "#####"]),
            (1, 2),
            (1, 3),
            HashSet::new(),
            HashSet::new(),
            vec![(1, 1)],
        );
        let generation = engine.state().generation();
        assert_eq!(
            engine.handle(GameEvent::Tick { generation }),
            Handled::Changed
        );
        assert!(engine.state().lost());
        assert!(!engine.scheduler_running());
    }

    #[test]
    fn test_winning_move_stops_scheduler() {
        let mut engine = GameEngine::new(settings(Difficulty::Hard, 7), Duration::from_secs(60));
        assert!(engine.scheduler_running());
        engine.state = GameState::from_parts(
            Grid::from_rows(&["#######", "#     #", "# ### #", "#     #", "#######"]),
            (1, 1),
            (1, 2),
            HashSet::new(),
            HashSet::new(),
            vec![(3, 3)],
        );
        assert_eq!(
            engine.handle(GameEvent::Move(Direction::Right)),
            Handled::Changed
        );
        assert!(engine.state().won());
        assert!(!engine.scheduler_running());
    }

    #[test]
    fn test_run_publishes_initial_snapshot_and_exits() {
        let engine = GameEngine::new(settings(Difficulty::Easy, 5), Duration::from_secs(60));
        let tx = engine.sender();
        let (ui_tx, ui_rx) = std::sync::mpsc::channel();
        tx.send(GameEvent::Quit).unwrap();
        assert_eq!(engine.run(ui_tx), EngineExit::Quit);
        let first = ui_rx.recv().unwrap();
        assert_eq!(first.player, START);
        assert_eq!(first.status, GameStatus::Playing);
    }
}
