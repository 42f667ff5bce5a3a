use std::collections::HashSet;

use rand::rngs::StdRng;

use crate::{
    game::{
        difficulty::GameSettings,
        entities::{place_adversaries, place_coins, place_traps},
    },
    generators::{generate_maze, get_rng, shuffled},
    maze::{Coord, Grid, GridCell, UNIT_OFFSETS},
    solvers::farthest_cell,
};

/// Every session starts in the top-left room.
pub const START: Coord = (1, 1);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit `(d_row, d_col)` offset of one step in this direction.
    pub const fn offset(self) -> (i16, i16) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Playing
    }
}

/// What a single call to [`GameState::move_player`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is already over, nothing happened.
    Ignored,
    /// Wall or edge of the grid in the way.
    Rejected,
    Moved,
    CoinCollected,
    Won,
    Lost,
}

/// One session: the maze, everything placed on it, and where the player stands.
#[derive(Debug, Clone)]
pub struct GameState {
    settings: GameSettings,
    rng: StdRng,
    /// Bumped on every regenerate so stale scheduler ticks can be told apart
    generation: u64,
    grid: Grid,
    finish: Coord,
    /// Tracks where the player currently is
    player: Coord,
    coins: HashSet<Coord>,
    traps: HashSet<Coord>,
    /// Order is stable and doubles as adversary identity
    adversaries: Vec<Coord>,
    collected: usize,
    status: GameStatus,
}

impl GameState {
    /// Generate a fresh session for the given settings.
    pub fn new(settings: GameSettings) -> Self {
        Self::generate(settings, get_rng(settings.seed), 0)
    }

    /// Build a session around a hand-made board. The player starts at `player`
    /// and adversaries move with a fixed-seed RNG.
    pub fn from_parts(
        grid: Grid,
        player: Coord,
        finish: Coord,
        coins: HashSet<Coord>,
        traps: HashSet<Coord>,
        adversaries: Vec<Coord>,
    ) -> Self {
        assert!(grid.is_path(player), "Player must stand on a path cell");
        assert!(grid.is_path(finish), "Finish must be a path cell");
        let settings = GameSettings {
            traps_enabled: !traps.is_empty(),
            adversaries_enabled: !adversaries.is_empty(),
            seed: Some(0),
            ..GameSettings::default()
        };
        GameState {
            settings,
            rng: get_rng(settings.seed),
            generation: 0,
            grid,
            finish,
            player,
            coins,
            traps,
            adversaries,
            collected: 0,
            status: GameStatus::Playing,
        }
    }

    fn generate(settings: GameSettings, mut rng: StdRng, generation: u64) -> Self {
        let difficulty = settings.difficulty;
        let mut grid = generate_maze(difficulty.rows(), difficulty.cols(), &mut rng);

        let finish = farthest_cell(&grid, START);
        grid.set(finish, GridCell::PATH);

        let coins = place_coins(&grid, START, finish, difficulty.coin_rate(), &mut rng);
        let traps = if settings.traps_enabled {
            place_traps(&grid, START, finish, &coins, &mut rng)
        } else {
            HashSet::new()
        };
        let adversaries = if settings.adversaries_enabled {
            place_adversaries(
                &grid,
                START,
                finish,
                difficulty.adversary_count(),
                &mut rng,
            )
        } else {
            Vec::new()
        };

        tracing::info!(
            "[game] Generated session #{} ({:?}): finish {:?}, {} coins, {} traps, {} adversaries",
            generation,
            difficulty,
            finish,
            coins.len(),
            traps.len(),
            adversaries.len()
        );

        GameState {
            settings,
            rng,
            generation,
            grid,
            finish,
            player: START,
            coins,
            traps,
            adversaries,
            collected: 0,
            status: GameStatus::Playing,
        }
    }

    /// Throw the current session away and generate a new one.
    /// The RNG stream carries over unless the seed changed.
    pub fn regenerate(&mut self, settings: GameSettings) {
        let rng = if settings.seed == self.settings.seed {
            self.rng.clone()
        } else {
            get_rng(settings.seed)
        };
        *self = Self::generate(settings, rng, self.generation + 1);
    }

    /// Attempt to move the player one step in `direction`.
    ///
    /// A coin on the destination is credited before the trap, adversary and
    /// finish checks, so it counts even on the final step.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if self.status.is_over() {
            return MoveOutcome::Ignored;
        }

        let Some(candidate) = self
            .grid
            .step(self.player, direction.offset())
            .filter(|&c| self.grid[c].is_path())
        else {
            return MoveOutcome::Rejected;
        };

        self.player = candidate;

        let coin_collected = self.coins.remove(&candidate);
        if coin_collected {
            self.collected += 1;
        }

        if self.traps.contains(&candidate) || self.adversaries.contains(&candidate) {
            self.status = GameStatus::Lost;
            MoveOutcome::Lost
        } else if candidate == self.finish {
            self.status = GameStatus::Won;
            MoveOutcome::Won
        } else if coin_collected {
            MoveOutcome::CoinCollected
        } else {
            MoveOutcome::Moved
        }
    }

    /// Advance every adversary by one random legal step, then check whether
    /// one of them landed on the player.
    pub fn tick(&mut self) -> GameStatus {
        if self.status.is_over() {
            return self.status;
        }

        for adversary in self.adversaries.iter_mut() {
            let next = shuffled(UNIT_OFFSETS, &mut self.rng)
                .into_iter()
                .filter_map(|offset| self.grid.step(*adversary, offset))
                .find(|&c| self.grid[c].is_path());
            // Fully walled in: stay put
            if let Some(next) = next {
                *adversary = next;
            }
        }

        if self.adversaries.contains(&self.player) {
            tracing::debug!("[game] Adversary caught the player at {:?}", self.player);
            self.status = GameStatus::Lost;
        }
        self.status
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Coord {
        START
    }

    pub fn finish(&self) -> Coord {
        self.finish
    }

    pub fn player(&self) -> Coord {
        self.player
    }

    pub fn coins(&self) -> &HashSet<Coord> {
        &self.coins
    }

    pub fn traps(&self) -> &HashSet<Coord> {
        &self.traps
    }

    pub fn adversaries(&self) -> &[Coord] {
        &self.adversaries
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn lost(&self) -> bool {
        self.status == GameStatus::Lost
    }
}
