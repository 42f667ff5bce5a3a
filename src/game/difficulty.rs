use std::fmt;

/// The four fixed size/rate presets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub const fn rows(self) -> u16 {
        match self {
            Difficulty::Easy => 11,
            Difficulty::Medium => 15,
            Difficulty::Hard => 21,
            Difficulty::Extreme => 31,
        }
    }

    pub const fn cols(self) -> u16 {
        // All presets are square
        self.rows()
    }

    /// Probability that any eligible path cell holds a coin.
    pub const fn coin_rate(self) -> f64 {
        match self {
            Difficulty::Easy => 0.20,
            Difficulty::Medium => 0.15,
            Difficulty::Hard => 0.10,
            Difficulty::Extreme => 0.07,
        }
    }

    pub const fn adversary_count(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::Extreme => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy ({0}x{0})", self.rows()),
            Difficulty::Medium => write!(f, "Medium ({0}x{0})", self.rows()),
            Difficulty::Hard => write!(f, "Hard ({0}x{0})", self.rows()),
            Difficulty::Extreme => write!(f, "Extreme ({0}x{0})", self.rows()),
        }
    }
}

/// Everything chosen before a session starts. Changing any of it means a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub traps_enabled: bool,
    pub adversaries_enabled: bool,
    /// Seed for reproducible layouts; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            traps_enabled: false,
            adversaries_enabled: true,
            seed: None,
        }
    }
}
