use std::{path::PathBuf, time::Duration};

use clap::Parser;
use mazerun::{
    app::App,
    game::{Difficulty, GameSettings},
    logging,
};

/// Collect coins, dodge traps and ghosts, and find the way out.
#[derive(Parser, Debug)]
#[command(name = "mazerun", version, about)]
struct Args {
    /// Skip the menu and start right away at this difficulty
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Arm traps (only used together with --difficulty)
    #[arg(long)]
    traps: bool,

    /// Keep ghosts out of the maze (only used together with --difficulty)
    #[arg(long)]
    no_adversaries: bool,

    /// Random seed for reproducible mazes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds between two ghost steps
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Directory for the log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init_logging(&args.log_dir)?;

    let initial = args.difficulty.map(|difficulty| GameSettings {
        difficulty,
        traps_enabled: args.traps,
        adversaries_enabled: !args.no_adversaries,
        seed: args.seed,
    });
    let app = App::new(Duration::from_millis(args.tick_ms.max(1)), args.seed);
    tracing::info!("[main] Starting mazerun v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout, initial);
    // Restore the terminal even if the app failed
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("[main] Exited with error: {}", e);
    }
    result
}
