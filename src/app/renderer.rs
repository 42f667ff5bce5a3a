use std::{fmt, io::Write, sync::mpsc::Receiver};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    game::{GameStatus, Snapshot},
    maze::{Coord, GridCell},
};

/// Things drawn on top of the maze, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Sprite {
    Player,
    Ghost,
    Trap,
    Coin,
    Finish,
    Start,
}

impl fmt::Display for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Sprite::Player => "🟡".with(Color::Yellow),
            Sprite::Ghost => "👻".with(Color::Cyan),
            Sprite::Trap => "^^".with(Color::Red).attribute(Attribute::Bold),
            Sprite::Coin => "$ ".with(Color::Yellow).attribute(Attribute::Bold),
            Sprite::Finish => "🟥".with(Color::Red),
            Sprite::Start => "🟩".with(Color::Green),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each sprite must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// The sprite to draw at `coord`, if any.
pub(super) fn sprite_at(snapshot: &Snapshot, coord: Coord) -> Option<Sprite> {
    if coord == snapshot.player {
        Some(Sprite::Player)
    } else if snapshot.adversaries.contains(&coord) {
        Some(Sprite::Ghost)
    } else if snapshot.traps.contains(&coord) {
        Some(Sprite::Trap)
    } else if snapshot.coins.contains(&coord) {
        Some(Sprite::Coin)
    } else if coord == snapshot.finish {
        Some(Sprite::Finish)
    } else if coord == snapshot.start {
        Some(Sprite::Start)
    } else {
        None
    }
}

/// Status text shown below the maze.
pub(super) fn status_line(snapshot: &Snapshot) -> StyledContent<String> {
    match snapshot.status {
        GameStatus::Playing => format!(
            "{} | Coins: {} | Arrows/WASD/hjkl move, r new maze, m menu, Esc/q quit",
            snapshot.settings.difficulty, snapshot.collected
        )
        .with(Color::Cyan),
        GameStatus::Won => format!(
            "You escaped with {} coins! Press r for a new maze, m for menu, Esc to exit.",
            snapshot.collected
        )
        .with(Color::Green)
        .attribute(Attribute::Bold),
        GameStatus::Lost => format!(
            "Caught! You had {} coins. Press r to try a new maze, m for menu, Esc to exit.",
            snapshot.collected
        )
        .with(Color::Red)
        .attribute(Attribute::Bold),
    }
}

fn draw(stdout: &mut impl Write, snapshot: &Snapshot) -> std::io::Result<()> {
    let grid = &snapshot.grid;
    for row in 0..grid.rows() {
        queue!(stdout, cursor::MoveTo(0, row))?;
        for col in 0..grid.cols() {
            match sprite_at(snapshot, (row, col)) {
                Some(sprite) => queue!(stdout, style::Print(sprite))?,
                None => queue!(stdout, style::Print(grid[(row, col)]))?,
            }
        }
    }
    queue!(
        stdout,
        cursor::MoveTo(0, grid.rows() + 1),
        terminal::Clear(ClearType::CurrentLine),
        style::PrintStyledContent(status_line(snapshot)),
    )?;
    stdout.flush()
}

/// Draw every snapshot the engine publishes until it hangs up.
pub(super) fn render_snapshots(ui_rx: Receiver<Snapshot>) -> std::io::Result<()> {
    // No other thread should write to stdout while this thread is running.
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    let mut last_size = None;

    while let Ok(snapshot) = ui_rx.recv() {
        // A new maze may be smaller than the last one, wipe leftovers
        let size = (snapshot.grid.rows(), snapshot.grid.cols());
        if last_size != Some(size) {
            queue!(stdout, terminal::Clear(ClearType::All))?;
            last_size = Some(size);
        }
        draw(&mut stdout, &snapshot)?;
    }
    tracing::debug!("[render] UI event channel closed, exiting render thread");
    Ok(())
}
