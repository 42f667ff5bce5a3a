use crossterm::style::{Color, Stylize};

use std::fmt;

/// Represents a cell in the grid, which can be either a path or a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridCell {
    Wall,
    Path,
}

impl GridCell {
    pub const WALL: GridCell = GridCell::Wall;
    pub const PATH: GridCell = GridCell::Path;
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn is_path(self) -> bool {
        self == GridCell::Path
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            GridCell::Path => "  ".with(Color::Reset),
            GridCell::Wall => "⬜".with(Color::White),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
