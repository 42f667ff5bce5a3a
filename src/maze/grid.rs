use std::fmt;

use super::{Coord, cell::GridCell};

/// Row-major rectangular grid of wall/path cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Box<[GridCell]>,
    rows: u16,
    cols: u16,
}

impl Grid {
    pub fn new(rows: u16, cols: u16, cell: GridCell) -> Self {
        let data = vec![cell; rows as usize * cols as usize].into_boxed_slice();
        Grid { data, rows, cols }
    }

    /// Build a grid from text rows, `#` being a wall and anything else a path.
    /// Mostly useful for hand-made boards in tests.
    ///
    /// Panics if the rows are ragged or either dimension exceeds `u16::MAX`.
    pub fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.first().map_or(0, |r| r.chars().count());
        let (Ok(row_count), Ok(col_count)) = (u16::try_from(rows.len()), u16::try_from(cols))
        else {
            panic!("Grid dimensions must fit in u16, got {}x{}", rows.len(), cols);
        };
        let data = rows
            .iter()
            .flat_map(|row| {
                assert_eq!(row.chars().count(), cols, "All rows must have the same width");
                row.chars().map(|c| match c {
                    '#' => GridCell::WALL,
                    _ => GridCell::PATH,
                })
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Grid {
            data,
            rows: row_count,
            cols: col_count,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    /// Strictly inside the outer border.
    pub fn is_interior(&self, coord: Coord) -> bool {
        coord.0 > 0 && coord.1 > 0 && coord.0 + 1 < self.rows && coord.1 + 1 < self.cols
    }

    /// In bounds and traversable.
    pub fn is_path(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && self[coord].is_path()
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        coord.0 as usize * self.cols as usize + coord.1 as usize
    }

    pub fn set(&mut self, coord: Coord, cell: GridCell) {
        let idx = self.ravel_index(coord);
        self.data[idx] = cell;
    }

    /// Offset `coord` by `(d_row, d_col)`, returning `None` when the result
    /// leaves the grid.
    pub fn step(&self, coord: Coord, offset: (i16, i16)) -> Option<Coord> {
        let row = coord.0.checked_add_signed(offset.0)?;
        let col = coord.1.checked_add_signed(offset.1)?;
        Some((row, col)).filter(|&c| self.is_in_bounds(c))
    }

    /// All path cells in row-major order.
    pub fn path_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (row, col)))
            .filter(move |&coord| self[coord].is_path())
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = GridCell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let symbol = match self[(row, col)] {
                    GridCell::Wall => '#',
                    GridCell::Path => ' ',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
