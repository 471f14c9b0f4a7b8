// grid.rs - Grid type for Conway's Game of Life

use std::fmt::{self, Display, Write};
use std::str::FromStr;

use rand::Rng;

use crate::error::{LifeError, Result};
use crate::fingerprint::Fingerprint;

pub type TRow = Vec<bool>;

/// A bordered rectangular board: `height` rows of exactly `width` cells.
///
/// Every constructor allocates its own rows, so two grids never share
/// storage. Cells outside the board are never stored; they read as dead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<TRow>,
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(LifeError::InvalidDimensions { width, height });
    }
    Ok(())
}

pub(crate) fn check_ratio(ratio: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(LifeError::InvalidRatio(ratio));
    }
    Ok(())
}

impl Grid {
    /// All cells dead.
    pub fn empty(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            rows: vec![vec![false; width]; height],
        })
    }

    /// Each cell is alive independently with probability `ratio`.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        ratio: f64,
        rng: &mut R,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        check_ratio(ratio)?;
        let rows = (0..height)
            .map(|_| (0..width).map(|_| rng.gen_bool(ratio)).collect())
            .collect();
        Ok(Self { width, height, rows })
    }

    /// Build a grid from caller-supplied rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<TRow>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        check_dimensions(width, height)?;
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(LifeError::RaggedRows {
                row,
                expected: width,
                found,
            });
        }
        Ok(Self { width, height, rows })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[TRow] {
        &self.rows
    }

    /// Bounds-checked read; `None` outside the board.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Whether the cell at a possibly off-board position is alive.
    /// Anything beyond an edge counts as dead.
    pub fn is_alive_at(&self, row: Option<usize>, col: Option<usize>) -> bool {
        match (row, col) {
            (Some(row), Some(col)) if row < self.height && col < self.width => self.rows[row][col],
            _ => false,
        }
    }

    /// Flip one cell and return its new state.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool> {
        let cell = self.cell_mut(row, col)?;
        *cell = !*cell;
        Ok(*cell)
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        *self.cell_mut(row, col)? = alive;
        Ok(())
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut bool> {
        let (width, height) = (self.width, self.height);
        self.rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(LifeError::CellOutOfBounds {
                row,
                col,
                width,
                height,
            })
    }

    pub fn population(&self) -> usize {
        self.rows.iter().flatten().filter(|&&alive| alive).count()
    }

    pub fn cells(&self) -> impl Iterator<Item = bool> + '_ {
        self.rows.iter().flatten().copied()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

/// Rows of `o` (alive) and `.` (dead). Blank lines and surrounding
/// whitespace are ignored so patterns can be written as indented literals.
impl FromStr for Grid {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        'o' => Ok(true),
                        '.' => Ok(false),
                        _ => Err(LifeError::InvalidCell(c)),
                    })
                    .collect::<Result<TRow>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            for &alive in row {
                f.write_char(if alive { 'o' } else { '.' })?;
            }
        }
        Ok(())
    }
}
