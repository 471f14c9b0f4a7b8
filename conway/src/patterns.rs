// patterns.rs - Named seed patterns, placed in the middle of a board

use crate::error::{LifeError, Result};
use crate::grid::Grid;

/// Alive cells as `(row, col)` offsets from the pattern's top-left corner.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (4, 0), (4, 1), (5, 0), (5, 1),
            (4, 10), (5, 10), (6, 10), (3, 11), (7, 11), (2, 12), (8, 12),
            (2, 13), (8, 13), (5, 14), (3, 15), (7, 15), (4, 16), (5, 16),
            (6, 16), (5, 17), (2, 20), (3, 20), (4, 20), (2, 21), (3, 21),
            (4, 21), (1, 22), (5, 22), (0, 24), (1, 24), (5, 24), (6, 24),
            (2, 34), (3, 34), (2, 35), (3, 35),
        ],
    },
];

/// Case-insensitive lookup by name.
pub fn find(name: &str) -> Result<&'static Pattern> {
    PATTERNS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))
}

impl Pattern {
    /// `(height, width)` of the bounding box.
    pub fn extent(&self) -> (usize, usize) {
        self.cells
            .iter()
            .fold((0, 0), |(h, w), &(r, c)| (h.max(r + 1), w.max(c + 1)))
    }

    /// A dead `width x height` grid with this pattern centred in it.
    pub fn place(&self, width: usize, height: usize) -> Result<Grid> {
        let mut grid = Grid::empty(width, height)?;
        let (pattern_height, pattern_width) = self.extent();
        if pattern_height > height || pattern_width > width {
            return Err(LifeError::PatternTooLarge {
                name: self.name.to_string(),
                width,
                height,
            });
        }
        let top = (height - pattern_height) / 2;
        let left = (width - pattern_width) / 2;
        for &(row, col) in self.cells {
            grid.set(top + row, left + col, true)?;
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::step;

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find("r-PENTOMINO").unwrap().name, "R-pentomino");
        assert!(matches!(find("spaceship"), Err(LifeError::UnknownPattern(_))));
    }

    #[test]
    fn test_place_centres() {
        let grid = find("blinker").unwrap().place(5, 5).unwrap();
        assert_eq!(grid.to_string(), ".....\n.....\n.ooo.\n.....\n.....");
    }

    #[test]
    fn test_too_large() {
        let gun = find("Gosper Glider Gun").unwrap();
        assert_eq!(gun.extent(), (9, 36));
        assert!(matches!(
            gun.place(20, 20),
            Err(LifeError::PatternTooLarge { .. })
        ));
        assert!(gun.place(36, 9).is_ok());
    }

    #[test]
    fn test_oscillator_periods() {
        for (name, period) in [("Blinker", 2), ("Toad", 2), ("Beacon", 2), ("Pulsar", 3)] {
            let start = find(name).unwrap().place(17, 17).unwrap();
            let mut grid = start.clone();
            for _ in 0..period {
                grid = step(&grid);
            }
            assert_eq!(grid, start, "{name} should have period {period}");
            assert_ne!(step(&start), start, "{name} should not be still");
        }
    }

    #[test]
    fn test_glider_keeps_population() {
        let mut grid = find("glider").unwrap().place(12, 12).unwrap();
        for _ in 0..8 {
            grid = step(&grid);
            assert_eq!(grid.population(), 5);
        }
    }
}
