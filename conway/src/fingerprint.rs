// fingerprint.rs - Canonical identity of a grid state

use crate::grid::Grid;

/// Row-major packed bits of a grid, tagged with its dimensions.
///
/// Two grids share a fingerprint exactly when they have the same shape and
/// the same cell values, so it can key the set of visited states directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    width: usize,
    height: usize,
    words: Vec<u64>,
}

impl Fingerprint {
    pub fn of(grid: &Grid) -> Self {
        let cells = grid.width() * grid.height();
        let mut words = vec![0u64; cells.div_ceil(64)];
        for (i, alive) in grid.cells().enumerate() {
            if alive {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        Self {
            width: grid.width(),
            height: grid.height(),
            words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_grids_equal_fingerprints() {
        let a: Grid = "o..\n.o.\n..o".parse().unwrap();
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_single_cell_changes_fingerprint() {
        let a = Grid::empty(9, 9).unwrap();
        let mut b = a.clone();
        b.toggle(8, 8).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_shape_is_part_of_identity() {
        // Same bits, different layout.
        let wide: Grid = "oo..".parse().unwrap();
        let tall: Grid = "oo\n..".parse().unwrap();
        assert_ne!(wide.fingerprint(), tall.fingerprint());
    }
}
