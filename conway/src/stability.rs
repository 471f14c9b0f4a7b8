// stability.rs - Repeat detection over the generations of one run

use std::collections::HashSet;

use crate::fingerprint::Fingerprint;
use crate::grid::Grid;

/// Remembers every generation produced during the current run.
///
/// The run's starting grid is never recorded, so a grid that is already a
/// still life is only caught on the second generation.
#[derive(Debug, Default)]
pub struct StabilityDetector {
    seen: HashSet<Fingerprint>,
}

impl StabilityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all visited states. Call once when a run starts.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Returns `true` if `grid` was already observed in this run. A new state
    /// is recorded; a repeated one is not inserted again.
    pub fn observe(&mut self, grid: &Grid) -> bool {
        !self.seen.insert(grid.fingerprint())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_is_new() {
        let mut detector = StabilityDetector::new();
        let grid: Grid = ".o\no.".parse().unwrap();
        assert!(!detector.observe(&grid));
        assert!(detector.observe(&grid));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_reset_forgets() {
        let mut detector = StabilityDetector::new();
        let grid = Grid::empty(3, 3).unwrap();
        detector.observe(&grid);
        detector.reset();
        assert!(detector.is_empty());
        assert!(!detector.observe(&grid));
    }

    #[test]
    fn test_distinct_states_accumulate() {
        let mut detector = StabilityDetector::new();
        let mut grid = Grid::empty(2, 2).unwrap();
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            grid.toggle(row, col).unwrap();
            assert!(!detector.observe(&grid));
        }
        assert_eq!(detector.len(), 4);
    }
}
