// rule.rs - B3/S23 transition over a dead-bordered grid

use crate::grid::{Grid, TRow};

/// Compute the next generation. The input is left untouched and the result
/// is freshly allocated with the same dimensions.
///
/// # Panics
///
/// If any row length disagrees with the grid's width. Grids built by this
/// crate never do, so this points at a caller defect.
pub fn step(grid: &Grid) -> Grid {
    assert!(
        grid.rows().len() == grid.height() && grid.rows().iter().all(|r| r.len() == grid.width()),
        "grid rows do not match its {}x{} dimensions",
        grid.width(),
        grid.height()
    );

    let rows = (0..grid.height()).map(|row| next_row(grid, row)).collect();
    // Rows come from a validated grid of the same shape.
    match Grid::from_rows(rows) {
        Ok(next) => next,
        Err(err) => unreachable!("transition produced an invalid grid: {err}"),
    }
}

/// Next state of one row, reading only the previous generation.
fn next_row(grid: &Grid, row: usize) -> TRow {
    (0..grid.width())
        .map(|col| {
            let current_alive = grid.rows()[row][col];
            match (current_alive, live_neighbors(grid, row, col)) {
                (true, 2) | (true, 3) => true, // Survival
                (false, 3) => true,            // Birth
                _ => false,                    // Death or stays dead
            }
        })
        .collect()
}

/// Count alive cells among the up-to-8 neighbors of `(row, col)`.
///
/// Rows above the first and below the last are skipped; columns left of 0 or
/// right of the last are bounds-checked by the grid. Both read as dead.
pub fn live_neighbors(grid: &Grid, row: usize, col: usize) -> usize {
    let above = row.checked_sub(1);
    let below = (row + 1 < grid.height()).then_some(row + 1);
    let left = col.checked_sub(1);
    let right = Some(col + 1);

    let neighbors = [
        (Some(row), left),
        (Some(row), right),
        (above, Some(col)),
        (above, left),
        (above, right),
        (below, Some(col)),
        (below, left),
        (below, right),
    ];

    neighbors
        .iter()
        .filter(|&&(r, c)| grid.is_alive_at(r, c))
        .count()
}
