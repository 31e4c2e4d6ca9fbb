//! Decorative "42" overlay
//!
//! The glyph is drawn only over cells that are already walls, so the maze
//! itself is never changed.

use log::warn;

use crate::grid::{Cell, Grid, Point};

/// Closed cells of the glyph, relative to its top-left corner
const PATTERN_42: [(usize, usize); 20] = [
    // 4
    (0, 0),
    (1, 0),
    (2, 0),
    (2, 1),
    (2, 2),
    (0, 2),
    (1, 2),
    (3, 2),
    (4, 2),
    // 2
    (0, 4),
    (0, 5),
    (0, 6),
    (1, 6),
    (2, 4),
    (2, 5),
    (2, 6),
    (3, 4),
    (4, 4),
    (4, 5),
    (4, 6),
];

const PATTERN_ROWS: usize = 5;
const PATTERN_COLS: usize = 7;

/// Wall cells covered by the glyph centred on `grid`
///
/// Returns `None`, with a warning, when the grid cannot fit the glyph plus a
/// two-cell margin.
pub fn pattern_42(grid: &Grid) -> Option<Vec<Point>> {
    if grid.rows() < PATTERN_ROWS + 4 || grid.cols() < PATTERN_COLS + 4 {
        warn!(
            "Maze of {}x{} is too small to display the '42' pattern",
            grid.rows(),
            grid.cols()
        );
        return None;
    }

    let top = (grid.rows() - PATTERN_ROWS) / 2;
    let left = (grid.cols() - PATTERN_COLS) / 2;
    let cells = PATTERN_42
        .iter()
        .map(|&(dy, dx)| Point::new(top + dy, left + dx))
        .filter(|&p| !grid.is_border(p) && grid.at(p) == Cell::Wall)
        .collect();
    Some(cells)
}
