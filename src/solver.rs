//! Breadth-first shortest path from entry to exit

use std::collections::VecDeque;

use log::error;

use crate::grid::{Cell, Direction, Grid, Point};

/// Cells from entry to exit, both included
pub type Path = Vec<Point>;

/// Fixed expansion order, so equal-length alternatives resolve the same way
/// every time
const SEARCH_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// Find the shortest path from the entry cell to the exit cell
///
/// Only non-wall cells are walked through. Returns an empty path, and logs an
/// error, if the grid lacks an entry or an exit or if they are not connected.
pub fn solve(grid: &Grid) -> Path {
    let (Some(start), Some(goal)) = (grid.find(Cell::Entry), grid.find(Cell::Exit)) else {
        error!("Could not find entry or exit in maze");
        return Path::new();
    };

    let rows = grid.rows();
    let cols = grid.cols();
    let idx = |p: Point| p.y * cols + p.x;

    let mut prev: Vec<Option<Point>> = vec![None; rows * cols];
    let mut visited = vec![false; rows * cols];
    let mut queue = VecDeque::from([start]);
    visited[idx(start)] = true;

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let mut path = vec![current];
            let mut at = current;
            while let Some(p) = prev[idx(at)] {
                path.push(p);
                at = p;
            }
            path.reverse();
            return path;
        }
        for dir in SEARCH_ORDER {
            let Some(next) = current.step(dir, rows, cols) else {
                continue;
            };
            if visited[idx(next)] || !grid.at(next).is_passable() {
                continue;
            }
            visited[idx(next)] = true;
            prev[idx(next)] = Some(current);
            queue.push_back(next);
        }
    }

    error!("No path found between entry {} and exit {}", start, goal);
    Path::new()
}

/// Direction letters of each step along `path`
///
/// Empty for paths shorter than two cells.
pub fn path_directions(path: &[Point]) -> String {
    path.windows(2)
        .filter_map(|w| Direction::between(w[0], w[1]))
        .map(Direction::letter)
        .collect()
}
