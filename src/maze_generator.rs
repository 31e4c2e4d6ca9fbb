//! Maze carving
//!
//! A maze starts as a grid full of walls. [MazeGenerator::carve] opens a
//! spanning tree over all rooms, [open_inward] connects the entry and exit
//! cells on the border to it and [MazeGenerator::add_loops] optionally braids
//! the result.

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::config::{ConfigError, MIN_SIZE};
use crate::grid::{make_odd, Cell, Grid, Point};

/// Cells in the order they were opened
pub type CarveLog = Vec<Point>;

/// Depth-first walk state for a single room
struct Frame {
    at: Point,
    directions: [(isize, isize); 4],
    next: usize,
}

/// Recursive backtracker maze generator
pub struct MazeGenerator {
    random: StdRng,
    loop_density: usize,
}

impl MazeGenerator {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 2), (0, -2), (2, 0), (-2, 0)];

    /// One redundant wall in this many is removed by [Self::add_loops]
    pub const DEFAULT_LOOP_DENSITY: usize = 7;

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
            loop_density: Self::DEFAULT_LOOP_DENSITY,
        }
    }

    /// Use a different divisor for the number of loops added; zero is
    /// treated as one.
    pub fn with_loop_density(mut self, loop_density: usize) -> Self {
        self.loop_density = loop_density.max(1);
        self
    }

    /// Carve a perfect maze
    ///
    /// Even dimensions are rounded up to the next odd value. Starting from
    /// room (1, 1), walk depth-first through the rooms in shuffled direction
    /// order, opening the wall between the current room and each unvisited
    /// neighbor. The walk keeps its own stack, so large grids do not exhaust
    /// the call stack.
    ///
    /// Returns the grid and the opened cells, each wall logged before the room
    /// behind it.
    pub fn carve(&mut self, rows: usize, cols: usize) -> Result<(Grid, CarveLog), ConfigError> {
        for (dimension, value) in [("rows", rows), ("cols", cols)] {
            if value < MIN_SIZE {
                return Err(ConfigError::TooSmall { dimension, value });
            }
        }
        let rows = make_odd(rows);
        let cols = make_odd(cols);

        let mut grid = Grid::filled(rows, cols, Cell::Wall);
        let mut log = CarveLog::new();

        let start = Point::new(1, 1);
        grid.set(start, Cell::Open);
        log.push(start);

        let mut stack = vec![self.frame(start)];
        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }
            let at = frame.at;
            let (dy, dx) = frame.directions[frame.next];
            frame.next += 1;

            let Some(target) = at.offset(dy, dx, rows - 1, cols - 1) else {
                continue;
            };
            if target.y < 1 || target.x < 1 || grid.at(target) != Cell::Wall {
                continue;
            }

            let wall = Point::new(
                at.y.saturating_add_signed(dy / 2),
                at.x.saturating_add_signed(dx / 2),
            );
            grid.set(wall, Cell::Open);
            grid.set(target, Cell::Open);
            log.push(wall);
            log.push(target);

            let next = self.frame(target);
            stack.push(next);
        }

        Ok((grid, log))
    }

    fn frame(&mut self, at: Point) -> Frame {
        let mut directions = Self::DIRECTIONS;
        directions.shuffle(&mut self.random);
        Frame {
            at,
            directions,
            next: 0,
        }
    }

    /// Remove redundant walls to create loops
    ///
    /// A redundant wall is an interior wall whose two neighbors across it
    /// (above and below on an even row, left and right on an even column)
    /// are both open. `max(1, n / loop_density)` of the `n` candidates are
    /// opened, chosen uniformly without replacement.
    ///
    /// Returns the opened cells, in the order they were chosen.
    pub fn add_loops(&mut self, grid: &mut Grid) -> Vec<Point> {
        let candidates = redundant_walls(grid);
        if candidates.is_empty() {
            return Vec::new();
        }

        let count = (candidates.len() / self.loop_density).max(1);
        let chosen: Vec<Point> = candidates
            .choose_multiple(&mut self.random, count)
            .copied()
            .collect();
        for &p in &chosen {
            grid.set(p, Cell::Open);
        }
        debug!(
            "Removed {} of {} redundant walls",
            chosen.len(),
            candidates.len()
        );
        chosen
    }
}

/// Connect border cell `cell` to the carved interior
///
/// An edge cell walks straight inward, opening walls until it meets a
/// passable cell or leaves the grid. A corner cell opens its two neighbors
/// along the border and the diagonal cell between them, where they are
/// walls. Calling this again on a connected cell changes nothing.
///
/// Returns the newly opened cells.
pub fn open_inward(grid: &mut Grid, cell: Point) -> Vec<Point> {
    let rows = grid.rows();
    let cols = grid.cols();
    let on_top = cell.y == 0;
    let on_bottom = cell.y == rows - 1;
    let on_left = cell.x == 0;
    let on_right = cell.x == cols - 1;

    let mut opened = Vec::new();

    if (on_top || on_bottom) && (on_left || on_right) {
        let dy = if on_top { 1 } else { -1 };
        let dx = if on_left { 1 } else { -1 };
        for (oy, ox) in [(dy, 0), (0, dx), (dy, dx)] {
            if let Some(p) = cell.offset(oy, ox, rows, cols) {
                open_wall(grid, p, &mut opened);
            }
        }
    } else {
        let (dy, dx) = if on_top {
            (1, 0)
        } else if on_bottom {
            (-1, 0)
        } else if on_left {
            (0, 1)
        } else {
            (0, -1)
        };
        let mut next = cell.offset(dy, dx, rows, cols);
        while let Some(p) = next {
            if grid.at(p).is_passable() {
                break;
            }
            open_wall(grid, p, &mut opened);
            next = p.offset(dy, dx, rows, cols);
        }
    }

    debug!("Opened {} cells inward from {}", opened.len(), cell);
    opened
}

/// Interior walls with open cells on both sides across them
fn redundant_walls(grid: &Grid) -> Vec<Point> {
    if grid.rows() < 3 || grid.cols() < 3 {
        return Vec::new();
    }
    let open = |p: Point| grid.at(p) == Cell::Open;
    let mut candidates = Vec::new();
    for y in 1..grid.rows() - 1 {
        for x in 1..grid.cols() - 1 {
            let p = Point::new(y, x);
            if grid.at(p) != Cell::Wall {
                continue;
            }
            let vertical = y % 2 == 0 && open(Point::new(y - 1, x)) && open(Point::new(y + 1, x));
            let horizontal =
                x % 2 == 0 && open(Point::new(y, x - 1)) && open(Point::new(y, x + 1));
            if vertical || horizontal {
                candidates.push(p);
            }
        }
    }
    candidates
}

fn open_wall(grid: &mut Grid, p: Point, opened: &mut Vec<Point>) {
    if grid.at(p) == Cell::Wall {
        grid.set(p, Cell::Open);
        opened.push(p);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use crate::config::ConfigError;
    use crate::grid::{Cell, Direction, Grid, Point};
    use crate::maze_generator::{open_inward, redundant_walls, MazeGenerator};

    /// Rooms reachable from (1, 1) over open cells
    fn reachable_rooms(grid: &Grid) -> usize {
        let start = Point::new(1, 1);
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            for dir in Direction::ALL {
                if let Some(n) = p.step(dir, grid.rows(), grid.cols()) {
                    if grid.at(n).is_passable() && seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        seen.iter().filter(|&&p| Grid::is_room(p)).count()
    }

    fn room_count(grid: &Grid) -> usize {
        (grid.rows() / 2) * (grid.cols() / 2)
    }

    /// Open interior cells that are not rooms
    fn open_passages(grid: &Grid) -> usize {
        grid.iter()
            .filter(|&(p, c)| c == Cell::Open && !grid.is_border(p) && !Grid::is_room(p))
            .count()
    }

    #[test]
    fn carve_spanning_tree() {
        for (seed, rows, cols) in [(0, 5, 5), (1, 7, 15), (2, 21, 21), (3, 31, 9)] {
            let mut gen = MazeGenerator::new(Some(seed));
            let (grid, log) = gen.carve(rows, cols).unwrap();

            let rooms = room_count(&grid);
            assert_eq!(reachable_rooms(&grid), rooms);
            assert_eq!(open_passages(&grid), rooms - 1);
            assert_eq!(log.len(), 2 * rooms - 1);
            assert!(grid
                .iter()
                .filter(|&(p, _)| grid.is_border(p))
                .all(|(_, c)| c == Cell::Wall));
        }
    }

    #[test]
    fn carve_log_opens_wall_before_room() {
        let mut gen = MazeGenerator::new(Some(7));
        let (_, log) = gen.carve(9, 9).unwrap();

        assert_eq!(log[0], Point::new(1, 1));
        for pair in log[1..].chunks(2) {
            assert!(!Grid::is_room(pair[0]));
            assert!(Grid::is_room(pair[1]));
        }
        let unique: HashSet<_> = log.iter().collect();
        assert_eq!(unique.len(), log.len());
    }

    #[test]
    fn carve_forces_odd_dimensions() {
        let mut gen = MazeGenerator::new(Some(0));
        let (grid, _) = gen.carve(20, 6).unwrap();
        assert_eq!(grid.rows(), 21);
        assert_eq!(grid.cols(), 7);
    }

    #[test]
    fn carve_rejects_tiny_grids() {
        let mut gen = MazeGenerator::new(Some(0));
        assert!(matches!(
            gen.carve(4, 9),
            Err(ConfigError::TooSmall {
                dimension: "rows",
                value: 4
            })
        ));
    }

    #[test]
    fn carve_large_grid_without_recursion() {
        let mut gen = MazeGenerator::new(Some(99));
        let (grid, _) = gen.carve(99, 99).unwrap();
        assert_eq!(reachable_rooms(&grid), room_count(&grid));
    }

    #[test]
    fn carve_is_deterministic() {
        let a = MazeGenerator::new(Some(42)).carve(15, 15).unwrap();
        let b = MazeGenerator::new(Some(42)).carve(15, 15).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn edge_cell_walks_inward_to_open_cell() {
        let mut grid = Grid::filled(7, 7, Cell::Wall);
        grid.set(Point::new(3, 3), Cell::Open);
        grid.set(Point::new(0, 3), Cell::Entry);

        let opened = open_inward(&mut grid, Point::new(0, 3));
        assert_eq!(opened, vec![Point::new(1, 3), Point::new(2, 3)]);
        assert!(open_inward(&mut grid, Point::new(0, 3)).is_empty());
    }

    #[test]
    fn edge_cell_walk_stops_at_grid_boundary() {
        let mut grid = Grid::filled(5, 5, Cell::Wall);
        let opened = open_inward(&mut grid, Point::new(2, 4));
        assert_eq!(
            opened,
            (0..4).rev().map(|x| Point::new(2, x)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn edge_cell_next_to_room_opens_nothing() {
        let mut gen = MazeGenerator::new(Some(3));
        let (mut grid, _) = gen.carve(9, 9).unwrap();
        let before = grid.clone();
        assert!(open_inward(&mut grid, Point::new(0, 5)).is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn corner_cell_opens_neighbors_and_diagonal() {
        let mut grid = Grid::filled(5, 5, Cell::Wall);
        let opened = open_inward(&mut grid, Point::new(4, 4));
        assert_eq!(
            opened,
            vec![Point::new(3, 4), Point::new(4, 3), Point::new(3, 3)]
        );

        let mut gen = MazeGenerator::new(Some(3));
        let (mut grid, _) = gen.carve(9, 9).unwrap();
        let opened = open_inward(&mut grid, Point::new(0, 0));
        assert_eq!(opened, vec![Point::new(1, 0), Point::new(0, 1)]);
        assert!(open_inward(&mut grid, Point::new(0, 0)).is_empty());
    }

    #[test]
    fn loops_remove_redundant_walls() {
        let mut gen = MazeGenerator::new(Some(5));
        let (mut grid, _) = gen.carve(21, 21).unwrap();
        let rooms = room_count(&grid);

        let added = gen.add_loops(&mut grid);
        assert!(!added.is_empty());
        assert_eq!(open_passages(&grid), rooms - 1 + added.len());
        assert_eq!(reachable_rooms(&grid), rooms);
        assert!(added.iter().all(|&p| !grid.is_border(p)));
    }

    #[test]
    fn loops_are_reproducible() {
        let braid = |seed| {
            let mut gen = MazeGenerator::new(Some(seed));
            let (mut grid, _) = gen.carve(15, 25).unwrap();
            let added = gen.add_loops(&mut grid);
            (grid, added)
        };
        assert_eq!(braid(11), braid(11));
    }

    #[test]
    fn loop_density_controls_count() {
        let mut sparse = MazeGenerator::new(Some(8));
        let (mut grid_a, _) = sparse.carve(31, 31).unwrap();
        let few = sparse.add_loops(&mut grid_a).len();

        let mut dense = MazeGenerator::new(Some(8)).with_loop_density(1);
        let (mut grid_b, _) = dense.carve(31, 31).unwrap();
        let many = dense.add_loops(&mut grid_b).len();

        assert!(many > few);
    }

    #[test]
    fn loop_count_is_candidates_over_density() {
        for (seed, rows, cols) in [(1, 5, 5), (2, 7, 7), (3, 21, 21), (4, 31, 41)] {
            let mut gen = MazeGenerator::new(Some(seed));
            let (mut grid, _) = gen.carve(rows, cols).unwrap();
            let candidates = redundant_walls(&grid).len();
            assert!(candidates > 0);

            let added = gen.add_loops(&mut grid);
            assert_eq!(added.len(), (candidates / 7).max(1), "{}x{}", rows, cols);
        }
    }

    #[test]
    fn small_maze_still_gets_one_loop() {
        let mut gen = MazeGenerator::new(Some(6));
        let (mut grid, _) = gen.carve(5, 5).unwrap();
        let candidates = redundant_walls(&grid);
        assert!((1..7).contains(&candidates.len()));

        let added = gen.add_loops(&mut grid);
        assert_eq!(added.len(), 1);
        assert!(candidates.contains(&added[0]));
    }

    #[test]
    fn custom_loop_density() {
        let mut gen = MazeGenerator::new(Some(12)).with_loop_density(3);
        let (mut grid, _) = gen.carve(21, 25).unwrap();
        let candidates = redundant_walls(&grid).len();

        let added = gen.add_loops(&mut grid);
        assert_eq!(added.len(), (candidates / 3).max(1));
    }

    #[test]
    fn loops_on_degenerate_grids_are_noop() {
        let mut gen = MazeGenerator::new(Some(0));
        for (rows, cols) in [(0, 0), (0, 5), (2, 9), (9, 1)] {
            let mut grid = Grid::filled(rows, cols, Cell::Open);
            assert!(gen.add_loops(&mut grid).is_empty());
        }
    }

    #[test]
    fn loops_without_candidates_are_noop() {
        let mut gen = MazeGenerator::new(Some(0));
        let mut grid = Grid::filled(5, 5, Cell::Wall);
        assert!(gen.add_loops(&mut grid).is_empty());
        assert_eq!(grid, Grid::filled(5, 5, Cell::Wall));
    }
}
