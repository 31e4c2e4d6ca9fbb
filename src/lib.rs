//! Generate, solve and export grid mazes
//!
//! A maze is carved on an odd-sized grid where cells with both coordinates
//! odd are rooms and every other cell is a wall that may be opened. The
//! entry and exit lie on the border and are connected to the carved rooms,
//! loops are optionally added, and the result is frozen together with its
//! wall bitmasks and shortest solution.
//!
//! # Examples
//! ```
//! use a_maze_ing::grid::Point;
//! use a_maze_ing::{GenerationRequest, Maze};
//!
//! let request = GenerationRequest::new(5, 5, Point::new(0, 1), Point::new(4, 3)).with_seed(42);
//! let maze = Maze::generate(&request).unwrap();
//!
//! assert_eq!(maze.solution().first(), Some(&Point::new(0, 1)));
//! assert_eq!(maze.solution().last(), Some(&Point::new(4, 3)));
//! // the entry's north side opens to the outside
//! assert_eq!(maze.wall_mask().get(Point::new(0, 1)), Some(0b1010));
//! ```

pub mod config;
pub mod decoration;
pub mod display;
pub mod grid;
pub mod maze_generator;
pub mod menu;
pub mod output;
pub mod solver;
pub mod wall_mask;

use log::info;

use crate::config::{check_border, ConfigError};
use crate::grid::{make_odd, Cell, Grid, Point};
use crate::maze_generator::{open_inward, CarveLog, MazeGenerator};
use crate::solver::{path_directions, solve, Path};
use crate::wall_mask::WallMask;

/// Parameters of a single maze generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Height; even values are rounded up
    pub rows: usize,
    /// Width; even values are rounded up
    pub cols: usize,
    pub entry: Point,
    pub exit: Point,
    /// Without loops when set
    pub perfect: bool,
    /// Random seed, process entropy when missing
    pub seed: Option<u64>,
    /// Divisor for the number of loops added to imperfect mazes
    pub loop_density: usize,
}

impl GenerationRequest {
    /// Perfect, unseeded maze
    pub fn new(rows: usize, cols: usize, entry: Point, exit: Point) -> Self {
        Self {
            rows,
            cols,
            entry,
            exit,
            perfect: true,
            seed: None,
            loop_density: MazeGenerator::DEFAULT_LOOP_DENSITY,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_perfect(mut self, perfect: bool) -> Self {
        self.perfect = perfect;
        self
    }

    pub fn with_loop_density(mut self, loop_density: usize) -> Self {
        self.loop_density = loop_density;
        self
    }

    /// Check the request against the grid it describes
    ///
    /// Returns the forced-odd `(rows, cols)`.
    pub fn validate(&self) -> Result<(usize, usize), ConfigError> {
        for (dimension, value) in [("rows", self.rows), ("cols", self.cols)] {
            if value < config::MIN_SIZE {
                return Err(ConfigError::TooSmall { dimension, value });
            }
        }
        if self.loop_density == 0 {
            return Err(ConfigError::InvalidLoopDensity(self.loop_density.to_string()));
        }
        let rows = make_odd(self.rows);
        let cols = make_odd(self.cols);
        check_border("ENTRY", self.entry, rows, cols)?;
        check_border("EXIT", self.exit, rows, cols)?;
        if self.entry == self.exit {
            return Err(ConfigError::SameEntryExit);
        }
        Ok((rows, cols))
    }
}

/// Finished maze
///
/// Nothing changes after [Maze::generate] returns, so a maze can be shared
/// between threads as it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    wall_mask: WallMask,
    solution: Path,
    carve_log: CarveLog,
    braided_walls: Vec<Point>,
    entry: Point,
    exit: Point,
}

impl Maze {
    /// Generate a maze
    ///
    /// Carves a perfect maze, opens the entry and exit inward, adds loops
    /// unless the request is perfect, then encodes the wall masks and solves
    /// it. An empty solution is logged but not treated as an error here.
    pub fn generate(request: &GenerationRequest) -> Result<Self, ConfigError> {
        let (rows, cols) = request.validate()?;
        let mut generator =
            MazeGenerator::new(request.seed).with_loop_density(request.loop_density);

        let (mut grid, mut carve_log) = generator.carve(rows, cols)?;

        for (cell, state) in [(request.entry, Cell::Entry), (request.exit, Cell::Exit)] {
            if grid.at(cell) == Cell::Wall {
                carve_log.push(cell);
            }
            grid.set(cell, state);
            carve_log.extend(open_inward(&mut grid, cell));
        }

        let braided_walls = if request.perfect {
            Vec::new()
        } else {
            generator.add_loops(&mut grid)
        };
        carve_log.extend(&braided_walls);

        let wall_mask = WallMask::encode(&grid);
        let solution = solve(&grid);
        info!(
            "Generated {}x{} maze (seed {:?}, {} loops), solution of {} steps",
            rows,
            cols,
            request.seed,
            braided_walls.len(),
            solution.len().saturating_sub(1)
        );

        Ok(Maze {
            grid,
            wall_mask,
            solution,
            carve_log,
            braided_walls,
            entry: request.entry,
            exit: request.exit,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn wall_mask(&self) -> &WallMask {
        &self.wall_mask
    }

    /// Shortest path from entry to exit; empty if they are not connected
    pub fn solution(&self) -> &[Point] {
        &self.solution
    }

    /// Solution as `N`, `E`, `S`, `W` letters, one per step
    pub fn solution_string(&self) -> String {
        path_directions(&self.solution)
    }

    /// Cells in the order they were opened, entry and exit included
    pub fn carve_log(&self) -> &[Point] {
        &self.carve_log
    }

    /// Walls removed to create loops
    pub fn braided_walls(&self) -> &[Point] {
        &self.braided_walls
    }

    pub fn entry(&self) -> Point {
        self.entry
    }

    pub fn exit(&self) -> Point {
        self.exit
    }
}
