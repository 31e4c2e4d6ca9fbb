//! Exported maze files
//!
//! ```text
//! <one line of hex digits per row>
//!
//! <entry_col>,<entry_row>
//! <exit_col>,<exit_row>
//! <solution as N/E/S/W letters>
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};

use crate::config::parse_coordinates;
use crate::grid::{Direction, Point};
use crate::wall_mask::WallMask;
use crate::Maze;

/// Contents of an exported maze file
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MazeFile {
    pub wall_mask: WallMask,
    pub entry: Point,
    pub exit: Point,
    /// Solution as direction letters
    pub path: String,
}

impl MazeFile {
    pub fn from_maze(maze: &Maze) -> Self {
        Self {
            wall_mask: maze.wall_mask().clone(),
            entry: maze.entry(),
            exit: maze.exit(),
            path: maze.solution_string(),
        }
    }

    /// Parse the text of an exported maze file
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut lines = text.lines();
        let grid_lines: Vec<&str> = lines.by_ref().take_while(|l| !l.is_empty()).collect();
        let wall_mask = WallMask::from_hex_lines(grid_lines).context("Invalid wall grid")?;

        let mut coordinates = |key: &'static str| -> anyhow::Result<Point> {
            let line = lines
                .next()
                .ok_or_else(|| anyhow!("Missing {} line", key.to_lowercase()))?;
            Ok(parse_coordinates(key, line)?)
        };
        let entry = coordinates("ENTRY")?;
        let exit = coordinates("EXIT")?;

        let path = lines.next().unwrap_or_default().to_string();
        if let Some(c) = path.chars().find(|&c| Direction::from_letter(c).is_none()) {
            bail!("Unexpected direction `{}` in path", c);
        }
        for (key, p) in [("entry", entry), ("exit", exit)] {
            if wall_mask.get(p).is_none() {
                bail!("The {} {} lies outside the maze", key, p);
            }
        }

        Ok(Self {
            wall_mask,
            entry,
            exit,
            path,
        })
    }

    /// Follow the path from the entry through open sides only
    ///
    /// Returns the cell reached, or an error at the first closed wall.
    pub fn walk(&self) -> anyhow::Result<Point> {
        let rows = self.wall_mask.rows();
        let cols = self.wall_mask.cols();
        let mut at = self.entry;
        for (i, letter) in self.path.chars().enumerate() {
            let dir =
                Direction::from_letter(letter).ok_or_else(|| anyhow!("Bad letter `{}`", letter))?;
            let next = at
                .step(dir, rows, cols)
                .filter(|&n| self.wall_mask.is_passable(at, n))
                .ok_or_else(|| anyhow!("Step {} ({}) from {} hits a wall", i, letter, at))?;
            at = next;
        }
        Ok(at)
    }
}

impl fmt::Display for MazeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.wall_mask.hex_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        writeln!(f, "{},{}", self.entry.x, self.entry.y)?;
        writeln!(f, "{},{}", self.exit.x, self.exit.y)?;
        writeln!(f, "{}", self.path)
    }
}

/// Write `maze` to `path` in the exported format
///
/// Fails if the maze has no solution or the file cannot be written.
pub fn write_output(maze: &Maze, path: &Path) -> anyhow::Result<()> {
    if maze.solution().is_empty() {
        bail!("No path found between entry and exit, refusing to write maze");
    }
    fs::write(path, MazeFile::from_maze(maze).to_string())
        .with_context(|| format!("Cannot write to '{}'", path.display()))
}
