//! Per-cell wall bitmasks
//!
//! Every cell gets four bits, one per side: North=1, East=2, South=4,
//! West=8. A set bit means that side is closed. This is the representation
//! written to exported maze files, one hex digit per cell.

use anyhow::{anyhow, bail};
use itertools::Itertools;

use crate::grid::{Cell, Direction, Grid, Point};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct WallMask {
    masks: Vec<Vec<u8>>,
}

impl WallMask {
    /// Derive the masks of a finished grid
    ///
    /// A side is closed when the neighbor behind it is a wall, or when it
    /// faces out of the grid, except for the entry and exit cells whose
    /// outward sides stay open.
    pub fn encode(grid: &Grid) -> Self {
        let masks = grid
            .row_slices()
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &cell)| Self::cell_mask(grid, Point::new(y, x), cell))
                    .collect()
            })
            .collect();
        Self { masks }
    }

    fn cell_mask(grid: &Grid, p: Point, cell: Cell) -> u8 {
        let is_gate = matches!(cell, Cell::Entry | Cell::Exit);
        Direction::ALL
            .into_iter()
            .filter(|&dir| match p.step(dir, grid.rows(), grid.cols()) {
                None => !is_gate,
                Some(n) => grid.at(n) == Cell::Wall,
            })
            .fold(0, |bits, dir| bits | dir.bit())
    }

    pub fn rows(&self) -> usize {
        self.masks.len()
    }

    pub fn cols(&self) -> usize {
        self.masks.first().map_or(0, Vec::len)
    }

    pub fn get(&self, p: Point) -> Option<u8> {
        self.masks.get(p.y).and_then(|row| row.get(p.x)).copied()
    }

    /// Whether side `dir` of cell `p` is closed; off-grid cells are closed
    pub fn is_closed(&self, p: Point, dir: Direction) -> bool {
        self.get(p).map_or(true, |bits| bits & dir.bit() != 0)
    }

    /// Whether one can step between orthogonal neighbors `a` and `b`
    pub fn is_passable(&self, a: Point, b: Point) -> bool {
        match Direction::between(a, b) {
            Some(dir) => !self.is_closed(a, dir) && !self.is_closed(b, dir.opposite()),
            None => false,
        }
    }

    /// One line of uppercase hex digits per row
    pub fn hex_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.masks
            .iter()
            .map(|row| row.iter().map(|bits| format!("{:X}", bits)).join(""))
    }

    /// Parse rows of hex digits back into masks
    pub fn from_hex_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> anyhow::Result<Self> {
        let masks = lines
            .into_iter()
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, c)| {
                        c.to_digit(16).map(|d| d as u8).ok_or_else(|| {
                            anyhow!("Unexpected character `{}` at y={}, x={}", c, y, x)
                        })
                    })
                    .collect::<anyhow::Result<Vec<u8>>>()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let cols = masks.first().map_or(0, Vec::len);
        if cols == 0 {
            bail!("Wall mask is empty");
        }
        if let Some((y, row)) = masks.iter().enumerate().find(|(_, r)| r.len() != cols) {
            bail!("Row {} has {} cells, expected {}", y, row.len(), cols);
        }
        Ok(Self { masks })
    }
}
