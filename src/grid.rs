//! Cell grid shared by the generator, the solver and the wall encoder

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use itertools::Itertools;

/// Location in the maze, `y` being the row and `x` the column
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Point {
    pub y: usize,
    pub x: usize,
}

impl Point {
    pub const fn new(y: usize, x: usize) -> Self {
        Self { y, x }
    }

    /// Neighbor `dy`, `dx` away, if it stays on a `rows` × `cols` grid
    pub fn offset(self, dy: isize, dx: isize, rows: usize, cols: usize) -> Option<Point> {
        let y = self.y.checked_add_signed(dy)?;
        let x = self.x.checked_add_signed(dx)?;
        (y < rows && x < cols).then_some(Point { y, x })
    }

    /// Orthogonal neighbor towards `dir`, if it stays on the grid
    pub fn step(self, dir: Direction, rows: usize, cols: usize) -> Option<Point> {
        let (dy, dx) = dir.delta();
        self.offset(dy, dx, rows, cols)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(y={}, x={})", self.y, self.x)
    }
}

/// Cardinal direction
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Row and column delta of a single step
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// Bit of this side in a wall mask
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::East => 0b0010,
            Direction::South => 0b0100,
            Direction::West => 0b1000,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.letter() == letter)
    }

    /// Direction of a single orthogonal step from `from` to `to`
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        let dy = to.y as isize - from.y as isize;
        let dx = to.x as isize - from.x as isize;
        Self::ALL.into_iter().find(|d| d.delta() == (dy, dx))
    }
}

/// State of a single grid cell
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Cell {
    Wall,
    Open,
    Entry,
    Exit,
}

impl Cell {
    const S_WALL: char = 'W';
    const S_OPEN: char = ' ';
    const S_OPEN_ALT: char = '.';
    const S_ENTRY: char = 'E';
    const S_EXIT: char = 'X';

    /// Anything but a wall can be walked through
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => Self::S_WALL,
            Cell::Open => Self::S_OPEN,
            Cell::Entry => Self::S_ENTRY,
            Cell::Exit => Self::S_EXIT,
        }
    }

    fn from_symbol(c: char) -> Option<Cell> {
        match c {
            Self::S_WALL => Some(Cell::Wall),
            Self::S_OPEN | Self::S_OPEN_ALT => Some(Cell::Open),
            Self::S_ENTRY => Some(Cell::Entry),
            Self::S_EXIT => Some(Cell::Exit),
            _ => None,
        }
    }
}

/// Rectangular grid of cells
///
/// Positions with both coordinates odd are rooms; every other position is a
/// wall or a passage between two rooms.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Grid of `rows` × `cols` cells, all set to `cell`
    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Self {
        Self {
            cells: (0..rows).map(|_| vec![cell; cols]).collect(),
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, p: Point) -> bool {
        p.y < self.rows && p.x < self.cols
    }

    pub fn get(&self, p: Point) -> Option<Cell> {
        self.cells.get(p.y).and_then(|row| row.get(p.x)).copied()
    }

    /// Cell at `p`; panics when `p` is off the grid
    pub fn at(&self, p: Point) -> Cell {
        self.cells[p.y][p.x]
    }

    pub fn set(&mut self, p: Point, cell: Cell) {
        self.cells[p.y][p.x] = cell;
    }

    /// Whether `p` lies on the outermost ring of the grid
    pub fn is_border(&self, p: Point) -> bool {
        self.contains(p)
            && (p.y == 0 || p.x == 0 || p.y == self.rows - 1 || p.x == self.cols - 1)
    }

    pub fn is_room(p: Point) -> bool {
        p.y % 2 == 1 && p.x % 2 == 1
    }

    /// First position holding `cell`, scanning row by row
    pub fn find(&self, cell: Cell) -> Option<Point> {
        self.iter().find(|&(_, c)| c == cell).map(|(p, _)| p)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.iter().filter(|&(_, c)| c == cell).count()
    }

    /// All cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &cell)| (Point { y, x }, cell))
        })
    }

    pub fn row_slices(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .cells
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).join(""))
            .join("\n");
        f.write_str(&text)
    }
}

impl FromStr for Grid {
    type Err = anyhow::Error;

    /// Parse a grid drawn with `W` for walls, ` ` or `.` for open cells,
    /// `E` for the entry and `X` for the exit.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let cells = s
            .lines()
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, c)| {
                        Cell::from_symbol(c).ok_or_else(|| {
                            anyhow!("Unexpected character `{}` at y={}, x={}", c, y, x)
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            bail!("Grid is empty");
        }
        if let Some((y, row)) = cells.iter().enumerate().find(|(_, r)| r.len() != cols) {
            bail!("Row {} has {} cells, expected {}", y, row.len(), cols);
        }
        Ok(Self { cells, rows, cols })
    }
}

/// Round an even dimension up to the next odd value
pub fn make_odd(n: usize) -> usize {
    if n % 2 == 1 {
        n
    } else {
        n + 1
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{make_odd, Cell, Direction, Grid, Point};

    #[test]
    fn parse_and_print_grid() {
        let text = "WEW\nW.W\nWXW";
        let grid: Grid = text.parse().unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.at(Point::new(0, 1)), Cell::Entry);
        assert_eq!(grid.at(Point::new(1, 1)), Cell::Open);
        assert_eq!(grid.find(Cell::Exit), Some(Point::new(2, 1)));
        assert_eq!(grid.to_string(), "WEW\nW W\nWXW");
    }

    #[test]
    fn reject_unknown_characters_and_ragged_rows() {
        assert!("WW\nW?".parse::<Grid>().is_err());
        assert!("WWW\nWW".parse::<Grid>().is_err());
        assert!("".parse::<Grid>().is_err());
    }

    #[test]
    fn border_and_rooms() {
        let grid = Grid::filled(5, 7, Cell::Wall);
        assert!(grid.is_border(Point::new(0, 3)));
        assert!(grid.is_border(Point::new(2, 6)));
        assert!(grid.is_border(Point::new(4, 0)));
        assert!(!grid.is_border(Point::new(2, 3)));
        assert!(!grid.is_border(Point::new(5, 3)));
        assert!(Grid::is_room(Point::new(1, 3)));
        assert!(!Grid::is_room(Point::new(2, 3)));
    }

    #[test]
    fn steps_stay_on_grid() {
        let p = Point::new(0, 0);
        assert_eq!(p.step(Direction::North, 3, 3), None);
        assert_eq!(p.step(Direction::West, 3, 3), None);
        assert_eq!(p.step(Direction::South, 3, 3), Some(Point::new(1, 0)));
        assert_eq!(Point::new(2, 2).step(Direction::East, 3, 3), None);
    }

    #[test]
    fn direction_between_neighbors() {
        let a = Point::new(2, 2);
        assert_eq!(Direction::between(a, Point::new(1, 2)), Some(Direction::North));
        assert_eq!(Direction::between(a, Point::new(2, 3)), Some(Direction::East));
        assert_eq!(Direction::between(a, Point::new(3, 3)), None);
        assert_eq!(Direction::from_letter('S'), Some(Direction::South));
        assert_eq!(Direction::from_letter('Q'), None);
    }

    #[test]
    fn even_dimensions_become_odd() {
        assert_eq!(make_odd(20), 21);
        assert_eq!(make_odd(21), 21);
    }
}
