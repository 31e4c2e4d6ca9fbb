//! Terminal rendering and animation
//!
//! Every maze cell is drawn as two colored blank columns, with a one-cell
//! margin around the maze. The palette is chosen by the caller.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::cursor::{MoveTo, RestorePosition, SavePosition};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use log::debug;

use crate::grid::{Cell, Grid, Point};
use crate::Maze;

/// Wall and path trace colors
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub wall: Color,
    pub trace: Color,
    pub wall_name: &'static str,
    pub trace_name: &'static str,
}

pub const PALETTES: [Palette; 8] = [
    Palette::new(Color::Grey, Color::DarkGrey, "White", "Gray"),
    Palette::new(Color::White, Color::DarkGrey, "Bright White", "Gray"),
    Palette::new(Color::AnsiValue(20), Color::AnsiValue(153), "Blue", "Light Blue"),
    Palette::new(Color::AnsiValue(37), Color::AnsiValue(159), "Cyan", "Light Cyan"),
    Palette::new(Color::AnsiValue(28), Color::AnsiValue(121), "Green", "Light Green"),
    Palette::new(Color::AnsiValue(130), Color::AnsiValue(223), "Gold", "Light Peach"),
    Palette::new(Color::AnsiValue(91), Color::AnsiValue(219), "Purple", "Light Pink"),
    Palette::new(Color::AnsiValue(124), Color::AnsiValue(217), "Dark Red", "Light Salmon"),
];

impl Palette {
    const fn new(
        wall: Color,
        trace: Color,
        wall_name: &'static str,
        trace_name: &'static str,
    ) -> Self {
        Self {
            wall,
            trace,
            wall_name,
            trace_name,
        }
    }
}

const PASSAGE: Color = Color::AnsiValue(232);
const PATTERN: Color = Color::AnsiValue(214);
const CELL: &str = "  ";

/// Terminal row of the top margin
pub const MAZE_TOP_ROW: u16 = 0;

/// What to highlight on top of the bare grid
#[derive(Clone, Copy, Default, Debug)]
pub struct Overlay<'a> {
    /// Solution path, if shown
    pub path: Option<&'a [Point]>,
    /// Decorative wall cells
    pub pattern: &'a [Point],
}

/// Cooperative cancellation flag shared with an animation
#[derive(Clone, Default, Debug)]
pub struct StopSignal(Arc<(Mutex<bool>, Condvar)>);

impl StopSignal {
    pub fn stop(&self) {
        let (stopped, wakeup) = &*self.0;
        *stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wakeup.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        let (stopped, _) = &*self.0;
        *stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `delay`, waking early if stopped meanwhile
    ///
    /// Returns whether the signal is set.
    pub fn wait(&self, delay: Duration) -> bool {
        let (stopped, wakeup) = &*self.0;
        let guard = stopped.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = wakeup
            .wait_timeout_while(guard, delay, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

fn screen_position(p: Point) -> (u16, u16) {
    let col = (p.x + 1) * CELL.len();
    let row = MAZE_TOP_ROW as usize + 1 + p.y;
    (
        u16::try_from(col).unwrap_or(u16::MAX),
        u16::try_from(row).unwrap_or(u16::MAX),
    )
}

fn cell_color(cell: Cell, on_path: bool, in_pattern: bool, palette: &Palette) -> Color {
    match cell {
        Cell::Entry | Cell::Exit => palette.trace,
        _ if on_path => palette.trace,
        Cell::Wall if in_pattern => PATTERN,
        Cell::Wall => palette.wall,
        Cell::Open => PASSAGE,
    }
}

/// Put the cursor on the first line below a drawn maze
pub fn move_below(out: &mut impl Write, grid: &Grid) -> io::Result<()> {
    let (_, row) = screen_position(Point::new(grid.rows() + 1, 0));
    out.queue(MoveTo(0, row))?;
    out.flush()
}

fn draw_with(
    out: &mut impl Write,
    grid: &Grid,
    mut color: impl FnMut(Point, Cell) -> Color,
) -> io::Result<()> {
    let margin = CELL.repeat(grid.cols() + 2);
    out.queue(Clear(ClearType::All))?
        .queue(MoveTo(0, MAZE_TOP_ROW))?
        .queue(Print(&margin))?;
    for (y, row) in grid.row_slices().iter().enumerate() {
        let (_, screen_row) = screen_position(Point::new(y, 0));
        out.queue(MoveTo(0, screen_row))?.queue(Print(CELL))?;
        for (x, &cell) in row.iter().enumerate() {
            out.queue(SetBackgroundColor(color(Point::new(y, x), cell)))?
                .queue(Print(CELL))?
                .queue(ResetColor)?;
        }
        out.queue(Print(CELL))?;
    }
    let (_, bottom) = screen_position(Point::new(grid.rows(), 0));
    out.queue(MoveTo(0, bottom))?.queue(Print(&margin))?;
    out.flush()
}

/// Draw the whole maze
pub fn draw_maze(
    out: &mut impl Write,
    grid: &Grid,
    palette: &Palette,
    overlay: Overlay<'_>,
) -> io::Result<()> {
    let path: HashSet<Point> = overlay.path.unwrap_or_default().iter().copied().collect();
    let pattern: HashSet<Point> = overlay.pattern.iter().copied().collect();
    draw_with(out, grid, |p, cell| {
        cell_color(cell, path.contains(&p), pattern.contains(&p), palette)
    })
}

fn paint(out: &mut impl Write, p: Point, color: Color) -> io::Result<()> {
    let (col, row) = screen_position(p);
    out.queue(SavePosition)?
        .queue(MoveTo(col, row))?
        .queue(SetBackgroundColor(color))?
        .queue(Print(CELL))?
        .queue(ResetColor)?
        .queue(RestorePosition)?;
    out.flush()
}

/// Draw the maze as solid walls, then reveal the carved cells one by one
///
/// Stops early, leaving the drawing unfinished, once `stop` is set.
pub fn animate_generation(
    out: &mut impl Write,
    grid: &Grid,
    carve_log: &[Point],
    palette: &Palette,
    delay: Duration,
    stop: &StopSignal,
) -> io::Result<()> {
    draw_with(out, grid, |_, _| palette.wall)?;
    for &p in carve_log {
        if stop.is_stopped() {
            debug!("Generation animation stopped");
            return Ok(());
        }
        let color = match grid.get(p) {
            Some(Cell::Entry | Cell::Exit) => palette.trace,
            Some(_) => PASSAGE,
            None => continue,
        };
        paint(out, p, color)?;
        stop.wait(delay);
    }
    Ok(())
}

/// Paint the solution path cell by cell, until done or stopped
pub fn animate_path(
    out: &mut impl Write,
    grid: &Grid,
    path: &[Point],
    palette: &Palette,
    delay: Duration,
    stop: &StopSignal,
) -> io::Result<()> {
    for &p in path {
        if stop.is_stopped() {
            debug!("Path animation stopped");
            return Ok(());
        }
        if !grid.get(p).is_some_and(Cell::is_passable) {
            continue;
        }
        paint(out, p, palette.trace)?;
        stop.wait(delay);
    }
    Ok(())
}

/// Print the name of a palette in cyan
pub fn announce_palette(out: &mut impl Write, palette: &Palette) -> io::Result<()> {
    out.queue(SetForegroundColor(Color::Cyan))?
        .queue(Print(format!(
            "[Color] {} / {}\n",
            palette.wall_name, palette.trace_name
        )))?
        .queue(ResetColor)?;
    out.flush()
}

/// Solution path animation running on its own thread
///
/// The thread only reads the shared maze. Dropping the animation stops it.
pub struct PathAnimation {
    stop: StopSignal,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl PathAnimation {
    /// Start painting the solution of `maze` to standard output
    pub fn start(maze: Arc<Maze>, palette: Palette, delay: Duration) -> Self {
        let stop = StopSignal::default();
        let signal = stop.clone();
        let handle = thread::spawn(move || {
            let mut out = io::stdout();
            animate_path(&mut out, maze.grid(), maze.solution(), &palette, delay, &signal)
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the thread to stop and wait for it
    pub fn stop(&mut self) -> io::Result<()> {
        self.stop.stop();
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("path animation thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl Drop for PathAnimation {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
