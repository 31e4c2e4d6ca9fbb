//! Interactive maze generator

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use a_maze_ing::config::Config;
use a_maze_ing::decoration::pattern_42;
use a_maze_ing::display::{self, Overlay, PathAnimation, StopSignal, PALETTES};
use a_maze_ing::grid::Point;
use a_maze_ing::menu::{self, MenuChoice};
use a_maze_ing::output::write_output;
use a_maze_ing::Maze;
use anyhow::Context;
use clap::Parser;

/// Generate a maze from a configuration file, write it out and explore it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file with KEY=VALUE lines
    config: PathBuf,

    /// Delay between carved cells, milliseconds
    #[arg(long, default_value_t = 8)]
    carve_delay: u64,

    /// Delay between solution cells, milliseconds
    #[arg(long, default_value_t = 30)]
    path_delay: u64,

    /// Draw mazes at once instead of animating them
    #[arg(long)]
    no_animation: bool,
}

/// Current maze and how it is shown
struct App {
    args: Args,
    maze: Arc<Maze>,
    pattern: Vec<Point>,
    palette: usize,
    show_path: bool,
    animation: Option<PathAnimation>,
}

impl App {
    fn new(args: Args, config: &Config) -> anyhow::Result<Self> {
        let (maze, pattern) = build(config, config.seed)?;
        Ok(Self {
            args,
            maze,
            pattern,
            palette: 0,
            show_path: true,
            animation: None,
        })
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        Config::load(&self.args.config).context("Fix the config file and restart the program")
    }

    /// Replace the maze with a fresh one; the configured seed is ignored
    fn regenerate(&mut self, config: &Config) -> anyhow::Result<()> {
        self.stop_animation()?;
        let (maze, pattern) = build(config, None)?;
        self.maze = maze;
        self.pattern = pattern;
        self.show_path = true;
        Ok(())
    }

    /// Show a newly generated maze and start tracing its solution
    fn present(&mut self) -> anyhow::Result<()> {
        let mut out = io::stdout();
        if self.args.no_animation {
            self.redraw()?;
            return Ok(());
        }
        display::animate_generation(
            &mut out,
            self.maze.grid(),
            self.maze.carve_log(),
            &PALETTES[self.palette],
            Duration::from_millis(self.args.carve_delay),
            &StopSignal::default(),
        )?;
        display::move_below(&mut out, self.maze.grid())?;
        self.start_animation();
        Ok(())
    }

    fn redraw(&self) -> anyhow::Result<()> {
        let mut out = io::stdout();
        let overlay = Overlay {
            path: self.show_path.then(|| self.maze.solution()),
            pattern: &self.pattern,
        };
        display::draw_maze(&mut out, self.maze.grid(), &PALETTES[self.palette], overlay)?;
        display::move_below(&mut out, self.maze.grid())?;
        Ok(())
    }

    fn start_animation(&mut self) {
        if self.args.no_animation {
            return;
        }
        self.animation = Some(PathAnimation::start(
            Arc::clone(&self.maze),
            PALETTES[self.palette],
            Duration::from_millis(self.args.path_delay),
        ));
    }

    fn stop_animation(&mut self) -> anyhow::Result<()> {
        if let Some(mut animation) = self.animation.take() {
            animation.stop()?;
        }
        Ok(())
    }
}

/// Generate a maze and write it to the configured output file
fn build(config: &Config, seed: Option<u64>) -> anyhow::Result<(Arc<Maze>, Vec<Point>)> {
    let mut request = config.request();
    request.seed = seed;
    let maze = Maze::generate(&request)?;
    write_output(&maze, &config.output_file)?;
    let pattern = pattern_42(maze.grid()).unwrap_or_default();
    Ok((Arc::new(maze), pattern))
}

/// Read the configuration, then run the menu until the user quits
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::load(&args.config).context("Fix the config file and restart the program")?;
    let mut app = App::new(args, &config)?;
    app.present()?;

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    while let Some(choice) = menu::prompt(&mut input, &mut out)? {
        match choice {
            MenuChoice::Regenerate => {
                let config = app.load_config()?;
                app.regenerate(&config)?;
                app.present()?;
            }
            MenuChoice::TogglePath => {
                app.stop_animation()?;
                app.show_path = !app.show_path;
                app.redraw()?;
                if app.show_path {
                    app.start_animation();
                }
            }
            MenuChoice::RotateColors => {
                app.stop_animation()?;
                app.palette = (app.palette + 1) % PALETTES.len();
                app.redraw()?;
                display::announce_palette(&mut out, &PALETTES[app.palette])?;
            }
            MenuChoice::Quit => {
                app.stop_animation()?;
                writeln!(out, "You've left the maze. See you next time!")?;
                break;
            }
        }
    }
    app.stop_animation()
}
