//! Non-interactive maze generation

use a_maze_ing::config::parse_coordinates;
use a_maze_ing::grid::{make_odd, Point};
use a_maze_ing::maze_generator::MazeGenerator;
use a_maze_ing::output::MazeFile;
use a_maze_ing::{GenerationRequest, Maze};
use anyhow::bail;
use clap::Parser;

/// Generate a maze and print it in the exported hex format
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze height, rounded up to an odd value
    #[arg(long, default_value_t = 21)]
    height: usize,

    /// Maze width, rounded up to an odd value
    #[arg(long, default_value_t = 21)]
    width: usize,

    /// Entry cell as `col,row` [default: 1,0]
    #[arg(long)]
    entry: Option<String>,

    /// Exit cell as `col,row` [default: bottom border, second to last column]
    #[arg(long)]
    exit: Option<String>,

    /// Add loops to the maze
    #[arg(long)]
    imperfect: bool,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Remove one in this many redundant walls when adding loops
    #[arg(long, default_value_t = MazeGenerator::DEFAULT_LOOP_DENSITY)]
    loop_density: usize,
}

/// Generate the maze, print output
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rows = make_odd(args.height);
    let cols = make_odd(args.width);
    let entry = match &args.entry {
        Some(s) => parse_coordinates("ENTRY", s)?,
        None => Point::new(0, 1),
    };
    let exit = match &args.exit {
        Some(s) => parse_coordinates("EXIT", s)?,
        None => Point::new(rows.saturating_sub(1), cols.saturating_sub(2)),
    };

    let mut request = GenerationRequest::new(rows, cols, entry, exit)
        .with_perfect(!args.imperfect)
        .with_loop_density(args.loop_density);
    request.seed = args.seed;

    let maze = Maze::generate(&request)?;
    if maze.solution().is_empty() {
        bail!("No path found between entry and exit");
    }
    print!("{}", MazeFile::from_maze(&maze));
    Ok(())
}
