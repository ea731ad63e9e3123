//! Brick Grid
//!
//! Places four-cube bricks into a cubic voxel grid and answers placement
//! queries: where a brick still fits, whether it can bridge two existing
//! bricks, and whether the grid can still be filled. Offers an interactive
//! command shell and a 3D viewer.

mod shell;
mod visualization;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use brickbox::grid::{DEFAULT_SIZE, MAX_SIZE};
use brickbox::search::{self, SearchOptions};
use brickbox::{persistence, place_demo, VoxelGrid};

/// Places 4-cube bricks in a voxel cube and queries where they fit.
#[derive(Parser)]
#[command(name = "brickbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Edge length of the grid.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_SIZE,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_SIZE as u64)
    )]
    size: usize,

    /// JSON snapshot to load before running the command.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive command shell (default).
    Shell,
    /// Place the demo bricks and print the grid.
    Demo {
        /// Open the 3D viewer afterwards.
        #[arg(long)]
        display: bool,
    },
    /// List where a brick fits in the current grid.
    Find {
        brick: String,
        /// Only placements touching an existing brick.
        #[arg(long)]
        adjacent: bool,
        /// Only placements touching at least this many distinct bricks.
        #[arg(long, default_value_t = 0)]
        min_neighbors: usize,
        /// Stop after this many placements.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the fill indicator for a brick.
    Check { brick: String },
    /// Show the brick templates.
    List,
    /// Open the 3D viewer on the current grid.
    Display,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), shell::ShellError> {
    let mut grid = VoxelGrid::new(cli.size);
    if let Some(path) = &cli.state {
        persistence::load_from_path(&mut grid, path)?;
        log::info!(
            "Loaded {} bricks from {}",
            grid.placements().count(),
            path.display()
        );
    }

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut session = shell::Session::new(grid);
            if let Err(err) = shell::run(&mut session) {
                log::error!("Shell stopped: {err}");
            }
            log::debug!(
                "Shell closed with {} bricks placed",
                session.grid().placements().count()
            );
        }
        Command::Demo { display } => {
            grid.clear();
            let ids = place_demo(&mut grid);
            println!("Placed {} demo bricks", ids.len());
            print!("{}", grid.format_grid());
            if display {
                visualization::display(&grid);
            }
        }
        Command::Find {
            brick,
            adjacent,
            min_neighbors,
            limit,
        } => {
            let template = template(&grid, &brick)?;
            let options = SearchOptions {
                only_adjacent: adjacent,
                min_distinct_neighbors: min_neighbors,
            };
            let found = search::find_placements(&grid, &template, options, limit);
            println!("Found {} placements for '{}'", found.len(), brick);
            for placement in found {
                let (x, y, z) = placement.origin;
                let (rx, ry, rz) = placement.rotation;
                println!("pos=({x},{y},{z}) rot=({rx},{ry},{rz})");
            }
        }
        Command::Check { brick } => {
            let template = template(&grid, &brick)?;
            println!("{}", shell::format_status(&brick, search::status(&grid, &template)));
        }
        Command::List => {
            for brick in grid.templates() {
                println!("{}: {:?}", brick.name(), brick.cubes());
            }
        }
        Command::Display => visualization::display(&grid),
    }

    Ok(())
}

fn template(grid: &VoxelGrid, name: &str) -> Result<brickbox::Brick, shell::ShellError> {
    grid.template(name)
        .cloned()
        .ok_or_else(|| shell::ShellError::UnknownBrick(name.to_owned()))
}
