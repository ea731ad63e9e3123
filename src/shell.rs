//! Line-oriented command shell over a [`VoxelGrid`].

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use brickbox::search::{self, SearchOptions, Status};
use brickbox::{persistence, Brick, Coord, PlacementId, VoxelGrid};

const HELP: &str = "\
Commands:
  add <brick> x y z rx ry rz   place a rotated brick with its origin at (x,y,z)
  random <brick>               place a brick at a random spot touching a placed brick
  remove <id>                  remove a placed brick
  move <id> dx dy dz           shift a placed brick
  find <brick> [adjacent]      list free placements, optionally touching bricks
  between <brick>              can the brick touch two different bricks?
  status <brick>               empty cells, valid placements, feasibility
  list                         show the brick templates
  placed                       show the placed bricks
  show                         print the grid slices
  save <path> / load <path>    write or read a JSON snapshot
  reset                        clear the grid
  exit";

/// Errors reported to the shell user; the session stays usable after each.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Engine(#[from] brickbox::Error),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown brick id '{0}', use 'list' to see ids")]
    UnknownBrick(String),

    #[error("unknown command '{0}'; type help")]
    UnknownCommand(String),

    #[error("expected an integer, got '{0}'")]
    NotANumber(String),

    #[error("moving {id} by {delta:?} leaves the coordinate range")]
    OutOfRange { id: PlacementId, delta: Coord },
}

/// Outcome of one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Exit,
}

/// Interactive session state.
pub struct Session {
    grid: VoxelGrid,
    rng: StdRng,
}

impl Session {
    pub fn new(grid: VoxelGrid) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    /// Session drawing random placements from `rng`.
    pub fn with_rng(grid: VoxelGrid, rng: StdRng) -> Self {
        Self { grid, rng }
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Executes one command line.
    pub fn execute(&mut self, line: &str) -> Result<Reply, ShellError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = parts.split_first() else {
            return Ok(Reply::Text(String::new()));
        };

        let text = match command.to_lowercase().as_str() {
            "help" => HELP.to_owned(),
            "list" => self.list(),
            "placed" => self.placed(),
            "show" => self.grid.format_grid(),
            "add" => self.add(args)?,
            "remove" => {
                let [id] = args else {
                    return Err(ShellError::Usage("remove <id>"));
                };
                let id = parse_id(id)?;
                let removed = self.grid.remove(id)?;
                format!("removed {} ({})", id, removed.brick().name())
            }
            "move" => {
                let [id, dx, dy, dz] = args else {
                    return Err(ShellError::Usage("move <id> dx dy dz"));
                };
                let id = parse_id(id)?;
                let delta = (parse_int(dx)?, parse_int(dy)?, parse_int(dz)?);
                let position = self
                    .grid
                    .placement(id)
                    .map(|placement| placement.position())
                    .ok_or(brickbox::Error::UnknownId(id))?;
                let target = brickbox::geometry::translate(position, delta)
                    .ok_or(ShellError::OutOfRange { id, delta })?;
                self.grid.move_to(id, target)?;
                format!("moved {id} to {target:?}")
            }
            "random" => {
                let [name] = args else {
                    return Err(ShellError::Usage("random <brick>"));
                };
                let template = self.template(name)?;
                match search::place_random(
                    &mut self.grid,
                    &template,
                    SearchOptions::adjacent(),
                    &mut self.rng,
                )? {
                    Some((id, placed)) => {
                        let (rx, ry, rz) = placed.rotation;
                        format!(
                            "placed {name} as id {id} at {:?} rot=({rx},{ry},{rz})",
                            placed.origin
                        )
                    }
                    None => format!("No free {name} placement touches an existing brick."),
                }
            }
            "find" => self.find(args)?,
            "between" => {
                let [name] = args else {
                    return Err(ShellError::Usage("between <brick>"));
                };
                let template = self.template(name)?;
                if search::can_place_between(&self.grid, &template, 2) {
                    format!("It's possible to place a {name} between existing bricks.")
                } else {
                    format!("No valid {name} placement found that lies between existing bricks.")
                }
            }
            "status" => {
                let [name] = args else {
                    return Err(ShellError::Usage("status <brick>"));
                };
                let template = self.template(name)?;
                format_status(name, search::status(&self.grid, &template))
            }
            "save" => {
                let [path] = args else {
                    return Err(ShellError::Usage("save <path>"));
                };
                persistence::save_to_path(&self.grid, path)?;
                format!("saved to {path}")
            }
            "load" => {
                let [path] = args else {
                    return Err(ShellError::Usage("load <path>"));
                };
                persistence::load_from_path(&mut self.grid, path)?;
                format!(
                    "loaded {} bricks from {path}",
                    self.grid.placements().count()
                )
            }
            "reset" => {
                self.grid.clear();
                "grid cleared".to_owned()
            }
            "exit" | "quit" => return Ok(Reply::Exit),
            other => return Err(ShellError::UnknownCommand(other.to_owned())),
        };

        Ok(Reply::Text(text))
    }

    fn template(&self, name: &str) -> Result<Brick, ShellError> {
        self.grid
            .template(name)
            .cloned()
            .ok_or_else(|| ShellError::UnknownBrick(name.to_owned()))
    }

    fn list(&self) -> String {
        let mut output = String::from("Available bricks:");
        for brick in self.grid.templates() {
            output.push_str(&format!("\n  {}: {:?}", brick.name(), brick.cubes()));
        }
        output
    }

    fn placed(&self) -> String {
        let lines: Vec<String> = self
            .grid
            .placements()
            .map(|p| format!("{}: {} at {:?}", p.id(), p.brick().name(), p.position()))
            .collect();
        if lines.is_empty() {
            "(no bricks placed)".to_owned()
        } else {
            lines.join("\n")
        }
    }

    fn add(&mut self, args: &[&str]) -> Result<String, ShellError> {
        const USAGE: &str = "add <brick> x y z rx ry rz";
        let [name, rest @ ..] = args else {
            return Err(ShellError::Usage(USAGE));
        };
        let [x, y, z, rx, ry, rz] = rest else {
            return Err(ShellError::Usage(USAGE));
        };
        let template = self.template(name)?;
        let position: Coord = (parse_int(x)?, parse_int(y)?, parse_int(z)?);
        let brick = template.oriented(parse_int(rx)?, parse_int(ry)?, parse_int(rz)?);
        let id = self.grid.place(brick, position)?;
        Ok(format!("placed {name} as id {id}"))
    }

    fn find(&self, args: &[&str]) -> Result<String, ShellError> {
        let (name, options) = match args {
            [name] => (name, SearchOptions::anywhere()),
            [name, flag] if flag.eq_ignore_ascii_case("adjacent") => (name, SearchOptions::adjacent()),
            _ => return Err(ShellError::Usage("find <brick> [adjacent]")),
        };
        let template = self.template(name)?;
        let found = search::find_placements(&self.grid, &template, options, None);

        let mut output = format!("Found {} placements for '{}'", found.len(), name);
        for placement in &found {
            let (x, y, z) = placement.origin;
            let (rx, ry, rz) = placement.rotation;
            output.push_str(&format!("\npos=({x},{y},{z}) rot=({rx},{ry},{rz})"));
        }
        Ok(output)
    }
}

/// Renders the fill indicator line.
pub fn format_status(name: &str, status: Status) -> String {
    match status {
        Status::Complete => "Complete !!!".to_owned(),
        Status::Open {
            empty,
            valid,
            placeable,
        } => format!(
            "{empty}:{valid}: {name}'s: {}",
            if placeable { "YES" } else { "NO" }
        ),
    }
}

/// Reads commands from stdin until `exit` or end of input.
pub fn run(session: &mut Session) -> io::Result<()> {
    println!("{0}x{0}x{0} brick grid - enter commands (type 'help' for usage)", session.grid.size());
    let names: Vec<&str> = session.grid.templates().iter().map(Brick::name).collect();
    println!("Available bricks: {}", names.join(", "));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!("\nexiting");
            return Ok(());
        };

        match session.execute(line?.trim()) {
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Exit) => {
                println!("bye");
                return Ok(());
            }
            Err(err) => println!("error: {err}"),
        }
    }
}

fn parse_int(text: &str) -> Result<i32, ShellError> {
    text.parse()
        .map_err(|_| ShellError::NotANumber(text.to_owned()))
}

fn parse_id(text: &str) -> Result<PlacementId, ShellError> {
    text.parse()
        .map_err(|_| ShellError::NotANumber(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(reply: Result<Reply, ShellError>) -> String {
        match reply.expect("command succeeds") {
            Reply::Text(text) => text,
            Reply::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn test_add_move_remove() {
        let mut session = Session::new(VoxelGrid::new(6));
        assert_eq!(text(session.execute("add O 0 0 0 0 0 0")), "placed O as id 1");
        assert_eq!(text(session.execute("move 1 1 0 0")), "moved 1 to (1, 0, 0)");
        assert_eq!(text(session.execute("placed")), "1: O at (1, 0, 0)");
        assert_eq!(text(session.execute("remove 1")), "removed 1 (O)");
        assert_eq!(session.grid().num_empty(), 216);
    }

    #[test]
    fn test_errors_keep_session_usable() {
        let mut session = Session::new(VoxelGrid::new(6));
        assert!(matches!(session.execute("add X 0 0 0 0 0 0"), Err(ShellError::UnknownBrick(_))));
        assert!(matches!(session.execute("add T 0 0"), Err(ShellError::Usage(_))));
        assert!(matches!(session.execute("add T a 0 0 0 0 0"), Err(ShellError::NotANumber(_))));
        assert!(matches!(
            session.execute("add I 3 0 0 0 0 0"),
            Err(ShellError::Engine(brickbox::Error::InvalidPlacement { .. }))
        ));
        assert!(matches!(
            session.execute("remove 4"),
            Err(ShellError::Engine(brickbox::Error::UnknownId(4)))
        ));
        assert!(matches!(session.execute("jump"), Err(ShellError::UnknownCommand(_))));
        assert_eq!(text(session.execute("add T 0 0 0 0 0 0")), "placed T as id 1");
    }

    #[test]
    fn test_coordinate_limits_are_errors() {
        let mut session = Session::new(VoxelGrid::new(6));
        assert!(matches!(
            session.execute("add T 2147483647 0 0 0 0 0"),
            Err(ShellError::Engine(brickbox::Error::InvalidPlacement { .. }))
        ));
        assert!(matches!(
            session.execute("add T -2147483648 0 0 0 0 0"),
            Err(ShellError::Engine(brickbox::Error::InvalidPlacement { .. }))
        ));

        text(session.execute("add O 0 0 0 0 0 0"));
        assert!(matches!(
            session.execute("move 1 2147483647 0 0"),
            Err(ShellError::Engine(brickbox::Error::InvalidPlacement { .. }))
        ));
        text(session.execute("move 1 0 0 1"));
        assert!(matches!(
            session.execute("move 1 0 0 2147483647"),
            Err(ShellError::OutOfRange { id: 1, .. })
        ));
        assert_eq!(text(session.execute("placed")), "1: O at (0, 0, 1)");
    }

    #[test]
    fn test_random_places_next_to_existing_brick() {
        let mut session = Session::with_rng(VoxelGrid::new(2), StdRng::seed_from_u64(3));
        assert_eq!(
            text(session.execute("random O")),
            "No free O placement touches an existing brick."
        );
        text(session.execute("add O 0 0 0 0 0 0"));

        let placed = text(session.execute("random O"));
        assert!(placed.starts_with("placed O as id 2 at (0, 0, 1)"), "{placed}");
        assert_eq!(text(session.execute("status O")), "Complete !!!");
        assert!(matches!(session.execute("random"), Err(ShellError::Usage(_))));
        assert!(matches!(session.execute("random Q"), Err(ShellError::UnknownBrick(_))));
    }

    #[test]
    fn test_find_and_between() {
        let mut session = Session::new(VoxelGrid::new(2));
        let found = text(session.execute("find O"));
        assert!(found.starts_with("Found 6 placements for 'O'"));
        assert!(found.contains("pos=(0,0,0) rot=(0,0,0)"));

        text(session.execute("add O 0 0 0 0 0 0"));
        let adjacent = text(session.execute("find O adjacent"));
        assert_eq!(adjacent.lines().count(), 2);
        assert_eq!(
            text(session.execute("between O")),
            "No valid O placement found that lies between existing bricks."
        );
    }

    #[test]
    fn test_status_line() {
        let mut session = Session::new(VoxelGrid::new(2));
        text(session.execute("add O 0 0 0 0 0 0"));
        assert_eq!(text(session.execute("status O")), "4:1: O's: YES");
        text(session.execute("add O 0 0 1 0 0 0"));
        assert_eq!(text(session.execute("status O")), "Complete !!!");
    }

    #[test]
    fn test_reset_and_exit() {
        let mut session = Session::new(VoxelGrid::new(6));
        text(session.execute("add L 0 0 0 0 0 0"));
        assert_eq!(text(session.execute("reset")), "grid cleared");
        assert_eq!(text(session.execute("placed")), "(no bricks placed)");
        assert_eq!(session.execute("quit").expect("quit"), Reply::Exit);
        assert_eq!(text(session.execute("   ")), "");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("state.json");
        let path = path.to_str().expect("utf-8 path");

        let mut session = Session::new(VoxelGrid::new(6));
        text(session.execute("add S3D 1 1 1 0 0 0"));
        text(session.execute(&format!("save {path}")));
        text(session.execute("reset"));
        assert_eq!(
            text(session.execute(&format!("load {path}"))),
            format!("loaded 1 bricks from {path}")
        );
        assert_eq!(session.grid().next_id(), 2);
    }
}
