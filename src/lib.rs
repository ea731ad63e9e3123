//! Brick Placement Engine
//!
//! Places rigid four-cube bricks into a fixed-size voxel cube under rotation,
//! collision and bounds constraints, and answers feasibility queries: can a
//! shape still fit somewhere, possibly bridging two existing structures.
//!
//! All operations are synchronous and single-threaded. A [`VoxelGrid`] is owned
//! by one caller at a time; searches must not run concurrently with mutations.

pub mod cache;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod search;

pub use cache::PlacementCache;
pub use error::{Error, Result};
pub use grid::VoxelGrid;
pub use pieces::{default_bricks, Brick, Coord, Placement, PlacementId};
pub use search::{find_placements, FoundPlacement, SearchOptions, Status};

/// Places the demo layout: an O in the corner, an I along y and an L standing in z.
///
/// Bricks that do not fit the grid are skipped; returns the ids that were placed.
pub fn place_demo(grid: &mut VoxelGrid) -> Vec<PlacementId> {
    const LAYOUT: [(&str, (i32, i32, i32), Coord); 3] = [
        ("O", (0, 0, 0), (0, 0, 0)),
        ("I", (0, 0, 1), (0, 2, 0)),
        ("L", (0, 1, 0), (3, 0, 0)),
    ];

    let mut ids = Vec::new();
    for (name, (rx, ry, rz), position) in LAYOUT {
        let Some(template) = grid.template(name) else {
            continue;
        };
        let brick = template.oriented(rx, ry, rz);
        match grid.place(brick, position) {
            Ok(id) => ids.push(id),
            Err(err) => log::debug!("demo placement of {name} skipped: {err}"),
        }
    }
    ids
}
