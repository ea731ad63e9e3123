//! Saving and loading grid snapshots as JSON.
//!
//! Layout:
//! ```json
//! {
//!   "size": 6,
//!   "next_id": 3,
//!   "placed": [
//!     { "pid": 1, "name": "O", "cubes": [[0,0,0],[1,0,0],[0,1,0],[1,1,0]], "pos": [0,0,0] }
//!   ]
//! }
//! ```
//! Records are written in ascending id order. Loading replaces the whole grid
//! state and re-derives every cell from the records.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::in_bounds;
use crate::grid::{coord_to_idx, VoxelGrid, DEFAULT_SIZE, EMPTY, MAX_SIZE};
use crate::pieces::{Brick, Placement, PlacementId};

/// Serialized form of a whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGrid {
    #[serde(default = "default_size")]
    pub size: usize,
    /// Absent in older snapshots; then one past the largest loaded id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<PlacementId>,
    #[serde(default)]
    pub placed: Vec<SavedPlacement>,
}

/// Serialized form of one placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlacement {
    pub pid: PlacementId,
    #[serde(default)]
    pub name: String,
    pub cubes: Vec<[i32; 3]>,
    pub pos: [i32; 3],
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

/// Captures the grid size, id counter and registry.
pub fn snapshot(grid: &VoxelGrid) -> SavedGrid {
    let placed = grid
        .placements()
        .map(|placement| {
            let (x, y, z) = placement.position();
            SavedPlacement {
                pid: placement.id(),
                name: placement.brick().name().to_owned(),
                cubes: placement
                    .brick()
                    .cubes()
                    .iter()
                    .map(|&(x, y, z)| [x, y, z])
                    .collect(),
                pos: [x, y, z],
            }
        })
        .collect();

    SavedGrid {
        size: grid.size(),
        next_id: Some(grid.next_id()),
        placed,
    }
}

/// Replaces the grid state with `saved`.
///
/// The snapshot is validated in full first; on error the grid is untouched.
pub fn restore(grid: &mut VoxelGrid, saved: SavedGrid) -> Result<()> {
    let size = saved.size;
    if size > MAX_SIZE {
        return Err(malformed(format!("size {size} exceeds the maximum of {MAX_SIZE}")));
    }
    let mut cells = vec![EMPTY; size.pow(3)];
    let mut placed = BTreeMap::new();

    for record in saved.placed {
        let id = record.pid;
        if id == EMPTY {
            return Err(malformed(format!("placement id {id} is reserved for empty cells")));
        }
        if placed.contains_key(&id) {
            return Err(malformed(format!("duplicate placement id {id}")));
        }

        let cubes: Vec<_> = record.cubes.iter().map(|&[x, y, z]| (x, y, z)).collect();
        let brick = Brick::new(record.name, &cubes)
            .map_err(|err| malformed(format!("placement {id}: {err}")))?;
        let [x, y, z] = record.pos;
        let placement = Placement::new(id, brick, (x, y, z)).ok_or_else(|| {
            malformed(format!("placement {id} at {:?} leaves the coordinate range", (x, y, z)))
        })?;

        for cell in placement.cells() {
            if !in_bounds(cell, size) {
                return Err(malformed(format!(
                    "placement {id} covers {cell:?} outside a grid of size {size}"
                )));
            }
            let idx = coord_to_idx(size, cell);
            if cells[idx] != EMPTY {
                return Err(malformed(format!(
                    "placement {id} overlaps placement {} at {cell:?}",
                    cells[idx]
                )));
            }
            cells[idx] = id;
        }
        placed.insert(id, placement);
    }

    let max_id = placed.keys().next_back().copied().unwrap_or(EMPTY);
    let next_id = match saved.next_id {
        Some(next_id) if next_id <= max_id => {
            return Err(malformed(format!(
                "next_id {next_id} does not exceed loaded id {max_id}"
            )));
        }
        Some(next_id) => next_id,
        None => max_id
            .checked_add(1)
            .ok_or_else(|| malformed(format!("no id left after loaded id {max_id}")))?,
    };

    log::debug!(
        "restored {} placements into a grid of size {} (next id {})",
        placed.len(),
        size,
        next_id
    );
    grid.replace_state(size, cells, placed, next_id);
    Ok(())
}

/// Serializes the grid as pretty-printed JSON.
pub fn to_json(grid: &VoxelGrid) -> Result<String> {
    Ok(serde_json::to_string_pretty(&snapshot(grid))?)
}

/// Replaces the grid state from a JSON document.
pub fn from_json(grid: &mut VoxelGrid, json: &str) -> Result<()> {
    let saved: SavedGrid = serde_json::from_str(json).map_err(|err| malformed(err.to_string()))?;
    restore(grid, saved)
}

/// Writes the grid state to `path`.
pub fn save_to_path(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot(grid))?;
    writer.flush()?;
    log::debug!("saved grid to {}", path.display());
    Ok(())
}

/// Replaces the grid state with the snapshot stored at `path`.
pub fn load_from_path(grid: &mut VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let saved: SavedGrid =
        serde_json::from_reader(reader).map_err(|err| malformed(err.to_string()))?;
    restore(grid, saved)?;
    log::debug!("loaded grid from {}", path.display());
    Ok(())
}

fn malformed(reason: String) -> Error {
    Error::MalformedState(reason)
}
