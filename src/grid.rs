//! Voxel grid with its placement registry.
//!
//! The grid is an N x N x N flat array where each cell holds the id of the
//! placement that owns it, or 0 when empty. Index order is x-major:
//! `idx = x * N * N + y * N + z`. The grid is the only mutable source of truth;
//! the per-template caches are rebuilt only when the size changes.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::cache::PlacementCache;
use crate::error::{Error, Result};
use crate::geometry::in_bounds;
use crate::pieces::{default_bricks, Brick, Coord, Placement, PlacementId};

/// Cell value of an empty voxel.
pub const EMPTY: PlacementId = 0;

/// First id handed out by a fresh or cleared grid.
pub const FIRST_ID: PlacementId = 1;

/// Grid size used when none is given.
pub const DEFAULT_SIZE: usize = 6;

/// Largest supported edge length. Loaded snapshots and CLI sizes above it are rejected.
pub const MAX_SIZE: usize = 256;

/// Converts (x, y, z) coordinates to a linear cell index.
///
/// The coordinate must be in bounds.
#[inline(always)]
pub const fn coord_to_idx(size: usize, (x, y, z): Coord) -> usize {
    (x as usize) * size * size + (y as usize) * size + (z as usize)
}

/// Cubic occupancy grid plus the registry of placed bricks.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    size: usize,
    cells: Vec<PlacementId>,
    next_id: PlacementId,
    placed: BTreeMap<PlacementId, Placement>,
    templates: Vec<Brick>,
    caches: FxHashMap<String, PlacementCache>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl VoxelGrid {
    /// Creates an empty grid with the default brick templates.
    ///
    /// `size` is expected to be at most [`MAX_SIZE`].
    pub fn new(size: usize) -> Self {
        Self::with_templates(size, default_bricks())
    }

    /// Creates an empty grid with a custom template set.
    pub fn with_templates(size: usize, templates: Vec<Brick>) -> Self {
        let caches = build_caches(&templates, size);
        Self {
            size,
            cells: vec![EMPTY; size * size * size],
            next_id: FIRST_ID,
            placed: BTreeMap::new(),
            templates,
            caches,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn next_id(&self) -> PlacementId {
        self.next_id
    }

    /// Raw occupancy in x-major order.
    pub fn cells(&self) -> &[PlacementId] {
        &self.cells
    }

    /// Owner of a cell, or `None` when the coordinate is out of bounds.
    pub fn cell(&self, coord: Coord) -> Option<PlacementId> {
        in_bounds(coord, self.size).then(|| self.cells[coord_to_idx(self.size, coord)])
    }

    /// Placements in ascending id order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.placed.values()
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placed.get(&id)
    }

    pub fn templates(&self) -> &[Brick] {
        &self.templates
    }

    pub fn template(&self, name: &str) -> Option<&Brick> {
        self.templates.iter().find(|brick| brick.name() == name)
    }

    /// Cached orientations and empty-grid origins for a template name.
    pub fn cache(&self, name: &str) -> Option<&PlacementCache> {
        self.caches.get(name)
    }

    /// Returns true if every cube of `brick` at `position` is in bounds and empty.
    pub fn can_place(&self, brick: &Brick, position: Coord) -> bool {
        brick
            .cells_at(position)
            .is_some_and(|cells| cells.iter().all(|&cell| self.cell(cell) == Some(EMPTY)))
    }

    /// Places `brick` with its origin at `position` and returns the new id.
    pub fn place(&mut self, brick: Brick, position: Coord) -> Result<PlacementId> {
        if !self.can_place(&brick, position) {
            return Err(Error::InvalidPlacement { position });
        }
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(Error::IdsExhausted)?;
        let placement =
            Placement::new(id, brick, position).ok_or(Error::InvalidPlacement { position })?;

        self.fill(placement.cells(), id);
        log::trace!("placed {} as {} at {:?}", placement.brick().name(), id, position);
        self.placed.insert(id, placement);
        self.next_id = next_id;
        Ok(id)
    }

    /// Removes a placement and frees its cells. The id is never handed out again.
    pub fn remove(&mut self, id: PlacementId) -> Result<Placement> {
        let placement = self.placed.remove(&id).ok_or(Error::UnknownId(id))?;
        self.fill(placement.cells(), EMPTY);
        log::trace!("removed {}", id);
        Ok(placement)
    }

    /// Like [`can_place`](Self::can_place), but the placement's own cells count as free.
    ///
    /// Unknown ids yield `false`.
    pub fn can_move(&self, id: PlacementId, new_position: Coord) -> bool {
        let Some(placement) = self.placed.get(&id) else {
            return false;
        };
        placement
            .brick()
            .cells_at(new_position)
            .is_some_and(|cells| {
                cells
                    .iter()
                    .all(|&cell| matches!(self.cell(cell), Some(owner) if owner == EMPTY || owner == id))
            })
    }

    /// Shifts a placement to `new_position`, keeping its id.
    ///
    /// The target is validated in full before any cell changes.
    pub fn move_to(&mut self, id: PlacementId, new_position: Coord) -> Result<()> {
        let invalid = Error::InvalidPlacement {
            position: new_position,
        };
        let placement = self.placed.get(&id).ok_or(Error::UnknownId(id))?;
        if !self.can_move(id, new_position) {
            return Err(invalid);
        }
        let old_cells = placement.cells();
        let moved = placement.moved_to(new_position).ok_or(invalid)?;

        self.fill(old_cells, EMPTY);
        self.fill(moved.cells(), id);
        self.placed.insert(id, moved);
        Ok(())
    }

    /// Number of empty cells. Zero means the grid is completely tiled.
    pub fn num_empty(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == EMPTY).count()
    }

    /// Removes every placement and restarts id allocation.
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
        self.placed.clear();
        self.next_id = FIRST_ID;
    }

    /// Every (orientation, origin) pair for `brick`'s template that fits right now.
    ///
    /// Cached empty-grid origins that are currently free are tried against
    /// every cached orientation with a live [`can_place`](Self::can_place).
    /// Unknown template names yield no pairs.
    pub fn validate_placements(&self, brick: &Brick) -> Vec<(Brick, Coord)> {
        let Some(cache) = self.caches.get(brick.name()) else {
            return Vec::new();
        };

        let mut placements = Vec::new();
        for &origin in self.free_origins(cache) {
            for orientation in cache.rotations() {
                if self.can_place(orientation, origin) {
                    placements.push((orientation.clone(), origin));
                }
            }
        }
        placements
    }

    /// Approximate infeasibility signal for `brick`'s template.
    ///
    /// Returns true if some cached origin that is currently free admits no
    /// cached orientation, or if no cached origin is free at all. Only origins
    /// that fit an empty grid are inspected; fragmentation of the free space is
    /// not analysed, so a `false` answer does not prove the grid can be tiled.
    pub fn cannot_place_somewhere(&self, brick: &Brick) -> bool {
        let Some(cache) = self.caches.get(brick.name()) else {
            return false;
        };

        let mut free = self.free_origins(cache).peekable();
        if free.peek().is_none() {
            log::debug!("no free origin left for {}", brick.name());
            return true;
        }

        for &origin in free {
            let fits = cache
                .rotations()
                .iter()
                .any(|orientation| self.can_place(orientation, origin));
            if !fits {
                log::debug!("cannot place {} at {:?} with any rotation", brick.name(), origin);
                return true;
            }
        }
        false
    }

    /// Formats the grid as z-slices side by side, rows from top (high y) down.
    ///
    /// Placement ids show as 1-9 then A-Z, larger ids as `#`; empty cells as `.`.
    pub fn format_grid(&self) -> String {
        let size = self.size;
        let width = size.max(format!("z={}", size.saturating_sub(1)).len());
        let mut output = String::new();

        let header: Vec<String> = (0..size)
            .map(|z| format!("{:<width$}", format!("z={z}")))
            .collect();
        output.push_str(header.join("  ").trim_end());
        output.push('\n');

        for y in (0..size).rev() {
            let row: Vec<String> = (0..size)
                .map(|z| {
                    let slice: String = (0..size)
                        .map(|x| {
                            let coord = (x as i32, y as i32, z as i32);
                            id_char(self.cells[coord_to_idx(size, coord)])
                        })
                        .collect();
                    format!("{slice:<width$}")
                })
                .collect();
            output.push_str(row.join("  ").trim_end());
            output.push('\n');
        }

        output
    }

    /// Replaces the whole state. Caches are rebuilt only if the size changed.
    ///
    /// Callers guarantee that `placed` and `cells` agree and that `next_id`
    /// exceeds every registered id.
    pub(crate) fn replace_state(
        &mut self,
        size: usize,
        cells: Vec<PlacementId>,
        placed: BTreeMap<PlacementId, Placement>,
        next_id: PlacementId,
    ) {
        if size != self.size {
            log::debug!("grid resized from {} to {}", self.size, size);
            self.caches = build_caches(&self.templates, size);
            self.size = size;
        }
        self.cells = cells;
        self.placed = placed;
        self.next_id = next_id;
    }

    fn free_origins<'a>(&'a self, cache: &'a PlacementCache) -> impl Iterator<Item = &'a Coord> {
        cache
            .origins()
            .iter()
            .filter(move |&&origin| self.cell(origin) == Some(EMPTY))
    }

    fn fill(&mut self, cells: impl IntoIterator<Item = Coord>, value: PlacementId) {
        for cell in cells {
            let idx = coord_to_idx(self.size, cell);
            self.cells[idx] = value;
        }
    }
}

fn build_caches(templates: &[Brick], size: usize) -> FxHashMap<String, PlacementCache> {
    templates
        .iter()
        .map(|template| (template.name().to_owned(), PlacementCache::build(template, size)))
        .collect()
}

fn id_char(id: PlacementId) -> char {
    match id {
        EMPTY => '.',
        1..=9 => char::from(b'0' + id as u8),
        10..=35 => char::from(b'A' + (id - 10) as u8),
        _ => '#',
    }
}
