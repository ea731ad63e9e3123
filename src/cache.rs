//! Precomputed orientation and origin sets for one brick template.
//!
//! The cache is built against an empty grid of a given size. It is an
//! optimistic prefilter: an origin listed here can still be blocked by live
//! occupancy, so every query that uses it must confirm with a live check.

use rustc_hash::FxHashSet;

use crate::geometry::{in_bounds, rotation_steps};
use crate::pieces::{Brick, Coord};

/// Orientations and empty-grid origins of one brick template.
#[derive(Debug, Clone)]
pub struct PlacementCache {
    /// Distinct normalized orientations, in first-seen order over the 64 step triples.
    rotations: Vec<Brick>,
    /// Origins where at least one orientation fits an empty grid, x-major.
    origins: Vec<Coord>,
    origin_set: FxHashSet<Coord>,
    size: usize,
}

impl PlacementCache {
    /// Computes the cache for `template` in a grid of edge length `size`.
    pub fn build(template: &Brick, size: usize) -> Self {
        let rotations = distinct_orientations(template);

        let mut origins = Vec::new();
        for x in 0..size as i32 {
            for y in 0..size as i32 {
                for z in 0..size as i32 {
                    let origin = (x, y, z);
                    let fits = rotations.iter().any(|orientation| {
                        orientation
                            .cells_at(origin)
                            .is_some_and(|cells| cells.iter().all(|&cell| in_bounds(cell, size)))
                    });
                    if fits {
                        origins.push(origin);
                    }
                }
            }
        }

        log::debug!(
            "placement cache for {}: {} orientations, {} origins (size {})",
            template.name(),
            rotations.len(),
            origins.len(),
            size
        );

        let origin_set = origins.iter().copied().collect();
        Self {
            rotations,
            origins,
            origin_set,
            size,
        }
    }

    pub fn rotations(&self) -> &[Brick] {
        &self.rotations
    }

    pub fn origins(&self) -> &[Coord] {
        &self.origins
    }

    pub fn contains_origin(&self, origin: Coord) -> bool {
        self.origin_set.contains(&origin)
    }

    /// Grid size this cache was computed for.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Rotates `template` by all 64 step triples, normalizes, and drops duplicates.
///
/// Symmetric bricks yield fewer than 24 orientations.
pub fn distinct_orientations(template: &Brick) -> Vec<Brick> {
    let mut seen = FxHashSet::default();
    rotation_steps()
        .map(|(rx, ry, rz)| template.oriented(rx, ry, rz))
        .filter(|orientation| seen.insert(orientation.shape_key()))
        .collect()
}
