//! Exhaustive placement enumeration with adjacency filters.
//!
//! Every (rx, ry, rz) step triple is tried at every grid origin against the
//! live grid. Results are deduplicated by the absolute set of occupied cells,
//! so distinct rotation parameters that land on the same cells are reported
//! once, for the first triple that reached them.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::geometry::{rotation_steps, translate, FACE_NEIGHBORS};
use crate::grid::{VoxelGrid, EMPTY};
use crate::pieces::{Brick, Coord, PlacementId, ShapeKey, BRICK_CUBES};

/// Filters applied to enumerated placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Keep only placements with at least one occupied face neighbour.
    pub only_adjacent: bool,
    /// Minimum number of distinct placements that must be face neighbours.
    ///
    /// Values of 2 or more ask for placements bridging separate structures.
    pub min_distinct_neighbors: usize,
}

impl SearchOptions {
    /// No adjacency requirement.
    pub const fn anywhere() -> Self {
        Self {
            only_adjacent: false,
            min_distinct_neighbors: 0,
        }
    }

    /// At least one occupied face neighbour.
    pub const fn adjacent() -> Self {
        Self {
            only_adjacent: true,
            min_distinct_neighbors: 0,
        }
    }

    /// Face neighbours from at least `min_distinct` different placements.
    pub const fn between(min_distinct: usize) -> Self {
        Self {
            only_adjacent: true,
            min_distinct_neighbors: min_distinct,
        }
    }

    /// Number of distinct neighbouring placements a result needs.
    fn required_neighbors(&self) -> usize {
        self.min_distinct_neighbors.max(usize::from(self.only_adjacent))
    }
}

/// One placement found by the search.
#[derive(Debug, Clone)]
pub struct FoundPlacement {
    /// Grid origin of the oriented brick.
    pub origin: Coord,
    /// Step triple that produced the orientation.
    pub rotation: (i32, i32, i32),
    /// The rotated and normalized brick.
    pub brick: Brick,
    /// Absolute cells, sorted.
    pub cells: ShapeKey,
}

/// Enumerates placements of `template` in the current grid.
///
/// Stops after `max_results` placements when given.
pub fn find_placements(
    grid: &VoxelGrid,
    template: &Brick,
    options: SearchOptions,
    max_results: Option<usize>,
) -> Vec<FoundPlacement> {
    let size = grid.size() as i32;
    let required = options.required_neighbors();
    let limit = max_results.unwrap_or(usize::MAX);

    let mut found = Vec::new();
    let mut seen: FxHashSet<ShapeKey> = FxHashSet::default();
    let mut seen_orientations: FxHashSet<ShapeKey> = FxHashSet::default();

    for rotation @ (rx, ry, rz) in rotation_steps() {
        let brick = template.oriented(rx, ry, rz);
        // a repeated orientation can only reproduce cell sets already seen
        if !seen_orientations.insert(brick.shape_key()) {
            continue;
        }

        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    if found.len() >= limit {
                        return found;
                    }

                    let origin = (x, y, z);
                    if !grid.can_place(&brick, origin) {
                        continue;
                    }
                    let Some(mut cells) = brick.cells_at(origin) else {
                        continue;
                    };
                    cells.sort_unstable();
                    if !seen.insert(cells) {
                        continue;
                    }

                    if required > 0 && distinct_neighbors(grid, &cells).len() < required {
                        continue;
                    }

                    found.push(FoundPlacement {
                        origin,
                        rotation,
                        brick: brick.clone(),
                        cells,
                    });
                }
            }
        }
    }

    log::debug!(
        "search for {} ({:?}) found {} placements",
        template.name(),
        options,
        found.len()
    );
    found
}

/// Returns true if `template` fits somewhere touching `min_distinct` different placements.
pub fn can_place_between(grid: &VoxelGrid, template: &Brick, min_distinct: usize) -> bool {
    !find_placements(grid, template, SearchOptions::between(min_distinct), Some(1)).is_empty()
}

/// Places `template` at a placement drawn uniformly from those matching `options`.
///
/// Returns the new id with the chosen placement, or `None` with the grid
/// unchanged when nothing matches.
pub fn place_random<R: Rng + ?Sized>(
    grid: &mut VoxelGrid,
    template: &Brick,
    options: SearchOptions,
    rng: &mut R,
) -> Result<Option<(PlacementId, FoundPlacement)>> {
    let found = find_placements(grid, template, options, None);
    let Some(choice) = found.choose(rng) else {
        log::debug!("no {} placement matches {:?}", template.name(), options);
        return Ok(None);
    };
    let id = grid.place(choice.brick.clone(), choice.origin)?;
    Ok(Some((id, choice.clone())))
}

/// Ids of the placements that own an in-bounds face neighbour of `cells`.
///
/// Cells of the candidate itself are empty in the grid, so they never count.
pub fn distinct_neighbors(grid: &VoxelGrid, cells: &[Coord; BRICK_CUBES]) -> FxHashSet<PlacementId> {
    cells
        .iter()
        .flat_map(|&cell| FACE_NEIGHBORS.iter().filter_map(move |&offset| translate(cell, offset)))
        .filter_map(|neighbor| grid.cell(neighbor))
        .filter(|&owner| owner != EMPTY)
        .collect()
}

/// Summary of how a template fits the current grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No empty cell left.
    Complete,
    Open {
        /// Number of empty cells.
        empty: usize,
        /// Number of (orientation, origin) pairs from `validate_placements`.
        valid: usize,
        /// Negation of `cannot_place_somewhere`.
        placeable: bool,
    },
}

/// Computes the fill indicator for `template`.
pub fn status(grid: &VoxelGrid, template: &Brick) -> Status {
    let empty = grid.num_empty();
    if empty == 0 {
        return Status::Complete;
    }
    Status::Open {
        empty,
        valid: grid.validate_placements(template).len(),
        placeable: !grid.cannot_place_somewhere(template),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template(grid: &VoxelGrid, name: &str) -> Brick {
        grid.template(name).cloned().expect("template exists")
    }

    #[test]
    fn test_o_in_size_two_has_six_placements() {
        let grid = VoxelGrid::new(2);
        let o = template(&grid, "O");
        let found = find_placements(&grid, &o, SearchOptions::anywhere(), None);
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn test_results_never_share_cells() {
        let mut grid = VoxelGrid::new(4);
        grid.place(template(&grid, "T"), (0, 0, 0)).expect("T fits");
        let found = find_placements(&grid, &template(&grid, "L"), SearchOptions::anywhere(), None);
        let distinct: FxHashSet<ShapeKey> = found.iter().map(|p| p.cells).collect();
        assert_eq!(distinct.len(), found.len());
        for placement in &found {
            assert!(grid.can_place(&placement.brick, placement.origin));
            assert_eq!(placement.brick, template(&grid, "L").oriented(
                placement.rotation.0,
                placement.rotation.1,
                placement.rotation.2,
            ));
        }
    }

    #[test]
    fn test_adjacent_on_empty_grid_is_empty() {
        let grid = VoxelGrid::new(6);
        let t = template(&grid, "T");
        assert!(find_placements(&grid, &t, SearchOptions::adjacent(), None).is_empty());
        assert!(!can_place_between(&grid, &t, 2));
    }

    #[test]
    fn test_adjacent_requires_touching() {
        let mut grid = VoxelGrid::new(2);
        let o = template(&grid, "O");
        grid.place(o.clone(), (0, 0, 0)).expect("bottom layer");

        let found = find_placements(&grid, &o, SearchOptions::adjacent(), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cells, [(0, 0, 1), (0, 1, 1), (1, 0, 1), (1, 1, 1)]);
    }

    #[test]
    fn test_between_two_rows() {
        let mut grid = VoxelGrid::new(4);
        let i = template(&grid, "I");
        grid.place(i.clone(), (0, 0, 0)).expect("front row");
        grid.place(i.clone(), (0, 2, 0)).expect("back row");

        let between = find_placements(&grid, &i, SearchOptions::between(2), None);
        // the middle row, four columns rising from it, four lying across the rows
        assert_eq!(between.len(), 9);
        for placement in &between {
            assert!(distinct_neighbors(&grid, &placement.cells).len() >= 2);
        }
        assert!(can_place_between(&grid, &i, 2));
        assert!(!can_place_between(&grid, &i, 3));

        let touching = find_placements(&grid, &i, SearchOptions::adjacent(), None);
        assert!(touching.len() > between.len());
    }

    #[test]
    fn test_max_results_stops_early() {
        let grid = VoxelGrid::new(6);
        let t = template(&grid, "T");
        let found = find_placements(&grid, &t, SearchOptions::anywhere(), Some(5));
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_random_adjacent_fills_the_only_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = VoxelGrid::new(2);
        let o = template(&grid, "O");

        let none = place_random(&mut grid, &o, SearchOptions::adjacent(), &mut rng).expect("search");
        assert!(none.is_none());
        assert_eq!(grid.num_empty(), 8);
        assert_eq!(grid.next_id(), 1);

        grid.place(o.clone(), (0, 0, 0)).expect("bottom layer");
        let (id, placed) = place_random(&mut grid, &o, SearchOptions::adjacent(), &mut rng)
            .expect("search")
            .expect("top layer is free");
        assert_eq!(id, 2);
        assert_eq!(placed.cells, [(0, 0, 1), (0, 1, 1), (1, 0, 1), (1, 1, 1)]);
        assert_eq!(status(&grid, &o), Status::Complete);
    }

    #[test]
    fn test_random_adjacent_touches_existing_bricks() {
        let mut grid = VoxelGrid::new(6);
        let t = template(&grid, "T");
        grid.place(t.clone(), (2, 2, 2)).expect("T fits");
        let candidates = find_placements(&grid, &t, SearchOptions::adjacent(), None);

        for seed in 0..8 {
            let mut copy = grid.clone();
            let mut rng = StdRng::seed_from_u64(seed);
            let (id, placed) = place_random(&mut copy, &t, SearchOptions::adjacent(), &mut rng)
                .expect("search")
                .expect("T fits next to T");
            assert_eq!(id, 2);
            assert!(candidates.iter().any(|c| c.cells == placed.cells));
            assert!(distinct_neighbors(&grid, &placed.cells).contains(&1));
            for cell in placed.cells {
                assert_eq!(copy.cell(cell), Some(2));
            }
        }

        let pick = |seed| {
            let mut copy = grid.clone();
            place_random(&mut copy, &t, SearchOptions::adjacent(), &mut StdRng::seed_from_u64(seed))
                .expect("search")
                .map(|(_, placed)| placed.cells)
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn test_status() {
        let mut grid = VoxelGrid::new(2);
        let o = template(&grid, "O");
        assert!(matches!(
            status(&grid, &o),
            Status::Open { empty: 8, placeable: true, .. }
        ));

        grid.place(o.clone(), (0, 0, 0)).expect("bottom layer");
        grid.place(o.clone(), (0, 0, 1)).expect("top layer");
        assert_eq!(status(&grid, &o), Status::Complete);
    }
}
