//! Brick definitions and coordinate types.
//!
//! A brick is a rigid shape of exactly four unit cubes given relative to its
//! own origin. Bricks are values: rotating or normalizing returns a new brick.

use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::geometry::{normalize_to_origin, rotate, translate};

/// A 3D coordinate, either brick-local or absolute within the grid.
pub type Coord = (i32, i32, i32);

/// Identifier of one placed brick. `0` marks an empty cell.
pub type PlacementId = u32;

/// Number of cubes in every brick.
pub const BRICK_CUBES: usize = 4;

/// Canonical, order-independent form of a brick's cube set.
pub type ShapeKey = [Coord; BRICK_CUBES];

/// The default brick templates with their canonical relative coordinates.
pub const TEMPLATES: &[(&str, [Coord; BRICK_CUBES])] = &[
    // T-shape
    ("T", [(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 1, 0)]),
    // straight line of four
    ("I", [(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0)]),
    // three in a line plus one at the end
    ("L", [(0, 0, 0), (1, 0, 0), (2, 0, 0), (2, 1, 0)]),
    // flat 2x2 square
    ("O", [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)]),
    // small 3D hook
    ("S3D", [(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 1, 1)]),
];

/// A four-cube shape with a name tag.
///
/// Equality and hashing ignore the name and the cube order: two bricks are
/// equal when their cube sets are identical. Cubes are neither required to be
/// distinct nor face-connected.
#[derive(Debug, Clone)]
pub struct Brick {
    name: String,
    cubes: [Coord; BRICK_CUBES],
}

impl Brick {
    /// Builds a brick from exactly four cubes. An empty name becomes `"brick"`.
    pub fn new(name: impl Into<String>, cubes: &[Coord]) -> Result<Self> {
        let cubes: [Coord; BRICK_CUBES] = cubes
            .try_into()
            .map_err(|_| Error::MalformedBrick(cubes.len()))?;
        let mut name = name.into();
        if name.is_empty() {
            name = "brick".to_owned();
        }
        Ok(Self { name, cubes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cubes(&self) -> &[Coord; BRICK_CUBES] {
        &self.cubes
    }

    /// Returns a copy with every cube rotated by the given quarter-turn steps.
    pub fn rotated(&self, rx: i32, ry: i32, rz: i32) -> Self {
        Self {
            name: self.name.clone(),
            cubes: self.cubes.map(|cube| rotate(cube, rx, ry, rz)),
        }
    }

    /// Returns a copy shifted so the minimum coordinate on each axis is zero.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.clone(),
            cubes: normalize_to_origin(self.cubes),
        }
    }

    /// Shorthand for `rotated(rx, ry, rz).normalized()`.
    pub fn oriented(&self, rx: i32, ry: i32, rz: i32) -> Self {
        self.rotated(rx, ry, rz).normalized()
    }

    /// The sorted cube tuple used for equality and hashing.
    pub fn shape_key(&self) -> ShapeKey {
        let mut key = self.cubes;
        key.sort_unstable();
        key
    }

    /// Absolute cells covered when this brick's origin sits at `position`.
    ///
    /// Returns `None` if a cell falls outside the `i32` coordinate range.
    pub fn cells_at(&self, position: Coord) -> Option<[Coord; BRICK_CUBES]> {
        let mut cells = self.cubes;
        for cell in &mut cells {
            *cell = translate(position, *cell)?;
        }
        Some(cells)
    }
}

impl PartialEq for Brick {
    fn eq(&self, other: &Self) -> bool {
        self.shape_key() == other.shape_key()
    }
}

impl Eq for Brick {}

impl Hash for Brick {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape_key().hash(state);
    }
}

/// Returns the five default brick templates in their canonical order.
pub fn default_bricks() -> Vec<Brick> {
    TEMPLATES
        .iter()
        .map(|(name, cubes)| Brick {
            name: (*name).to_owned(),
            cubes: *cubes,
        })
        .collect()
}

/// A brick registered in the grid with its absolute origin.
///
/// The covered cells are computed once, so a placement always describes
/// representable coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    id: PlacementId,
    brick: Brick,
    position: Coord,
    cells: [Coord; BRICK_CUBES],
}

impl Placement {
    /// Returns `None` if `brick` at `position` leaves the coordinate range.
    pub fn new(id: PlacementId, brick: Brick, position: Coord) -> Option<Self> {
        let cells = brick.cells_at(position)?;
        Some(Self {
            id,
            brick,
            position,
            cells,
        })
    }

    pub fn id(&self) -> PlacementId {
        self.id
    }

    pub fn brick(&self) -> &Brick {
        &self.brick
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    /// Absolute cells owned by this placement.
    #[inline]
    pub fn cells(&self) -> [Coord; BRICK_CUBES] {
        self.cells
    }

    /// The same placement shifted to `position`.
    pub fn moved_to(&self, position: Coord) -> Option<Self> {
        Self::new(self.id, self.brick.clone(), position)
    }
}
