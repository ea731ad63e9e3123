//! Error types for the brick engine.

use thiserror::Error;

use crate::pieces::{Coord, PlacementId};

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by grid mutations, brick construction and persistence.
///
/// A failing operation never leaves the grid partially modified.
#[derive(Debug, Error)]
pub enum Error {
    /// The brick would leave the grid or overlap another placement.
    #[error("brick does not fit at {position:?} (out of bounds or overlap)")]
    InvalidPlacement { position: Coord },

    /// No placement with this id is registered.
    #[error("placement id {0} not found")]
    UnknownId(PlacementId),

    /// Every placement id has been handed out; `clear` starts over.
    #[error("no placement ids left")]
    IdsExhausted,

    /// A brick was built from the wrong number of cubes.
    #[error("each brick must consist of exactly 4 cubes, got {0}")]
    MalformedBrick(usize),

    /// A persisted snapshot is missing fields or describes an impossible grid.
    #[error("malformed state: {0}")]
    MalformedState(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
