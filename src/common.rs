//! Common types for the match engine: shot outcomes and errors.

use alloc::string::String;
use core::fmt;

use crate::grid::{CellId, Label};

/// Result of a shot that was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum ShotOutcome {
    /// Shot landed in open water.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot hit the last intact segment of a ship.
    Sunk,
}

/// Why a submitted or generated layout is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Fleet does not have one ship per template entry.
    WrongShipCount { expected: usize, found: usize },
    /// Ship name is not part of the template, or appears twice.
    UnknownShip(String),
    /// Ship size disagrees with the template.
    WrongSize { name: String, expected: usize },
    /// Ship run leaves the board or wraps onto another row.
    OutOfBounds(String),
    /// Coordinates are not a straight, gap-free run matching the orientation.
    NotContiguous(String),
    /// Two ships share a cell.
    Overlap(CellId),
    /// Two ships touch, orthogonally or diagonally.
    Adjacent(CellId),
    /// Board ship marks do not match the fleet's coordinates.
    BoardMismatch(CellId),
    /// Ship already carries hits or is marked sunk before play.
    Damaged(String),
    /// Cell was already shot at before play.
    AlreadyShot(CellId),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::WrongShipCount { expected, found } => {
                write!(f, "Expected {} ships, found {}", expected, found)
            }
            LayoutError::UnknownShip(name) => write!(f, "Unknown or duplicate ship '{}'", name),
            LayoutError::WrongSize { name, expected } => {
                write!(f, "Ship '{}' must have size {}", name, expected)
            }
            LayoutError::OutOfBounds(name) => write!(f, "Ship '{}' does not fit on the board", name),
            LayoutError::NotContiguous(name) => {
                write!(f, "Ship '{}' is not a straight contiguous run", name)
            }
            LayoutError::Overlap(id) => write!(f, "Ships overlap at {}", Label(*id)),
            LayoutError::Adjacent(id) => write!(f, "Ships touch at {}", Label(*id)),
            LayoutError::BoardMismatch(id) => {
                write!(f, "Board and fleet disagree at {}", Label(*id))
            }
            LayoutError::Damaged(name) => write!(f, "Ship '{}' is already damaged", name),
            LayoutError::AlreadyShot(id) => write!(f, "Cell {} was already shot at", Label(*id)),
        }
    }
}

/// Recoverable outcomes reported by match operations. None of them is fatal:
/// the match state is left untouched and play may continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Operation attempted outside its phase or out of turn.
    InvalidTurn,
    /// Cell was already hit or missed.
    AlreadyResolved,
    /// `start` called before every player ship is placed.
    IncompletePlacement,
    /// Random placement could not find a layout within its pass budget.
    PlacementExhausted,
    /// Player layout breaks a placement rule.
    InvalidLayout(LayoutError),
    /// Cell id is not on the board.
    InvalidCell(CellId),
}

impl From<LayoutError> for MatchError {
    fn from(err: LayoutError) -> Self {
        MatchError::InvalidLayout(err)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::InvalidTurn => write!(f, "Not allowed in the current phase or turn"),
            MatchError::AlreadyResolved => write!(f, "Cell was already shot at"),
            MatchError::IncompletePlacement => write!(f, "All ships must be placed first"),
            MatchError::PlacementExhausted => write!(f, "Unable to place ships randomly"),
            MatchError::InvalidLayout(e) => write!(f, "Invalid layout: {}", e),
            MatchError::InvalidCell(id) => write!(f, "Cell {} is out of range", id),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}
