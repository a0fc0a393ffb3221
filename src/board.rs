//! One side's 10×10 ocean: cell contents and shot marks.

use alloc::vec::Vec;
use core::fmt;

use crate::common::MatchError;
use crate::config::{BOARD_SIZE, TOTAL_CELLS};
use crate::grid::{self, CellId};

/// What a cell currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum CellStatus {
    #[default]
    Empty,
    Ship,
    Hit,
    Miss,
}

impl CellStatus {
    /// `true` once a shot has landed here.
    pub fn is_resolved(self) -> bool {
        matches!(self, CellStatus::Hit | CellStatus::Miss)
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Cell {
    pub id: CellId,
    pub x: usize,
    pub y: usize,
    pub has_ship: bool,
    pub status: CellStatus,
}

impl Cell {
    /// Empty water at `id`.
    pub fn empty(id: CellId) -> Self {
        let (x, y) = grid::to_xy(id);
        Cell {
            id,
            x,
            y,
            has_ship: false,
            status: CellStatus::Empty,
        }
    }
}

/// Ordered sequence of exactly `TOTAL_CELLS` cells, indexed by id.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// An all-water board.
    pub fn fresh() -> Self {
        Board {
            cells: (0..TOTAL_CELLS).map(Cell::empty).collect(),
        }
    }

    /// A board with no cells, held by the bot until a match starts.
    pub fn empty() -> Self {
        Board { cells: Vec::new() }
    }

    /// Wrap raw cells without checking them. Boundary code validates first.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Board { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Returns `true` if the board has no cells yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Put a ship segment on `id`.
    pub fn mark_ship(&mut self, id: CellId) {
        if let Some(cell) = self.cells.get_mut(id) {
            cell.has_ship = true;
            cell.status = CellStatus::Ship;
        }
    }

    /// Remove a ship segment from `id`, leaving open water.
    pub fn clear_ship(&mut self, id: CellId) {
        if let Some(cell) = self.cells.get_mut(id) {
            cell.has_ship = false;
            cell.status = CellStatus::Empty;
        }
    }

    /// Resolve a shot at `id`: `Hit` when a ship is there, otherwise `Miss`.
    /// A cell already hit or missed is never re-resolved.
    pub fn resolve(&mut self, id: CellId) -> Result<Cell, MatchError> {
        let cell = self.cells.get_mut(id).ok_or(MatchError::InvalidCell(id))?;
        if cell.status.is_resolved() {
            return Err(MatchError::AlreadyResolved);
        }
        cell.status = if cell.has_ship {
            CellStatus::Hit
        } else {
            CellStatus::Miss
        };
        Ok(*cell)
    }

    /// Ids of cells no shot has reached yet.
    pub fn unresolved(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .filter(|c| !c.status.is_resolved())
            .map(|c| c.id)
    }

    /// Opponent's view: intact ship segments are shown as open water.
    pub fn masked(&self) -> Board {
        let cells = self
            .cells
            .iter()
            .map(|c| {
                if c.status.is_resolved() {
                    *c
                } else {
                    Cell::empty(c.id)
                }
            })
            .collect();
        Board { cells }
    }

    /// Number of cells currently holding a ship segment.
    pub fn ship_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.has_ship).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::fresh()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cells.len() != TOTAL_CELLS {
            return write!(f, "Board {{ cells: {} }}", self.cells.len());
        }
        writeln!(f, "Board {{")?;
        for row in self.cells.chunks(BOARD_SIZE as usize) {
            f.write_str("  ")?;
            for cell in row {
                let ch = match cell.status {
                    CellStatus::Empty => '.',
                    CellStatus::Ship => 'S',
                    CellStatus::Hit => 'X',
                    CellStatus::Miss => 'o',
                };
                write!(f, "{}", ch)?;
            }
            f.write_str("\n")?;
        }
        f.write_str("}")
    }
}
