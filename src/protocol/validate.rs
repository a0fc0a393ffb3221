//! Shape and range checks for payloads received from a peer.
//!
//! These only make sure a payload is well formed. Placement rules (overlap,
//! spacing) are checked by the engine when the match starts.

use std::fmt;

use crate::grid;
use crate::{Board, CellId, CellStatus, Fleet, ShipDef, TOTAL_CELLS};

/// Why a payload was rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Cell id outside `0..TOTAL_CELLS`.
    CellOutOfRange(u64),
    /// Board does not have exactly `TOTAL_CELLS` cells.
    CellCount(usize),
    /// Cell at this index carries the wrong id, coordinates or status.
    MalformedCell(usize),
    /// Fleet does not have one ship per template entry.
    ShipCount { expected: usize, found: usize },
    /// Ship name not in the template, or repeated.
    UnknownShip(String),
    /// Ship size differs from the template.
    ShipSize(String),
    /// Coordinates out of range or inconsistent with `placed`.
    Coordinates(String),
    /// `hit_count`/`sunk` inconsistent.
    Damage(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CellOutOfRange(id) => {
                write!(f, "Cell id {} out of range (0..{})", id, TOTAL_CELLS)
            }
            ValidationError::CellCount(n) => {
                write!(f, "Board must have {} cells, got {}", TOTAL_CELLS, n)
            }
            ValidationError::MalformedCell(i) => write!(f, "Malformed cell at index {}", i),
            ValidationError::ShipCount { expected, found } => {
                write!(f, "Fleet must have {} ships, got {}", expected, found)
            }
            ValidationError::UnknownShip(name) => write!(f, "Unknown or duplicate ship '{}'", name),
            ValidationError::ShipSize(name) => write!(f, "Wrong size for ship '{}'", name),
            ValidationError::Coordinates(name) => write!(f, "Bad coordinates for ship '{}'", name),
            ValidationError::Damage(name) => write!(f, "Inconsistent damage for ship '{}'", name),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a raw cell id from the wire.
pub fn cell_id(raw: u32) -> Result<CellId, ValidationError> {
    let id = raw as usize;
    if id < TOTAL_CELLS {
        Ok(id)
    } else {
        Err(ValidationError::CellOutOfRange(raw as u64))
    }
}

/// Check that a board has one well-formed cell per id, in order.
pub fn board(board: &Board) -> Result<(), ValidationError> {
    let cells = board.cells();
    if cells.len() != TOTAL_CELLS {
        return Err(ValidationError::CellCount(cells.len()));
    }
    for (i, cell) in cells.iter().enumerate() {
        let status_ok = match cell.status {
            CellStatus::Ship | CellStatus::Hit => cell.has_ship,
            CellStatus::Empty | CellStatus::Miss => !cell.has_ship,
        };
        if cell.id != i || (cell.x, cell.y) != grid::to_xy(i) || !status_ok {
            return Err(ValidationError::MalformedCell(i));
        }
    }
    Ok(())
}

/// Check that a fleet matches `template` ship for ship and that each
/// ship's fields agree with each other.
pub fn fleet(fleet: &Fleet, template: &[ShipDef]) -> Result<(), ValidationError> {
    if fleet.len() != template.len() {
        return Err(ValidationError::ShipCount {
            expected: template.len(),
            found: fleet.len(),
        });
    }
    let mut seen = vec![false; template.len()];
    for ship in fleet.iter() {
        let slot = template
            .iter()
            .enumerate()
            .position(|(i, def)| !seen[i] && def.name() == ship.name)
            .ok_or_else(|| ValidationError::UnknownShip(ship.name.clone()))?;
        seen[slot] = true;
        if ship.size != template[slot].size() {
            return Err(ValidationError::ShipSize(ship.name.clone()));
        }
        let coords_ok = if ship.placed {
            ship.coordinates.len() == ship.size
                && ship.coordinates.iter().all(|&id| id < TOTAL_CELLS)
        } else {
            ship.coordinates.is_empty()
        };
        if !coords_ok {
            return Err(ValidationError::Coordinates(ship.name.clone()));
        }
        if ship.hit_count > ship.size || ship.sunk != (ship.hit_count == ship.size) {
            return Err(ValidationError::Damage(ship.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layout, Orientation, SHIPS};

    #[test]
    fn cell_ids() {
        assert_eq!(cell_id(0), Ok(0));
        assert_eq!(cell_id(99), Ok(99));
        assert_eq!(cell_id(100), Err(ValidationError::CellOutOfRange(100)));
    }

    #[test]
    fn board_shape() {
        assert!(board(&Board::fresh()).is_ok());
        assert_eq!(
            board(&Board::empty()),
            Err(ValidationError::CellCount(0))
        );

        let mut cells = Board::fresh().into_cells();
        cells.swap(3, 4);
        assert_eq!(
            board(&Board::from_cells(cells)),
            Err(ValidationError::MalformedCell(3))
        );

        let mut cells = Board::fresh().into_cells();
        cells[7].status = CellStatus::Ship;
        assert_eq!(
            board(&Board::from_cells(cells)),
            Err(ValidationError::MalformedCell(7))
        );
    }

    #[test]
    fn fleet_shape() {
        let mut b = Board::fresh();
        let mut f = Fleet::fresh(&SHIPS);
        assert!(fleet(&f, &SHIPS).is_ok());
        layout::place_ship(&mut b, &mut f, "Carrier", 0, Orientation::Horizontal).unwrap();
        assert!(fleet(&f, &SHIPS).is_ok());

        let mut bad = f.clone();
        bad.ships_mut()[0].name = "Rowboat".to_string();
        assert_eq!(
            fleet(&bad, &SHIPS),
            Err(ValidationError::UnknownShip("Rowboat".to_string()))
        );

        let mut bad = f.clone();
        bad.ships_mut()[1].coordinates.push(120);
        assert!(matches!(fleet(&bad, &SHIPS), Err(ValidationError::Coordinates(_))));

        let mut bad = f.clone();
        bad.ships_mut()[0].hit_count = 5;
        assert!(matches!(fleet(&bad, &SHIPS), Err(ValidationError::Damage(_))));

        let short = Fleet::fresh(&SHIPS[..4]);
        assert_eq!(
            fleet(&short, &SHIPS),
            Err(ValidationError::ShipCount { expected: 5, found: 4 })
        );
    }
}
