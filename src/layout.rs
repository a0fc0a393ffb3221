//! Manual ship placement and layout verification.
//!
//! Ships may not overlap and may not touch, diagonals included. The same
//! spacing rule is used by the random generator in `placement`.

use alloc::string::ToString;
use alloc::vec;

use crate::board::{Board, CellStatus};
use crate::common::{LayoutError, MatchError};
use crate::grid::{self, CellId, CellSet};
use crate::ship::{compute_coordinates, run_fits, Fleet, Orientation, ShipDef};

/// Cells of every placed ship except `skip`, and those cells plus their halos.
fn claimed(fleet: &Fleet, skip: Option<usize>) -> (CellSet, CellSet) {
    let mut cells = CellSet::new();
    let mut buffer = CellSet::new();
    for (i, ship) in fleet.iter().enumerate() {
        if Some(i) == skip || !ship.placed {
            continue;
        }
        for &id in ship.coordinates.iter().filter(|&&id| grid::in_bounds(id)) {
            cells.insert(id);
            buffer.insert(id);
            buffer.extend(grid::halo(id));
        }
    }
    (cells, buffer)
}

fn index_of(fleet: &Fleet, name: &str) -> Result<usize, LayoutError> {
    fleet
        .position(name)
        .ok_or_else(|| LayoutError::UnknownShip(name.to_string()))
}

/// Place (or move) the ship named `name` so its first segment sits on `start`.
pub fn place_ship(
    board: &mut Board,
    fleet: &mut Fleet,
    name: &str,
    start: CellId,
    orientation: Orientation,
) -> Result<(), LayoutError> {
    let index = index_of(fleet, name)?;
    let size = fleet.ships()[index].size;
    if !run_fits(start, size, orientation) {
        return Err(LayoutError::OutOfBounds(name.to_string()));
    }
    let coords = compute_coordinates(start, size, orientation);
    let (cells, buffer) = claimed(fleet, Some(index));
    for &id in &coords {
        if cells.contains(id) {
            return Err(LayoutError::Overlap(id));
        }
        if buffer.contains(id) {
            return Err(LayoutError::Adjacent(id));
        }
    }

    let ship = &mut fleet.ships_mut()[index];
    for id in ship.unplace() {
        board.clear_ship(id);
    }
    for &id in &coords {
        board.mark_ship(id);
    }
    log::debug!("placed {} at {} {:?}", ship.name, grid::Label(start), orientation);
    ship.place(coords, orientation);
    Ok(())
}

/// Take the ship named `name` off the board.
pub fn remove_ship(board: &mut Board, fleet: &mut Fleet, name: &str) -> Result<(), LayoutError> {
    let index = index_of(fleet, name)?;
    for id in fleet.ships_mut()[index].unplace() {
        board.clear_ship(id);
    }
    Ok(())
}

/// Toggle the orientation of the ship named `name`. A placed ship pivots
/// around its first segment and must still satisfy the placement rules.
pub fn rotate(board: &mut Board, fleet: &mut Fleet, name: &str) -> Result<Orientation, LayoutError> {
    let index = index_of(fleet, name)?;
    let ship = &fleet.ships()[index];
    let flipped = ship.orientation.flipped();
    let anchor = if ship.placed {
        ship.coordinates.first().copied()
    } else {
        None
    };
    match anchor {
        Some(start) => place_ship(board, fleet, name, start, flipped)?,
        None => fleet.ships_mut()[index].orientation = flipped,
    }
    Ok(flipped)
}

/// Verify a complete player layout against `template`: one ship per entry
/// with the right size, every ship placed on a straight in-bounds run, no
/// overlap, no contact, and board marks matching the fleet. The layout must
/// also be untouched: no hits on any ship and no shot marks on the board.
pub fn validate(board: &Board, fleet: &Fleet, template: &[ShipDef]) -> Result<(), MatchError> {
    if fleet.len() != template.len() {
        return Err(LayoutError::WrongShipCount {
            expected: template.len(),
            found: fleet.len(),
        }
        .into());
    }
    let mut seen = vec![false; template.len()];
    for ship in fleet.iter() {
        let slot = template
            .iter()
            .enumerate()
            .position(|(i, def)| !seen[i] && def.name() == ship.name)
            .ok_or_else(|| LayoutError::UnknownShip(ship.name.clone()))?;
        seen[slot] = true;
        if ship.size != template[slot].size() {
            return Err(LayoutError::WrongSize {
                name: ship.name.clone(),
                expected: template[slot].size(),
            }
            .into());
        }
        if ship.hit_count != 0 || ship.sunk {
            return Err(LayoutError::Damaged(ship.name.clone()).into());
        }
    }
    if !fleet.all_placed() {
        return Err(MatchError::IncompletePlacement);
    }

    let mut cells = CellSet::new();
    let mut buffer = CellSet::new();
    for ship in fleet.iter() {
        let start = match ship.coordinates.first() {
            Some(&start) if ship.coordinates.len() == ship.size => start,
            _ => return Err(LayoutError::NotContiguous(ship.name.clone()).into()),
        };
        if !run_fits(start, ship.size, ship.orientation) {
            return Err(LayoutError::OutOfBounds(ship.name.clone()).into());
        }
        if ship.coordinates != compute_coordinates(start, ship.size, ship.orientation) {
            return Err(LayoutError::NotContiguous(ship.name.clone()).into());
        }
        for &id in &ship.coordinates {
            if cells.contains(id) {
                return Err(LayoutError::Overlap(id).into());
            }
            if buffer.contains(id) {
                return Err(LayoutError::Adjacent(id).into());
            }
        }
        for &id in &ship.coordinates {
            cells.insert(id);
            buffer.insert(id);
            buffer.extend(grid::halo(id));
        }
    }

    for id in 0..crate::config::TOTAL_CELLS {
        let cell = match board.cell(id) {
            Some(cell) if cell.id == id && cell.has_ship == cells.contains(id) => cell,
            _ => return Err(LayoutError::BoardMismatch(id).into()),
        };
        match (cell.status, cell.has_ship) {
            (CellStatus::Ship, true) | (CellStatus::Empty, false) => {}
            (CellStatus::Hit, _) | (CellStatus::Miss, _) => {
                return Err(LayoutError::AlreadyShot(id).into())
            }
            _ => return Err(LayoutError::BoardMismatch(id).into()),
        }
    }
    Ok(())
}
