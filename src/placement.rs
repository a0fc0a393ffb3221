//! Random fleet placement with a one-cell gap between ships.
//!
//! Each ship gets up to `MAX_PLACEMENT_ATTEMPTS` random draws. If a ship
//! cannot be placed the whole pass is thrown away and started again from
//! the first ship. For the standard 10×10 board and fleet a pass almost
//! always succeeds, but nothing proves that for arbitrary templates, so the
//! number of passes is capped and `PlacementExhausted` is reported instead
//! of looping forever.

use rand::Rng;

use crate::board::Board;
use crate::common::MatchError;
use crate::config::{BOARD_SIZE, MAX_PLACEMENT_ATTEMPTS, MAX_PLACEMENT_PASSES};
use crate::grid::{self, CellSet};
use crate::ship::{compute_coordinates, Fleet, Orientation, Ship, ShipDef};

/// A freshly generated board together with the fleet placed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub board: Board,
    pub fleet: Fleet,
}

/// Generate a complete random layout for `template`.
pub fn place_fleet_randomly<R: Rng + ?Sized>(
    rng: &mut R,
    template: &[ShipDef],
) -> Result<Placement, MatchError> {
    for pass in 0..MAX_PLACEMENT_PASSES {
        if let Some(placement) = placement_pass(rng, template) {
            if pass > 0 {
                log::debug!("random placement succeeded after {} restarts", pass);
            }
            return Ok(placement);
        }
        log::warn!("random placement pass {} exhausted, restarting", pass + 1);
    }
    Err(MatchError::PlacementExhausted)
}

/// One pass over the fleet. Returns `None` as soon as a ship runs out of
/// attempts; nothing from the failed pass survives.
fn placement_pass<R: Rng + ?Sized>(rng: &mut R, template: &[ShipDef]) -> Option<Placement> {
    let mut board = Board::fresh();
    let mut fleet = Fleet::fresh(template);
    let mut occupied = CellSet::new();

    for ship in fleet.ships_mut() {
        if !place_one(rng, ship, &mut board, &mut occupied) {
            return None;
        }
    }
    Some(Placement { board, fleet })
}

fn place_one<R: Rng + ?Sized>(
    rng: &mut R,
    ship: &mut Ship,
    board: &mut Board,
    occupied: &mut CellSet,
) -> bool {
    let n = BOARD_SIZE as usize;
    if ship.size == 0 || ship.size > n {
        return false;
    }
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let orientation = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        // draw the anchor so the run always fits along its axis
        let max_x = if orientation == Orientation::Horizontal {
            n - ship.size
        } else {
            n - 1
        };
        let max_y = if orientation == Orientation::Vertical {
            n - ship.size
        } else {
            n - 1
        };
        let x = rng.random_range(0..=max_x);
        let y = rng.random_range(0..=max_y);
        let coords = compute_coordinates(grid::to_id(x, y), ship.size, orientation);
        if coords.iter().any(|&id| occupied.contains(id)) {
            continue;
        }
        for &id in &coords {
            board.mark_ship(id);
            occupied.insert(id);
            occupied.extend(grid::halo(id));
        }
        ship.place(coords, orientation);
        return true;
    }
    false
}
