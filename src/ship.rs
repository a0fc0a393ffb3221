//! Ship definitions and per-match fleet state.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::config::BOARD_SIZE;
use crate::grid::CellId;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Distance in cell ids between consecutive segments.
    pub fn stride(self) -> usize {
        match self {
            Orientation::Horizontal => 1,
            Orientation::Vertical => BOARD_SIZE as usize,
        }
    }
}

/// Entry of a fleet template: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDef {
    name: &'static str,
    size: usize,
}

impl ShipDef {
    /// Create a new ship definition.
    pub const fn new(name: &'static str, size: usize) -> Self {
        Self { name, size }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Runtime state of one ship during a match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Ship {
    pub name: String,
    pub size: usize,
    pub orientation: Orientation,
    pub placed: bool,
    /// Cell ids covered by the ship, ascending. Empty until placed.
    pub coordinates: Vec<CellId>,
    pub hit_count: usize,
    pub sunk: bool,
}

impl Ship {
    /// An unplaced, undamaged ship built from `def`.
    pub fn new(def: &ShipDef) -> Self {
        Ship {
            name: def.name().to_string(),
            size: def.size(),
            orientation: Orientation::Horizontal,
            placed: false,
            coordinates: Vec::new(),
            hit_count: 0,
            sunk: false,
        }
    }

    /// Put the ship on `coordinates` with `orientation`.
    pub fn place(&mut self, coordinates: Vec<CellId>, orientation: Orientation) {
        self.coordinates = coordinates;
        self.orientation = orientation;
        self.placed = true;
    }

    /// Take the ship off the board, returning the cells it covered.
    pub fn unplace(&mut self) -> Vec<CellId> {
        self.placed = false;
        core::mem::take(&mut self.coordinates)
    }

    /// Returns `true` if the ship covers `id`.
    pub fn occupies(&self, id: CellId) -> bool {
        self.placed && self.coordinates.contains(&id)
    }

    /// Count one more hit. Returns `true` if this hit sank the ship.
    pub fn register_hit(&mut self) -> bool {
        if self.sunk {
            return false;
        }
        self.hit_count += 1;
        self.sunk = self.hit_count >= self.size;
        self.sunk
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.size)
    }
}

/// Ordered collection of ships belonging to one side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    /// Fresh copy of `template`: every ship unplaced, horizontal and intact.
    /// Shares nothing with the template or with any earlier fleet.
    pub fn fresh(template: &[ShipDef]) -> Self {
        Fleet {
            ships: template.iter().map(Ship::new).collect(),
        }
    }

    /// An empty fleet (no ships at all), used for the bot before a match starts.
    pub fn empty() -> Self {
        Fleet { ships: Vec::new() }
    }

    pub fn from_ships(ships: Vec<Ship>) -> Self {
        Fleet { ships }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ships_mut(&mut self) -> &mut [Ship] {
        &mut self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Returns `true` when the fleet has ships and all of them are placed.
    pub fn all_placed(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(|s| s.placed)
    }

    /// Returns `true` when the fleet has ships and all of them are sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(|s| s.sunk)
    }

    /// Index of the ship named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.ships.iter().position(|s| s.name == name)
    }

    /// Index of the placed ship covering `id`.
    pub fn ship_at(&self, id: CellId) -> Option<usize> {
        self.ships.iter().position(|s| s.occupies(id))
    }

    pub fn get(&self, index: usize) -> Option<&Ship> {
        self.ships.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Ship> {
        self.ships.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    pub fn into_ships(self) -> Vec<Ship> {
        self.ships
    }
}

/// Cell ids covered by a run of `size` cells starting at `start`.
///
/// No bounds checking: the caller guarantees the run stays in its row
/// (horizontal) or on the board (vertical).
pub fn compute_coordinates(start: CellId, size: usize, orientation: Orientation) -> Vec<CellId> {
    let stride = orientation.stride();
    (0..size).map(|i| start + i * stride).collect()
}

/// Returns `true` if a run of `size` from `start` stays on the board without
/// wrapping onto another row.
pub fn run_fits(start: CellId, size: usize, orientation: Orientation) -> bool {
    let n = BOARD_SIZE as usize;
    if start >= n * n || size == 0 {
        return false;
    }
    let (x, y) = crate::grid::to_xy(start);
    match orientation {
        Orientation::Horizontal => x + size <= n,
        Orientation::Vertical => y + size <= n,
    }
}
