//! Fixed-size grid geometry and a bitmask set of cell ids.
//!
//! Cells are numbered row-major: `id = y * BOARD_SIZE + x`. Everything here
//! is pure and allocation free.

use core::fmt;

use crate::config::{BOARD_SIZE, TOTAL_CELLS};

/// Linear index of a cell, `0..TOTAL_CELLS`.
pub type CellId = usize;

const SIZE: isize = BOARD_SIZE as isize;

/// Up, right, down, left.
const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Split a cell id into `(x, y)`.
#[inline]
pub fn to_xy(id: CellId) -> (usize, usize) {
    debug_assert!(id < TOTAL_CELLS);
    (id % BOARD_SIZE as usize, id / BOARD_SIZE as usize)
}

/// Join `(x, y)` into a cell id.
#[inline]
pub fn to_id(x: usize, y: usize) -> CellId {
    debug_assert!(x < BOARD_SIZE as usize && y < BOARD_SIZE as usize);
    y * BOARD_SIZE as usize + x
}

/// Returns `true` if `id` addresses a cell on the board.
#[inline]
pub fn in_bounds(id: CellId) -> bool {
    id < TOTAL_CELLS
}

fn offsets(
    id: CellId,
    deltas: &'static [(isize, isize)],
) -> impl Iterator<Item = CellId> {
    let (x, y) = to_xy(id);
    let (x, y) = (x as isize, y as isize);
    deltas.iter().filter_map(move |&(dx, dy)| {
        let (nx, ny) = (x + dx, y + dy);
        if (0..SIZE).contains(&nx) && (0..SIZE).contains(&ny) {
            Some(to_id(nx as usize, ny as usize))
        } else {
            None
        }
    })
}

/// In-bounds orthogonal neighbours of `id`, in up/right/down/left order.
pub fn neighbors4(id: CellId) -> impl Iterator<Item = CellId> {
    offsets(id, &ORTHOGONAL)
}

/// In-bounds cells surrounding `id`, diagonals included. The cell itself is
/// not part of its halo.
pub fn halo(id: CellId) -> impl Iterator<Item = CellId> {
    offsets(id, &SURROUNDING)
}

/// Display adapter rendering a cell as column letter + row number (`B7`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label(pub CellId);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = to_xy(self.0);
        write!(f, "{}{}", (b'A' + x as u8) as char, y + 1)
    }
}

/// Parse `B7`-style notation (case-insensitive) into a cell id.
pub fn parse_label(input: &str) -> Option<CellId> {
    let input = input.trim();
    let mut chars = input.chars();
    let col = chars.next()?.to_ascii_uppercase();
    if !col.is_ascii_uppercase() {
        return None;
    }
    let x = (col as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if x >= BOARD_SIZE as usize || row == 0 || row > BOARD_SIZE as usize {
        return None;
    }
    Some(to_id(x, row - 1))
}

/// Set of cell ids packed into a single `u128`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        CellSet { bits: 0 }
    }

    /// Insert `id`; returns `true` if it was not already present.
    pub fn insert(&mut self, id: CellId) -> bool {
        if !in_bounds(id) {
            return false;
        }
        let fresh = !self.contains(id);
        self.bits |= 1u128 << id;
        fresh
    }

    /// Remove `id`; returns `true` if it was present.
    pub fn remove(&mut self, id: CellId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.bits &= !(1u128 << id);
        true
    }

    pub fn contains(&self, id: CellId) -> bool {
        in_bounds(id) && (self.bits >> id) & 1 == 1
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Returns `true` if the two sets share any cell.
    pub fn intersects(&self, other: &CellSet) -> bool {
        self.bits & other.bits != 0
    }

    /// Ids in the set, ascending.
    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..TOTAL_CELLS).filter(move |&id| self.contains(id))
    }
}

impl FromIterator<CellId> for CellSet {
    fn from_iter<I: IntoIterator<Item = CellId>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl Extend<CellId> for CellSet {
    fn extend<I: IntoIterator<Item = CellId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
