// Hunt-and-target shot selection for the scripted opponent.
// Random search until something is hit, then work through the orthogonal
// neighbours of each live hit in FIFO order until the ship sinks.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use rand::Rng;

use crate::board::Board;
use crate::common::ShotOutcome;
use crate::grid::{self, CellId, CellSet};

/// Everything the bot remembers about its shots during one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotMemory {
    tried: CellSet,
    queue: VecDeque<CellId>,
}

impl BotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; called whenever a new match starts.
    pub fn reset(&mut self) {
        self.tried.clear();
        self.queue.clear();
    }

    /// Cells the bot has already fired at.
    pub fn tried(&self) -> &CellSet {
        &self.tried
    }

    /// Pending target-mode cells, front first.
    pub fn queue(&self) -> &VecDeque<CellId> {
        &self.queue
    }

    /// `true` while there is a live contact to expand around.
    pub fn is_targeting(&self) -> bool {
        self.queue.iter().any(|&id| !self.tried.contains(id))
    }

    /// Pick the next cell to fire at on `board`.
    ///
    /// Queued cells come first, stale entries are dropped. With nothing
    /// queued, a cell is drawn uniformly from those neither tried nor already
    /// resolved. Returns `None` only when no such cell exists.
    pub fn select_target<R: Rng + ?Sized>(&mut self, rng: &mut R, board: &Board) -> Option<CellId> {
        while let Some(id) = self.queue.pop_front() {
            if !self.tried.contains(id) {
                log::debug!("bot targeting {}", grid::Label(id));
                return Some(id);
            }
        }
        let candidates: Vec<CellId> = board
            .unresolved()
            .filter(|&id| !self.tried.contains(id))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let id = candidates[rng.random_range(0..candidates.len())];
        log::debug!("bot hunting {}", grid::Label(id));
        Some(id)
    }

    /// Feed back the outcome of the shot at `id`.
    pub fn record(&mut self, id: CellId, outcome: ShotOutcome) {
        self.tried.insert(id);
        match outcome {
            ShotOutcome::Sunk => self.queue.clear(),
            ShotOutcome::Hit => {
                for next in grid::neighbors4(id) {
                    if !self.tried.contains(next) && !self.queue.contains(&next) {
                        self.queue.push_back(next);
                    }
                }
            }
            ShotOutcome::Miss => {}
        }
    }
}
