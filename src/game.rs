use alloc::vec::Vec;
use rand::Rng;

use crate::{
    board::{Board, Cell},
    bot::BotMemory,
    common::{LayoutError, MatchError, ShotOutcome},
    config::{SHIPS, TOTAL_CELLS},
    grid::{CellId, Label},
    layout,
    placement::{self, Placement},
    ship::{Fleet, Orientation, Ship, ShipDef},
};

/// Lifecycle of a match. `Finished` is terminal until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Phase {
    Setup,
    Playing,
    Finished,
}

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Side {
    Player,
    Bot,
}

/// Phase, turn and winner of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub phase: Phase,
    pub turn: Side,
    pub winner: Option<Side>,
}

impl MatchState {
    /// Setup phase, player to move, no winner.
    pub const fn new() -> Self {
        MatchState {
            phase: Phase::Setup,
            turn: Side::Player,
            winner: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

impl Default for MatchState {
    fn default() -> Self {
        MatchState::new()
    }
}

/// What a single resolved shot did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct ShotReport {
    /// The target cell after resolution.
    pub cell: Cell,
    pub outcome: ShotOutcome,
    /// The ship this shot sank, if any.
    pub sunk_ship: Option<Ship>,
    pub game_finished: bool,
    pub state: MatchState,
}

/// One match between the human player and the bot.
///
/// Owns both boards, both fleets, the match state and the bot's memory.
/// Randomness is always supplied by the caller so matches can be replayed
/// from a seed. The engine does no locking: callers serialize access.
pub struct GameEngine {
    template: Vec<ShipDef>,
    player_board: Board,
    player_fleet: Fleet,
    bot_board: Board,
    bot_fleet: Fleet,
    state: MatchState,
    bot: BotMemory,
}

impl GameEngine {
    /// A match in setup using the standard fleet.
    pub fn new() -> Self {
        Self::with_template(&SHIPS)
    }

    /// A match in setup using a custom fleet template.
    pub fn with_template(template: &[ShipDef]) -> Self {
        GameEngine {
            template: template.to_vec(),
            player_board: Board::fresh(),
            player_fleet: Fleet::fresh(template),
            bot_board: Board::empty(),
            bot_fleet: Fleet::empty(),
            state: MatchState::new(),
            bot: BotMemory::new(),
        }
    }

    pub fn template(&self) -> &[ShipDef] {
        &self.template
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn player_fleet(&self) -> &Fleet {
        &self.player_fleet
    }

    /// The bot's board as the player may see it: only shot cells revealed.
    pub fn bot_view(&self) -> Board {
        self.bot_board.masked()
    }

    /// Full bot board, ship positions included.
    pub fn bot_board(&self) -> &Board {
        &self.bot_board
    }

    pub fn bot_fleet(&self) -> &Fleet {
        &self.bot_fleet
    }

    pub fn bot_memory(&self) -> &BotMemory {
        &self.bot
    }

    /// Discard the whole match and return to setup with an empty player
    /// layout. Returns copies of the fresh player board and fleet.
    pub fn reset(&mut self) -> Placement {
        self.player_board = Board::fresh();
        self.player_fleet = Fleet::fresh(&self.template);
        self.bot_board = Board::empty();
        self.bot_fleet = Fleet::empty();
        self.state = MatchState::new();
        self.bot.reset();
        log::debug!("match reset");
        Placement {
            board: self.player_board.clone(),
            fleet: self.player_fleet.clone(),
        }
    }

    /// Replace the player's board. Not validated until `start`.
    pub fn adopt_player_board(&mut self, board: Board) {
        self.player_board = board;
    }

    /// Replace the player's fleet. Not validated until `start`.
    pub fn adopt_player_fleet(&mut self, fleet: Fleet) {
        self.player_fleet = fleet;
    }

    /// Generate a random layout for the current template without touching
    /// the match.
    pub fn randomize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Placement, MatchError> {
        placement::place_fleet_randomly(rng, &self.template)
    }

    fn require_setup(&self) -> Result<(), MatchError> {
        if self.state.phase == Phase::Setup {
            Ok(())
        } else {
            Err(MatchError::InvalidTurn)
        }
    }

    /// Place or move one of the player's ships during setup.
    pub fn place_ship(
        &mut self,
        name: &str,
        start: CellId,
        orientation: Orientation,
    ) -> Result<(), MatchError> {
        self.require_setup()?;
        layout::place_ship(
            &mut self.player_board,
            &mut self.player_fleet,
            name,
            start,
            orientation,
        )?;
        Ok(())
    }

    /// Toggle the orientation of one of the player's ships during setup.
    pub fn rotate_ship(&mut self, name: &str) -> Result<Orientation, MatchError> {
        self.require_setup()?;
        Ok(layout::rotate(
            &mut self.player_board,
            &mut self.player_fleet,
            name,
        )?)
    }

    /// Take one of the player's ships off the board during setup.
    pub fn remove_ship(&mut self, name: &str) -> Result<(), MatchError> {
        self.require_setup()?;
        layout::remove_ship(&mut self.player_board, &mut self.player_fleet, name)?;
        Ok(())
    }

    /// Begin play: verify the player's layout, lay out the bot's fleet and
    /// hand the first move to the player.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MatchState, MatchError> {
        self.require_setup()?;
        layout::validate(&self.player_board, &self.player_fleet, &self.template)?;
        let Placement { board, fleet } = placement::place_fleet_randomly(rng, &self.template)?;
        self.bot_board = board;
        self.bot_fleet = fleet;
        self.bot.reset();
        self.state = MatchState {
            phase: Phase::Playing,
            turn: Side::Player,
            winner: None,
        };
        log::info!("match started with {} ships per side", self.template.len());
        Ok(self.state)
    }

    fn require_turn(&self, side: Side) -> Result<(), MatchError> {
        if self.state.phase == Phase::Playing && self.state.turn == side {
            Ok(())
        } else {
            Err(MatchError::InvalidTurn)
        }
    }

    /// Resolve the player's shot at `id` on the bot's board.
    pub fn player_shoot(&mut self, id: CellId) -> Result<ShotReport, MatchError> {
        self.require_turn(Side::Player)?;
        if id >= TOTAL_CELLS {
            return Err(MatchError::InvalidCell(id));
        }
        let (cell, outcome, sunk_ship) = fire(&mut self.bot_board, &mut self.bot_fleet, id)?;
        log::debug!("player fires at {}: {:?}", Label(id), outcome);
        Ok(self.finish_shot(Side::Player, cell, outcome, sunk_ship))
    }

    /// Let the bot choose and resolve a shot on the player's board.
    pub fn bot_shoot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ShotReport, MatchError> {
        self.require_turn(Side::Bot)?;
        let id = self
            .bot
            .select_target(rng, &self.player_board)
            .ok_or(MatchError::AlreadyResolved)?;
        let (cell, outcome, sunk_ship) = fire(&mut self.player_board, &mut self.player_fleet, id)?;
        self.bot.record(id, outcome);
        log::debug!("bot fires at {}: {:?}", Label(id), outcome);
        Ok(self.finish_shot(Side::Bot, cell, outcome, sunk_ship))
    }

    fn finish_shot(
        &mut self,
        shooter: Side,
        cell: Cell,
        outcome: ShotOutcome,
        sunk_ship: Option<Ship>,
    ) -> ShotReport {
        let defeated = match shooter {
            Side::Player => self.bot_fleet.all_sunk(),
            Side::Bot => self.player_fleet.all_sunk(),
        };
        if defeated {
            self.state.phase = Phase::Finished;
            self.state.winner = Some(shooter);
            log::info!("match finished, {:?} wins", shooter);
        } else {
            self.state.turn = match shooter {
                Side::Player => Side::Bot,
                Side::Bot => Side::Player,
            };
        }
        ShotReport {
            cell,
            outcome,
            sunk_ship,
            game_finished: defeated,
            state: self.state,
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}

/// Resolve a shot at `id` against one side's board and fleet.
fn fire(
    board: &mut Board,
    fleet: &mut Fleet,
    id: CellId,
) -> Result<(Cell, ShotOutcome, Option<Ship>), MatchError> {
    let target = board.cell(id).ok_or(MatchError::InvalidCell(id))?;
    if target.status.is_resolved() {
        return Err(MatchError::AlreadyResolved);
    }
    let owner = if target.has_ship {
        let index = fleet
            .ship_at(id)
            .ok_or(MatchError::InvalidLayout(LayoutError::BoardMismatch(id)))?;
        Some(index)
    } else {
        None
    };
    let cell = board.resolve(id)?;
    let Some(index) = owner else {
        return Ok((cell, ShotOutcome::Miss, None));
    };
    let ship = &mut fleet.ships_mut()[index];
    if ship.register_hit() {
        Ok((cell, ShotOutcome::Sunk, Some(ship.clone())))
    } else {
        Ok((cell, ShotOutcome::Hit, None))
    }
}
