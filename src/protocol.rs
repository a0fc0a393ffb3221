//! Typed messages exchanged between a client and a game server.
//!
//! Every request in the table of external operations has exactly one
//! request variant and one success response. Payloads coming from a peer
//! go through [`validate`] before the engine sees them.

use serde::{Deserialize, Serialize};

use crate::{Board, Cell, Fleet, MatchError, MatchState, Placement, Ship};

pub mod validate;

pub use validate::ValidationError;

/// Version exchanged in the handshake; peers must agree exactly.
pub const PROTOCOL_VERSION: u8 = 1;

/// Category of a rejected request, sent back instead of closing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidTurn,
    AlreadyResolved,
    IncompletePlacement,
    PlacementExhausted,
    InvalidLayout,
    /// Malformed payload: out-of-range ids, wrong cell counts, unknown ships.
    Validation,
    /// Message that makes no sense as a request.
    Protocol,
}

impl From<&MatchError> for ErrorKind {
    fn from(err: &MatchError) -> Self {
        match err {
            MatchError::InvalidTurn => ErrorKind::InvalidTurn,
            MatchError::AlreadyResolved => ErrorKind::AlreadyResolved,
            MatchError::IncompletePlacement => ErrorKind::IncompletePlacement,
            MatchError::PlacementExhausted => ErrorKind::PlacementExhausted,
            MatchError::InvalidLayout(_) => ErrorKind::InvalidLayout,
            MatchError::InvalidCell(_) => ErrorKind::Validation,
        }
    }
}

/// Result of one `Shoot` request: the player's shot and, unless the player
/// just won, the bot's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootResponse {
    pub player_shot: Cell,
    pub player_sunk_ship: Option<Ship>,
    pub bot_shot: Option<Cell>,
    pub bot_sunk_ship: Option<Ship>,
    pub match_state: MatchState,
}

/// Messages exchanged between the game server and a remote client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Opening handshake carrying the sender's protocol version.
    Handshake { version: u8 },
    /// Handshake acknowledgement.
    HandshakeAck { version: u8 },

    /// Request the player's fleet.
    GetFleet,
    /// Request the player's board.
    GetBoard,
    /// Request the bot's board with unshot ships hidden.
    GetOpponentBoard,
    /// Replace the player's board.
    SetBoard(Board),
    /// Replace the player's fleet.
    SetFleet(Fleet),
    /// Ask for a random layout; the match is not modified.
    Randomize,
    /// Discard the match and go back to setup.
    Reset,
    /// Begin play.
    Start,
    /// Fire at a cell of the bot's board.
    Shoot { cell_id: u32 },

    /// Fleet reply.
    Fleet(Fleet),
    /// Board reply.
    Board(Board),
    /// Board and fleet pair, for `Randomize` and `Reset`.
    Layout(Placement),
    /// Match state after `Start`.
    Started(MatchState),
    /// Outcome of a `Shoot`.
    ShotResult(ShootResponse),
    /// Generic acknowledgement.
    Ack,
    /// Request rejected; the session stays open.
    Error { kind: ErrorKind, message: String },
}

impl Message {
    /// Build an error reply from an engine error.
    pub fn from_match_error(err: &MatchError) -> Self {
        Message::Error {
            kind: ErrorKind::from(err),
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for Message {
    fn from(err: ValidationError) -> Self {
        Message::Error {
            kind: ErrorKind::Validation,
            message: err.to_string(),
        }
    }
}
