use std::fmt;

use anyhow::anyhow;

use crate::protocol::{ErrorKind, Message, ShootResponse, PROTOCOL_VERSION};
use crate::transport::Transport;
use crate::{Board, CellId, Fleet, MatchState, Placement};

/// A request the server answered with `Message::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.kind)
    }
}

impl std::error::Error for RemoteError {}

/// Typed client for a game server, one method per operation.
pub struct GameClient<T: Transport> {
    transport: T,
    handshaken: bool,
}

impl<T: Transport> GameClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            handshaken: false,
        }
    }

    async fn ensure_handshake(&mut self) -> anyhow::Result<()> {
        if self.handshaken {
            return Ok(());
        }
        self.transport
            .send(Message::Handshake {
                version: PROTOCOL_VERSION,
            })
            .await?;
        match self.transport.recv().await? {
            Message::HandshakeAck { version } if version == PROTOCOL_VERSION => {
                self.handshaken = true;
                Ok(())
            }
            Message::HandshakeAck { version } => Err(anyhow!(
                "Protocol version mismatch: expected {}, got {}",
                PROTOCOL_VERSION,
                version
            )),
            _ => Err(anyhow!("Expected HandshakeAck")),
        }
    }

    /// Send one request and wait for its reply. Error replies become
    /// `RemoteError`s.
    pub async fn request(&mut self, msg: Message) -> anyhow::Result<Message> {
        self.ensure_handshake().await?;
        self.transport.send(msg).await?;
        match self.transport.recv().await? {
            Message::Error { kind, message } => Err(RemoteError { kind, message }.into()),
            reply => Ok(reply),
        }
    }

    pub async fn get_fleet(&mut self) -> anyhow::Result<Fleet> {
        match self.request(Message::GetFleet).await? {
            Message::Fleet(fleet) => Ok(fleet),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn get_board(&mut self) -> anyhow::Result<Board> {
        match self.request(Message::GetBoard).await? {
            Message::Board(board) => Ok(board),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    /// The bot's board with unshot ships hidden.
    pub async fn get_opponent_board(&mut self) -> anyhow::Result<Board> {
        match self.request(Message::GetOpponentBoard).await? {
            Message::Board(board) => Ok(board),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn set_board(&mut self, board: Board) -> anyhow::Result<()> {
        match self.request(Message::SetBoard(board)).await? {
            Message::Ack => Ok(()),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn set_fleet(&mut self, fleet: Fleet) -> anyhow::Result<()> {
        match self.request(Message::SetFleet(fleet)).await? {
            Message::Ack => Ok(()),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn randomize(&mut self) -> anyhow::Result<Placement> {
        match self.request(Message::Randomize).await? {
            Message::Layout(layout) => Ok(layout),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn reset(&mut self) -> anyhow::Result<Placement> {
        match self.request(Message::Reset).await? {
            Message::Layout(layout) => Ok(layout),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn start(&mut self) -> anyhow::Result<MatchState> {
        match self.request(Message::Start).await? {
            Message::Started(state) => Ok(state),
            _ => Err(anyhow!("Unexpected message")),
        }
    }

    pub async fn shoot(&mut self, cell_id: CellId) -> anyhow::Result<ShootResponse> {
        let cell_id = u32::try_from(cell_id).map_err(|_| anyhow!("Cell id too large"))?;
        match self.request(Message::Shoot { cell_id }).await? {
            Message::ShotResult(res) => Ok(res),
            _ => Err(anyhow!("Unexpected message")),
        }
    }
}

/// The `ErrorKind` carried by `err`, if the server rejected the request.
pub fn remote_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.downcast_ref::<RemoteError>().map(|e| e.kind)
}
