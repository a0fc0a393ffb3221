//! Request loop serving one match per connection.

use anyhow::anyhow;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::time::Duration;

use crate::protocol::{self, validate, Message, ShootResponse, PROTOCOL_VERSION};
use crate::transport::{tcp::TcpTransport, Transport};
use crate::GameEngine;

/// Runtime settings for a game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Pause between revealing the player's shot result and the bot's shot.
    pub reveal_delay: Duration,
    /// Base seed; connection `n` uses `seed + n`. Random when `None`.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(500),
            seed: None,
        }
    }
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

/// Serves a single match over one transport.
///
/// Requests are handled strictly in order; while a shot (including its
/// reveal delay) is in progress nothing else is read from the peer, so the
/// match never sees two overlapping mutations.
pub struct GameServer<T: Transport> {
    engine: GameEngine,
    transport: T,
    rng: SmallRng,
    config: ServerConfig,
}

impl<T: Transport> GameServer<T> {
    pub fn new(transport: T, config: ServerConfig) -> Self {
        Self::with_engine(GameEngine::new(), transport, config)
    }

    pub fn with_engine(engine: GameEngine, transport: T, config: ServerConfig) -> Self {
        Self {
            engine,
            transport,
            rng: make_rng(config.seed),
            config,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    async fn handshake(&mut self) -> anyhow::Result<()> {
        match self.transport.recv().await? {
            Message::Handshake { version } if version == PROTOCOL_VERSION => {
                self.transport
                    .send(Message::HandshakeAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await
            }
            Message::Handshake { version } => {
                log::warn!(
                    "handshake version mismatch: expected {}, peer sent {}",
                    PROTOCOL_VERSION,
                    version
                );
                Err(anyhow!(
                    "Protocol version mismatch: expected {}, got {}",
                    PROTOCOL_VERSION,
                    version
                ))
            }
            other => {
                log::warn!("expected handshake, got {:?}", other);
                Err(anyhow!("Expected handshake"))
            }
        }
    }

    /// Handshake, then answer requests until the peer goes away.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.handshake().await?;
        while let Ok(msg) = self.transport.recv().await {
            let reply = self.handle(msg).await;
            if let Message::Error { kind, message } = &reply {
                log::warn!("rejected request ({:?}): {}", kind, message);
            }
            self.transport.send(reply).await?;
        }
        log::debug!("peer disconnected");
        Ok(())
    }

    /// Answer a single request.
    pub async fn handle(&mut self, msg: Message) -> Message {
        match msg {
            Message::GetFleet => Message::Fleet(self.engine.player_fleet().clone()),
            Message::GetBoard => Message::Board(self.engine.player_board().clone()),
            Message::GetOpponentBoard => Message::Board(self.engine.bot_view()),
            Message::SetBoard(board) => match validate::board(&board) {
                Ok(()) => {
                    self.engine.adopt_player_board(board);
                    Message::Ack
                }
                Err(e) => e.into(),
            },
            Message::SetFleet(fleet) => match validate::fleet(&fleet, self.engine.template()) {
                Ok(()) => {
                    self.engine.adopt_player_fleet(fleet);
                    Message::Ack
                }
                Err(e) => e.into(),
            },
            Message::Randomize => match self.engine.randomize(&mut self.rng) {
                Ok(layout) => Message::Layout(layout),
                Err(e) => Message::from_match_error(&e),
            },
            Message::Reset => Message::Layout(self.engine.reset()),
            Message::Start => match self.engine.start(&mut self.rng) {
                Ok(state) => Message::Started(state),
                Err(e) => Message::from_match_error(&e),
            },
            Message::Shoot { cell_id } => match validate::cell_id(cell_id) {
                Ok(id) => self.shoot(id).await,
                Err(e) => e.into(),
            },
            other => Message::Error {
                kind: protocol::ErrorKind::Protocol,
                message: format!("Unexpected message: {}", variant_name(&other)),
            },
        }
    }

    async fn shoot(&mut self, id: usize) -> Message {
        let player = match self.engine.player_shoot(id) {
            Ok(report) => report,
            Err(e) => return Message::from_match_error(&e),
        };
        let mut response = ShootResponse {
            player_shot: player.cell,
            player_sunk_ship: player.sunk_ship,
            bot_shot: None,
            bot_sunk_ship: None,
            match_state: player.state,
        };
        if player.game_finished {
            return Message::ShotResult(response);
        }

        if !self.config.reveal_delay.is_zero() {
            tokio::time::sleep(self.config.reveal_delay).await;
        }
        match self.engine.bot_shoot(&mut self.rng) {
            Ok(bot) => {
                response.bot_shot = Some(bot.cell);
                response.bot_sunk_ship = bot.sunk_ship;
                response.match_state = bot.state;
                Message::ShotResult(response)
            }
            Err(e) => {
                // the player's shot already landed; report it with the board as it stands
                log::warn!("bot could not answer shot at {}: {}", id, e);
                response.match_state = self.engine.state();
                Message::ShotResult(response)
            }
        }
    }
}

fn variant_name(msg: &Message) -> &'static str {
    match msg {
        Message::Handshake { .. } => "Handshake",
        Message::HandshakeAck { .. } => "HandshakeAck",
        Message::Fleet(_) => "Fleet",
        Message::Board(_) => "Board",
        Message::Layout(_) => "Layout",
        Message::Started(_) => "Started",
        Message::ShotResult(_) => "ShotResult",
        Message::Ack => "Ack",
        Message::Error { .. } => "Error",
        _ => "Request",
    }
}

/// Accept connections forever, running one independent match per peer.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let mut connection: u64 = 0;
    loop {
        let (stream, addr) = listener.accept().await?;
        stream.set_nodelay(true)?;
        let config = ServerConfig {
            seed: config.seed.map(|s| s.wrapping_add(connection)),
            ..config
        };
        connection += 1;
        log::info!("player connected from {}", addr);
        tokio::spawn(async move {
            let mut server = GameServer::new(TcpTransport::new(stream), config);
            match server.run().await {
                Ok(()) => log::info!("player {} left", addr),
                Err(e) => log::warn!("session with {} ended: {}", addr, e),
            }
        });
    }
}
