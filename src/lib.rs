#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod board;
mod bot;
#[cfg(feature = "std")]
pub mod client;
mod common;
mod config;
mod game;
pub mod grid;
pub mod layout;
#[cfg(feature = "std")]
mod logging;
mod placement;
#[cfg(feature = "std")]
pub mod player_cli;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod server;
mod ship;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use board::*;
pub use bot::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use grid::{CellId, CellSet, Label};
pub use placement::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use client::{GameClient, RemoteError};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use protocol::{ErrorKind, Message, ShootResponse, PROTOCOL_VERSION};
#[cfg(feature = "std")]
pub use server::{serve, GameServer, ServerConfig};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
