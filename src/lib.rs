#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod core;
pub mod local;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod node;
pub mod player;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub use crate::core::*;
pub use local::{LocalGame, TurnReport};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use node::RemoteGame;
pub use player::{AiPlayer, Player};
#[cfg(feature = "std")]
pub use protocol::{Envelope, Message, MessageType, ProtocolError};
#[cfg(feature = "std")]
pub use server::{RelayServer, ServerConfig};
#[cfg(feature = "std")]
pub use session::{Phase, Role, Session, SessionError};
