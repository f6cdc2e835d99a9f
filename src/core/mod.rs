//! Core battleship game rules (no_std compatible)
//!
//! Pure data and rules with no I/O: board, ships, attack resolution, win
//! detection and the hunt/target opponent. Only `alloc` is required.

pub mod ai;
pub mod bitboard;
pub mod board;
pub mod common;
pub mod config;
pub mod game;
pub mod ship;

// Re-export commonly used types
pub use ai::{place_fleet, HuntAi};
pub use bitboard::{BitBoard, BitBoardError};
pub use board::Board;
pub use common::{AttackOutcome, BoardError, CellState};
pub use config::*;
pub use game::{GameEngine, GameStatus};
pub use ship::{Orientation, Ship, ShipDef};
