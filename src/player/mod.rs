//! Player trait and implementations
//!
//! A Player decides where its ships go and where to fire. The local and
//! networked game loops drive any `Player` the same way.

use rand::rngs::SmallRng;

use crate::core::{AttackOutcome, Board, BoardError};

/// Interface implemented by different player types.
pub trait Player: Send {
    /// Place all ships onto the provided board.
    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError>;

    /// Choose the next coordinate to attack given what is known of the
    /// opponent's board. `None` when there is nothing left to fire at.
    fn select_target(&mut self, rng: &mut SmallRng, target: &Board) -> Option<(usize, usize)>;

    /// Inform the player of the result of its last attack.
    fn handle_attack_result(&mut self, _coord: (usize, usize), _hit: bool, _sunk: Option<&str>) {}

    /// Inform the player of an opponent attack against its board.
    fn handle_opponent_attack(&mut self, _coord: (usize, usize), _outcome: AttackOutcome) {}
}

pub mod ai;
pub use ai::AiPlayer;
