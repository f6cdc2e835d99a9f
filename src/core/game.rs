use alloc::collections::BTreeSet;
use alloc::string::String;

use crate::core::{
    board::Board,
    common::{AttackOutcome, BoardError},
    config::{fleet_ship, NUM_SHIPS},
};

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// One side of a game: its own board, the mirror of the opponent's board, and
/// the names of opponent ships sunk so far.
#[derive(Debug, Clone, Default)]
pub struct GameEngine {
    board: Board,
    target: Board,
    enemy_sunk: BTreeSet<String>,
}

impl GameEngine {
    /// Create a new engine with an empty board and no attacks recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable reference to the player's board for ship placement.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Immutable reference to the player's board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// What is known about the opponent's board.
    pub fn target(&self) -> &Board {
        &self.target
    }

    /// Names of opponent ships sunk so far. A ship reported sunk twice
    /// counts once.
    pub fn enemy_sunk(&self) -> &BTreeSet<String> {
        &self.enemy_sunk
    }

    /// Resolve an opponent attack against our own board.
    pub fn receive_attack(&mut self, row: usize, col: usize) -> AttackOutcome {
        self.board.attack(row, col)
    }

    /// Record what the opponent reported for our attack at (row, col).
    pub fn record_result(
        &mut self,
        row: usize,
        col: usize,
        hit: bool,
        sunk: Option<&str>,
    ) -> Result<(), BoardError> {
        if let Some(name) = sunk {
            if !hit {
                return Err(BoardError::NameNotFound);
            }
            fleet_ship(name).ok_or(BoardError::NameNotFound)?;
        }
        self.target.mark(row, col, hit)?;
        if let Some(name) = sunk {
            self.enemy_sunk.insert(name.into());
        }
        Ok(())
    }

    /// Evaluate the current game status.
    pub fn status(&self) -> GameStatus {
        if self.board.all_sunk() {
            GameStatus::Lost
        } else if self.enemy_sunk.len() >= NUM_SHIPS {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }
}
