//! Offline game: a [`Player`] against the hunt/target AI, resolved
//! synchronously on locally held boards with no protocol involved.

use alloc::boxed::Box;
use rand::rngs::SmallRng;

use crate::core::{place_fleet, AttackOutcome, Board, BoardError, GameEngine, GameStatus, HuntAi};
use crate::player::Player;

/// What happened on one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnReport {
    Player {
        coord: (usize, usize),
        outcome: AttackOutcome,
    },
    Ai {
        coord: (usize, usize),
        outcome: AttackOutcome,
    },
}

pub struct LocalGame {
    player: Box<dyn Player>,
    engine: GameEngine,
    ai: HuntAi,
    ai_board: Board,
    player_turn: bool,
}

impl LocalGame {
    /// Set up both fleets. The player moves first.
    pub fn new(mut player: Box<dyn Player>, rng: &mut SmallRng) -> Result<Self, BoardError> {
        let mut engine = GameEngine::new();
        player.place_ships(rng, engine.board_mut())?;
        let mut ai_board = Board::new();
        place_fleet(&mut ai_board, rng)?;
        Ok(Self {
            player,
            engine,
            ai: HuntAi::new(),
            ai_board,
            player_turn: true,
        })
    }

    /// The player's side: own board and target mirror.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn ai(&self) -> &HuntAi {
        &self.ai
    }

    pub fn ai_board(&self) -> &Board {
        &self.ai_board
    }

    pub fn is_player_turn(&self) -> bool {
        self.player_turn
    }

    /// Status from the player's point of view.
    pub fn status(&self) -> GameStatus {
        self.engine.status()
    }

    /// Play a single turn. `Ok(None)` once the game is over.
    ///
    /// A player choosing an already resolved cell gets
    /// `BoardError::AlreadyAttacked` and keeps the turn.
    pub fn step(&mut self, rng: &mut SmallRng) -> Result<Option<TurnReport>, BoardError> {
        if self.status() != GameStatus::InProgress {
            return Ok(None);
        }
        let report = if self.player_turn {
            let (row, col) = self
                .player
                .select_target(rng, self.engine.target())
                .ok_or(BoardError::NoTargetsLeft)?;
            let outcome = self.ai_board.attack(row, col);
            if outcome.already_attacked() {
                return Err(BoardError::AlreadyAttacked);
            }
            self.engine
                .record_result(row, col, outcome.is_hit(), outcome.sunk_ship())?;
            self.player
                .handle_attack_result((row, col), outcome.is_hit(), outcome.sunk_ship());
            TurnReport::Player {
                coord: (row, col),
                outcome,
            }
        } else {
            let (row, col) = self.ai.choose_attack(rng).ok_or(BoardError::NoTargetsLeft)?;
            let outcome = self.engine.receive_attack(row, col);
            self.ai.record_outcome(row, col, &outcome);
            self.player.handle_opponent_attack((row, col), outcome);
            TurnReport::Ai {
                coord: (row, col),
                outcome,
            }
        };
        log::debug!("{:?}", report);
        self.player_turn = !self.player_turn;
        Ok(Some(report))
    }

    /// Play until one fleet is gone.
    pub fn run(&mut self, rng: &mut SmallRng) -> Result<GameStatus, BoardError> {
        while self.step(rng)?.is_some() {}
        Ok(self.status())
    }
}
