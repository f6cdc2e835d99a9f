use rand::rngs::SmallRng;

use crate::core::{ai, Board, BoardError, HuntAi};

use super::Player;

/// Player backed by the hunt/target engine.
#[derive(Debug, Default)]
pub struct AiPlayer {
    engine: HuntAi,
}

impl AiPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &HuntAi {
        &self.engine
    }
}

impl Player for AiPlayer {
    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        ai::place_fleet(board, rng)
    }

    fn select_target(&mut self, rng: &mut SmallRng, _target: &Board) -> Option<(usize, usize)> {
        self.engine.choose_attack(rng)
    }

    fn handle_attack_result(&mut self, (row, col): (usize, usize), hit: bool, _sunk: Option<&str>) {
        if hit {
            self.engine.record_hit(row, col);
        } else {
            self.engine.record_miss(row, col);
        }
    }
}
