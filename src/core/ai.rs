// Hunt/target opponent: fires at random until something is hit, then works
// through the orthogonal neighbours of every hit before going back to random.

use alloc::collections::VecDeque;
use rand::Rng;

use crate::core::{
    bitboard::BitBoard,
    board::Board,
    common::{AttackOutcome, BoardError},
    config::{BOARD_SIZE, FLEET},
    ship::Orientation,
};

/// Bitboard type alias for convenience.
type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

const GRID_SIZE: usize = BOARD_SIZE as usize;

/// Upper bound on random placement attempts per ship.
const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Targeting state for one game.
#[derive(Debug, Clone, Default)]
pub struct HuntAi {
    attacked: BB,
    hunt_queue: VecDeque<(usize, usize)>,
    hunting: bool,
}

impl HuntAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while neighbours of an earlier hit are being worked through.
    pub fn is_hunting(&self) -> bool {
        self.hunting
    }

    /// Candidates still waiting in the hunt queue, oldest first.
    pub fn hunt_queue(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.hunt_queue.iter()
    }

    /// Whether (row, col) has been fired at.
    pub fn has_attacked(&self, row: usize, col: usize) -> bool {
        self.attacked.get(row, col).unwrap_or(true)
    }

    /// Number of distinct cells fired at so far.
    pub fn attack_count(&self) -> usize {
        self.attacked.count_ones()
    }

    /// Pick the next coordinate to fire at and remember it.
    ///
    /// Returns `None` once every cell of the grid has been attacked.
    pub fn choose_attack<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        if self.hunting {
            while let Some((r, c)) = self.hunt_queue.pop_front() {
                if !self.has_attacked(r, c) {
                    self.remember(r, c);
                    return Some((r, c));
                }
            }
            self.hunting = false;
        }

        if self.attacked.is_full() {
            return None;
        }
        loop {
            let r = rng.random_range(0..GRID_SIZE);
            let c = rng.random_range(0..GRID_SIZE);
            if !self.has_attacked(r, c) {
                self.remember(r, c);
                return Some((r, c));
            }
        }
    }

    fn remember(&mut self, row: usize, col: usize) {
        let _ = self.attacked.set(row, col);
    }

    /// Tell the engine its shot at (row, col) hit. Queues the unattacked
    /// in-bounds neighbours (up, down, left, right) and switches to hunting.
    pub fn record_hit(&mut self, row: usize, col: usize) {
        self.remember(row, col);
        self.hunting = true;
        let neighbours = [
            row.checked_sub(1).map(|r| (r, col)),
            Some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            Some((row, col + 1)),
        ];
        for (r, c) in neighbours.into_iter().flatten() {
            if r < GRID_SIZE && c < GRID_SIZE && !self.has_attacked(r, c) {
                self.hunt_queue.push_back((r, c));
            }
        }
    }

    /// A miss only marks the cell.
    pub fn record_miss(&mut self, row: usize, col: usize) {
        self.remember(row, col);
    }

    /// Feed back a resolved outcome.
    pub fn record_outcome(&mut self, row: usize, col: usize, outcome: &AttackOutcome) {
        if outcome.is_hit() {
            self.record_hit(row, col);
        } else {
            self.record_miss(row, col);
        }
    }
}

/// Place the standard fleet at random positions.
///
/// Each ship is retried at uniformly sampled anchors and orientations until it
/// fits; there is no backtracking.
pub fn place_fleet<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<(), BoardError> {
    for def in FLEET.iter() {
        let mut placed = false;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let row = rng.random_range(0..GRID_SIZE);
            let col = rng.random_range(0..GRID_SIZE);
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if board.place(*def, row, col, orientation).is_ok() {
                placed = true;
                break;
            }
        }
        if !placed {
            return Err(BoardError::UnableToPlaceShip);
        }
    }
    Ok(())
}
