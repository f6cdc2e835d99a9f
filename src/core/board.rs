//! Game board: cell grid plus the ships placed on it.

use alloc::vec::Vec;
use core::fmt;

use crate::core::common::{AttackOutcome, BoardError, CellState};
use crate::core::config::{BOARD_SIZE, MAX_SHIP_LENGTH, MIN_SHIP_LENGTH};
use crate::core::ship::{Orientation, Ship, ShipDef};

const GRID_SIZE: usize = BOARD_SIZE as usize;

/// One player's grid.
///
/// The same type doubles as the target mirror of the opponent's grid: that
/// copy never gets ships placed on it and only learns Hit/Miss through
/// [`Board::mark`].
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[CellState; GRID_SIZE]; GRID_SIZE],
    ships: Vec<Ship>,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new() -> Self {
        Board {
            cells: [[CellState::Empty; GRID_SIZE]; GRID_SIZE],
            ships: Vec::new(),
        }
    }

    /// State of the cell at (row, col), `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<CellState> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Ships in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Number of cells in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == state)
            .count()
    }

    /// Cells a ship of `length` would occupy, validated against the grid
    /// bounds and current occupancy.
    fn placement_cells(
        &self,
        length: usize,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<Vec<(usize, usize)>, BoardError> {
        if !(MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH).contains(&length) {
            return Err(BoardError::InvalidShipLength(length));
        }
        let mut cells = Vec::with_capacity(length);
        for i in 0..length {
            let (r, c) = orientation.step(row, col, i);
            if r >= GRID_SIZE || c >= GRID_SIZE {
                return Err(BoardError::ShipOutOfBounds);
            }
            if self.cells[r][c] != CellState::Empty {
                return Err(BoardError::ShipOverlaps);
            }
            cells.push((r, c));
        }
        Ok(cells)
    }

    /// Whether `def` fits at (row, col) without leaving the grid or touching a
    /// non-empty cell.
    pub fn can_place(&self, def: &ShipDef, row: usize, col: usize, orientation: Orientation) -> bool {
        self.placement_cells(def.length(), row, col, orientation).is_ok()
    }

    /// Place a ship at (row, col). The board is left untouched on error.
    pub fn place(
        &mut self,
        def: ShipDef,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let cells = self.placement_cells(def.length(), row, col, orientation)?;
        for &(r, c) in &cells {
            self.cells[r][c] = CellState::Ship;
        }
        self.ships.push(Ship::placed(def, cells));
        Ok(())
    }

    /// Resolve an attack at (row, col).
    ///
    /// Out-of-bounds coordinates are reported as already attacked.
    pub fn attack(&mut self, row: usize, col: usize) -> AttackOutcome {
        let Some(state) = self.cell(row, col) else {
            return AttackOutcome::AlreadyAttacked;
        };
        match state {
            CellState::Hit | CellState::Miss => AttackOutcome::AlreadyAttacked,
            CellState::Empty => {
                self.cells[row][col] = CellState::Miss;
                AttackOutcome::Miss
            }
            CellState::Ship => {
                self.cells[row][col] = CellState::Hit;
                for ship in self.ships.iter_mut() {
                    if ship.register_hit(row, col) {
                        if ship.is_sunk() {
                            return AttackOutcome::Sunk(ship.name());
                        }
                        break;
                    }
                }
                AttackOutcome::Hit
            }
        }
    }

    /// Record an outcome on a target mirror: Hit or Miss on an empty cell.
    pub fn mark(&mut self, row: usize, col: usize, hit: bool) -> Result<(), BoardError> {
        match self.cell(row, col) {
            None => Err(BoardError::InvalidIndex),
            Some(state) if state.is_resolved() => Err(BoardError::AlreadyAttacked),
            Some(_) => {
                self.cells[row][col] = if hit { CellState::Hit } else { CellState::Miss };
                Ok(())
            }
        }
    }

    /// `true` when at least one ship is placed and every placed ship is sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in self.cells.iter() {
            write!(f, "  ")?;
            for cell in row.iter() {
                let ch = match cell {
                    CellState::Empty => '.',
                    CellState::Ship => 'S',
                    CellState::Hit => 'X',
                    CellState::Miss => 'o',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  ships: {:?}", self.ships)?;
        write!(f, "}}")
    }
}
