//! Ship definitions and per-ship hit tracking.

use alloc::vec::Vec;
use core::fmt;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Coordinate of the `i`th segment of a ship anchored at (`row`, `col`).
    #[inline]
    pub fn step(self, row: usize, col: usize, i: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDef {
    name: &'static str,
    length: usize,
}

impl ShipDef {
    /// Create a new ship definition.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship together with the cells it occupies and which of them were hit.
///
/// `cells` and `hits` are parallel; both are empty until the ship is placed
/// and have exactly `length` entries afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    def: ShipDef,
    cells: Vec<(usize, usize)>,
    hits: Vec<bool>,
}

impl Ship {
    /// An unplaced ship.
    pub fn new(def: ShipDef) -> Self {
        Self {
            def,
            cells: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// A ship occupying `cells`, none of them hit yet.
    pub(crate) fn placed(def: ShipDef, cells: Vec<(usize, usize)>) -> Self {
        let hits = alloc::vec![false; cells.len()];
        Self { def, cells, hits }
    }

    pub fn def(&self) -> ShipDef {
        self.def
    }

    pub fn name(&self) -> &'static str {
        self.def.name()
    }

    pub fn length(&self) -> usize {
        self.def.length()
    }

    /// Occupied coordinates in placement order.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Hit flags, parallel to [`Ship::cells`].
    pub fn hits(&self) -> &[bool] {
        &self.hits
    }

    pub fn is_placed(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Index of the segment at (`row`, `col`), if this ship occupies it.
    pub fn segment_at(&self, row: usize, col: usize) -> Option<usize> {
        self.cells.iter().position(|&cell| cell == (row, col))
    }

    /// Mark the segment at (`row`, `col`) as hit. Returns `false` if the ship
    /// does not occupy that cell.
    pub fn register_hit(&mut self, row: usize, col: usize) -> bool {
        match self.segment_at(row, col) {
            Some(idx) => {
                self.hits[idx] = true;
                true
            }
            None => false,
        }
    }

    /// A ship is sunk once every segment is hit. Unplaced ships never are.
    pub fn is_sunk(&self) -> bool {
        !self.hits.is_empty() && self.hits.iter().all(|&hit| hit)
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", cells: {:?}, hits: {}/{} }}",
            self.def.name(),
            self.cells,
            self.hits.iter().filter(|&&h| h).count(),
            self.def.length(),
        )
    }
}
