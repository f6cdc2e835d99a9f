//! Common types for Battleship: cell states, attack outcomes and board errors.

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    /// Occupied by an unhit ship segment.
    Ship,
    Hit,
    Miss,
}

impl CellState {
    /// `true` once an attack has resolved this cell.
    pub fn is_resolved(self) -> bool {
        matches!(self, CellState::Hit | CellState::Miss)
    }
}

/// Result of resolving an attack against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// The cell was out of bounds or already resolved. Nothing changed.
    AlreadyAttacked,
    Miss,
    /// A ship segment was hit but the ship is still afloat.
    Hit,
    /// This attack hit the last remaining segment of the named ship.
    Sunk(&'static str),
}

impl AttackOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AttackOutcome::Hit | AttackOutcome::Sunk(_))
    }

    pub fn already_attacked(&self) -> bool {
        matches!(self, AttackOutcome::AlreadyAttacked)
    }

    /// Name of the ship this attack sank, if any.
    pub fn sunk_ship(&self) -> Option<&'static str> {
        match self {
            AttackOutcome::Sunk(name) => Some(name),
            _ => None,
        }
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Named ship not found in the standard fleet.
    NameNotFound,
    /// Specified coordinate is out of range.
    InvalidIndex,
    /// Ship length outside the accepted range.
    InvalidShipLength(usize),
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Ship placement runs off the grid.
    ShipOutOfBounds,
    /// The coordinate has already been resolved.
    AlreadyAttacked,
    /// Random placement gave up.
    UnableToPlaceShip,
    /// Every cell of the target grid has been fired at.
    NoTargetsLeft,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::NameNotFound => write!(f, "Ship name not found in fleet"),
            BoardError::InvalidIndex => write!(f, "Index is out of range"),
            BoardError::InvalidShipLength(len) => write!(f, "Invalid ship length: {}", len),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::AlreadyAttacked => write!(f, "Position was already attacked"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
            BoardError::NoTargetsLeft => write!(f, "No unattacked cells left"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
