use super::ship::ShipDef;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;
pub const FLEET: [ShipDef; NUM_SHIPS] = [
    ShipDef::new("Carrier", 5),
    ShipDef::new("Battleship", 4),
    ShipDef::new("Cruiser", 3),
    ShipDef::new("Submarine", 3),
    ShipDef::new("Destroyer", 2),
];

/// Shortest ship a board accepts.
pub const MIN_SHIP_LENGTH: usize = 2;
/// Longest ship a board accepts.
pub const MAX_SHIP_LENGTH: usize = 5;

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Number of letters in a room code.
pub const ROOM_CODE_LEN: usize = 4;
/// Symbols a room code is drawn from.
pub const ROOM_CODE_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Look up a standard fleet entry by name.
pub fn fleet_ship(name: &str) -> Option<ShipDef> {
    FLEET.iter().copied().find(|def| def.name() == name)
}
