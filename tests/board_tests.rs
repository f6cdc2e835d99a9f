use battleship::{
    place_fleet, AttackOutcome, Board, BoardError, CellState, Orientation, ShipDef, BOARD_SIZE,
    FLEET, TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn carrier() -> ShipDef {
    FLEET[0]
}

#[test]
fn test_place_horizontal_and_sink() {
    let mut board = Board::new();
    board.place(carrier(), 0, 0, Orientation::Horizontal).unwrap();

    for c in 0..carrier().length() - 1 {
        assert_eq!(board.attack(0, c), AttackOutcome::Hit);
        assert!(!board.ships()[0].is_sunk());
    }
    // final hit should sink
    assert_eq!(board.attack(0, 4), AttackOutcome::Sunk("Carrier"));
    assert!(board.ships()[0].is_sunk());
    assert!(board.all_sunk());
}

#[test]
fn test_place_vertical_cells() {
    let mut board = Board::new();
    let destroyer = FLEET[4];
    board.place(destroyer, 8, 3, Orientation::Vertical).unwrap();
    assert_eq!(board.ships()[0].cells(), &[(8, 3), (9, 3)]);
    assert_eq!(board.cell(8, 3), Some(CellState::Ship));
    assert_eq!(board.cell(9, 3), Some(CellState::Ship));
    assert_eq!(board.count(CellState::Ship), 2);
}

#[test]
fn test_out_of_bounds_rejected_without_change() {
    let mut board = Board::new();
    assert_eq!(
        board.place(carrier(), 0, 6, Orientation::Horizontal),
        Err(BoardError::ShipOutOfBounds)
    );
    assert_eq!(
        board.place(carrier(), 6, 0, Orientation::Vertical),
        Err(BoardError::ShipOutOfBounds)
    );
    assert_eq!(
        board.place(carrier(), 10, 0, Orientation::Horizontal),
        Err(BoardError::ShipOutOfBounds)
    );
    assert_eq!(board.count(CellState::Empty), 100);
    assert!(board.ships().is_empty());
}

#[test]
fn test_overlap_rejected_without_change() {
    let mut board = Board::new();
    board.place(carrier(), 2, 0, Orientation::Horizontal).unwrap();
    let before = board.clone();
    assert!(!board.can_place(&FLEET[1], 0, 2, Orientation::Vertical));
    assert_eq!(
        board.place(FLEET[1], 0, 2, Orientation::Vertical),
        Err(BoardError::ShipOverlaps)
    );
    assert_eq!(board, before);
    assert!(board.can_place(&FLEET[1], 3, 0, Orientation::Horizontal));
}

#[test]
fn test_invalid_length_rejected() {
    let mut board = Board::new();
    assert_eq!(
        board.place(ShipDef::new("Dinghy", 1), 0, 0, Orientation::Horizontal),
        Err(BoardError::InvalidShipLength(1))
    );
    assert_eq!(
        board.place(ShipDef::new("Ark", 6), 0, 0, Orientation::Horizontal),
        Err(BoardError::InvalidShipLength(6))
    );
}

#[test]
fn test_attack_miss_then_already_attacked() {
    let mut board = Board::new();
    board.place(FLEET[4], 0, 0, Orientation::Horizontal).unwrap();
    assert_eq!(board.attack(5, 5), AttackOutcome::Miss);
    assert_eq!(board.cell(5, 5), Some(CellState::Miss));
    let before = board.clone();
    assert_eq!(board.attack(5, 5), AttackOutcome::AlreadyAttacked);
    assert_eq!(board, before);

    assert_eq!(board.attack(0, 0), AttackOutcome::Hit);
    assert_eq!(board.attack(0, 0), AttackOutcome::AlreadyAttacked);
    assert!(!board.ships()[0].is_sunk());
}

#[test]
fn test_attack_out_of_bounds_is_already_attacked() {
    let mut board = Board::new();
    let n = BOARD_SIZE as usize;
    assert_eq!(board.attack(n, 0), AttackOutcome::AlreadyAttacked);
    assert_eq!(board.attack(0, n), AttackOutcome::AlreadyAttacked);
    assert_eq!(board.count(CellState::Empty), 100);
}

#[test]
fn test_all_sunk_false_for_empty_board() {
    let board = Board::new();
    assert!(!board.all_sunk());
}

#[test]
fn test_all_sunk_requires_every_ship() {
    let mut board = Board::new();
    board.place(FLEET[4], 0, 0, Orientation::Horizontal).unwrap();
    board.place(FLEET[3], 2, 0, Orientation::Horizontal).unwrap();
    board.attack(0, 0);
    assert_eq!(board.attack(0, 1), AttackOutcome::Sunk("Destroyer"));
    assert!(!board.all_sunk());
    board.attack(2, 0);
    board.attack(2, 1);
    assert_eq!(board.attack(2, 2), AttackOutcome::Sunk("Submarine"));
    assert!(board.all_sunk());
}

#[test]
fn test_mark_target_mirror() {
    let mut target = Board::new();
    target.mark(1, 1, true).unwrap();
    target.mark(1, 2, false).unwrap();
    assert_eq!(target.cell(1, 1), Some(CellState::Hit));
    assert_eq!(target.cell(1, 2), Some(CellState::Miss));
    assert_eq!(target.mark(1, 1, false), Err(BoardError::AlreadyAttacked));
    assert_eq!(target.mark(10, 1, false), Err(BoardError::InvalidIndex));
}

#[test]
fn test_place_fleet_no_overlap() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut board = Board::new();
    place_fleet(&mut board, &mut rng).unwrap();
    assert_eq!(board.ships().len(), FLEET.len());
    assert_eq!(
        board.count(CellState::Ship),
        TOTAL_SHIP_CELLS,
        "all ships should be placed without overlap"
    );
    for (ship, def) in board.ships().iter().zip(FLEET.iter()) {
        assert_eq!(ship.name(), def.name());
        assert_eq!(ship.cells().len(), def.length());
    }
}
