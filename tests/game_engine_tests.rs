use battleship::{place_fleet, BoardError, GameEngine, GameStatus, FLEET};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_repeated_sunk_report_counts_once() {
    let mut engine = GameEngine::new();
    for col in 0..5 {
        engine.record_result(0, col, true, Some("Destroyer")).unwrap();
    }
    assert_eq!(engine.enemy_sunk().len(), 1);
    assert_eq!(engine.status(), GameStatus::InProgress);
}

#[test]
fn test_every_fleet_ship_sunk_wins() {
    let mut engine = GameEngine::new();
    for (row, def) in FLEET.iter().enumerate() {
        engine.record_result(row, 0, true, Some(def.name())).unwrap();
    }
    assert_eq!(engine.enemy_sunk().len(), FLEET.len());
    assert_eq!(engine.status(), GameStatus::Won);
}

#[test]
fn test_bad_results_rejected() {
    let mut engine = GameEngine::new();
    assert_eq!(
        engine.record_result(0, 0, true, Some("Rowboat")),
        Err(BoardError::NameNotFound)
    );
    assert_eq!(
        engine.record_result(0, 0, false, Some("Cruiser")),
        Err(BoardError::NameNotFound)
    );
    engine.record_result(0, 0, false, None).unwrap();
    assert_eq!(
        engine.record_result(0, 0, true, None),
        Err(BoardError::AlreadyAttacked)
    );
    assert!(engine.enemy_sunk().is_empty());
}

#[test]
fn test_losing_own_fleet() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut engine = GameEngine::new();
    place_fleet(engine.board_mut(), &mut rng).unwrap();
    for r in 0..10 {
        for c in 0..10 {
            engine.receive_attack(r, c);
        }
    }
    assert_eq!(engine.status(), GameStatus::Lost);
}
