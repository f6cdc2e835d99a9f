use std::collections::HashSet;

use battleship::{
    place_fleet, AiPlayer, AttackOutcome, Board, CellState, GameStatus, HuntAi, LocalGame,
    Player, TurnReport, BOARD_SIZE,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_random_mode_covers_grid_without_repeats() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut ai = HuntAi::new();
    let mut seen = HashSet::new();
    for _ in 0..100 {
        let (r, c) = ai.choose_attack(&mut rng).unwrap();
        assert!(r < BOARD_SIZE as usize && c < BOARD_SIZE as usize);
        assert!(seen.insert((r, c)), "cell ({}, {}) chosen twice", r, c);
        ai.record_miss(r, c);
    }
    assert_eq!(seen.len(), 100);
    assert_eq!(ai.attack_count(), 100);
    assert_eq!(ai.choose_attack(&mut rng), None);
}

#[test]
fn test_hit_queues_neighbours_in_order() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = HuntAi::new();
    ai.record_hit(5, 5);
    assert!(ai.is_hunting());
    let expected = [(4, 5), (6, 5), (5, 4), (5, 6)];
    for coord in expected {
        assert_eq!(ai.choose_attack(&mut rng), Some(coord));
        ai.record_miss(coord.0, coord.1);
    }
}

#[test]
fn test_hunt_skips_attacked_neighbours() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = HuntAi::new();
    ai.record_miss(4, 5);
    ai.record_hit(5, 5);
    let queued: Vec<_> = ai.hunt_queue().copied().collect();
    assert_eq!(queued, vec![(6, 5), (5, 4), (5, 6)]);
    // a second hit queues its own neighbours behind the first batch
    assert_eq!(ai.choose_attack(&mut rng), Some((6, 5)));
    ai.record_hit(6, 5);
    let queued: Vec<_> = ai.hunt_queue().copied().collect();
    assert_eq!(queued, vec![(5, 4), (5, 6), (7, 5), (6, 4), (6, 6)]);
}

#[test]
fn test_ai_player_sinks_fleet_within_grid() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut board = Board::new();
    place_fleet(&mut board, &mut rng).unwrap();

    let mut player = AiPlayer::new();
    let target = Board::new();
    let mut shots = 0;
    while !board.all_sunk() {
        let (r, c) = player.select_target(&mut rng, &target).unwrap();
        let outcome = board.attack(r, c);
        assert_ne!(outcome, AttackOutcome::AlreadyAttacked);
        player.handle_attack_result((r, c), outcome.is_hit(), outcome.sunk_ship());
        shots += 1;
        assert!(shots <= 100);
    }
    assert_eq!(board.count(CellState::Ship), 0);
}

#[test]
fn test_local_game_finishes() {
    for seed in 0..10u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = LocalGame::new(Box::new(AiPlayer::new()), &mut rng).unwrap();
        assert!(game.is_player_turn());
        let status = game.run(&mut rng).unwrap();
        assert_ne!(status, GameStatus::InProgress);
        match status {
            GameStatus::Won => assert!(game.ai_board().all_sunk()),
            GameStatus::Lost => assert!(game.engine().board().all_sunk()),
            GameStatus::InProgress => unreachable!(),
        }
        assert!(game.step(&mut rng).unwrap().is_none());
    }
}

#[test]
fn test_local_game_alternates_turns() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut game = LocalGame::new(Box::new(AiPlayer::new()), &mut rng).unwrap();
    for i in 0..20 {
        let report = game.step(&mut rng).unwrap().unwrap();
        if i % 2 == 0 {
            assert!(matches!(report, TurnReport::Player { .. }));
        } else {
            assert!(matches!(report, TurnReport::Ai { .. }));
        }
    }
    assert_eq!(game.ai().attack_count(), 10);
}
