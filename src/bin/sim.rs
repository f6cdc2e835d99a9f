use battleship::{AiPlayer, CellState, GameStatus, LocalGame};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut game =
        LocalGame::new(Box::new(AiPlayer::new()), &mut rng).map_err(|e| anyhow::anyhow!(e))?;
    let status = game.run(&mut rng).map_err(|e| anyhow::anyhow!(e))?;

    let target = game.engine().target();
    let player_shots = target.count(CellState::Hit) + target.count(CellState::Miss);
    let winner = match status {
        GameStatus::Won => Some("player"),
        GameStatus::Lost => Some("ai"),
        GameStatus::InProgress => None,
    };

    let result = json!({
        "seed": seed,
        "player": {"status": format!("{:?}", status), "shots": player_shots},
        "ai": {"shots": game.ai().attack_count()},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
