use battleship::{
    init_logging, transport::WsTransport, AiPlayer, GameStatus, LocalGame, RelayServer,
    RemoteGame, Role, ServerConfig,
};

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Run the relay server that pairs remote players.
    Server {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, help = "Drop connections silent for this many seconds (0 = never)", default_value_t = 0)]
        idle_timeout: u64,
    },
    /// Create a room on a relay and play it with the AI player.
    Host {
        #[arg(long, default_value = "127.0.0.1:8080")]
        server: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Join a room on a relay and play it with the AI player.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        server: String,
        #[arg(long)]
        code: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Play the AI player against the local AI opponent.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    }
}

fn print_outcome(status: GameStatus) {
    match status {
        GameStatus::Won => println!("VICTORY! You have sunk all enemy ships!"),
        GameStatus::Lost => println!("DEFEAT. All your ships have been destroyed."),
        GameStatus::InProgress => println!("Game ended without a winner."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Server { bind, idle_timeout } => {
            let config = ServerConfig {
                bind_addr: bind,
                idle_timeout: (idle_timeout > 0).then(|| Duration::from_secs(idle_timeout)),
            };
            RelayServer::new(config).run().await?;
        }
        Commands::Host { server, seed } => {
            let mut rng = make_rng(seed);
            let transport = WsTransport::connect(&server).await?;
            let mut game = RemoteGame::new(Box::new(AiPlayer::new()), Box::new(transport), Role::Host);
            let code = game.create_room().await?;
            println!("Room code: {}", code);
            println!("Waiting for a player to join...");
            match game.run(&mut rng).await {
                Ok(status) => print_outcome(status),
                Err(e) => eprintln!("Game ended with an error: {}", e),
            }
            game.close().await;
        }
        Commands::Join { server, code, seed } => {
            let mut rng = make_rng(seed);
            let transport = WsTransport::connect(&server).await?;
            let mut game = RemoteGame::new(Box::new(AiPlayer::new()), Box::new(transport), Role::Guest);
            game.join_room(&code).await?;
            println!("Joined room {}", code.to_ascii_uppercase());
            match game.run(&mut rng).await {
                Ok(status) => print_outcome(status),
                Err(e) => eprintln!("Game ended with an error: {}", e),
            }
            game.close().await;
        }
        Commands::Local { seed } => {
            let mut rng = make_rng(seed);
            let mut game = LocalGame::new(Box::new(AiPlayer::new()), &mut rng)
                .map_err(|e| anyhow::anyhow!(e))?;
            let status = game.run(&mut rng).map_err(|e| anyhow::anyhow!(e))?;
            let shots = game.engine().target().count(battleship::CellState::Hit)
                + game.engine().target().count(battleship::CellState::Miss);
            println!("Game over after {} player shots.", shots);
            print_outcome(status);
        }
    }
    Ok(())
}
