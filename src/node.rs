//! Networked game loop: one [`Player`] and its [`GameEngine`] talking to the
//! opponent through the relay.
//!
//! The host creates a room, the guest joins it with the code. Both place their
//! fleet and announce `ships_placed`; the host fires first. The defender
//! answers every `attack` with an `attack_result` and, once its whole fleet is
//! gone, follows up with `game_over { you_won: true }`.

use rand::rngs::SmallRng;

use crate::{
    core::{GameEngine, GameStatus},
    player::Player,
    protocol::Message,
    session::{CloseReason, Phase, Role, Session, Turn},
    transport::Transport,
};

pub struct RemoteGame {
    player: Box<dyn Player>,
    engine: GameEngine,
    transport: Box<dyn Transport>,
    session: Session,
}

impl RemoteGame {
    pub fn new(player: Box<dyn Player>, transport: Box<dyn Transport>, role: Role) -> Self {
        Self {
            player,
            engine: GameEngine::new(),
            transport,
            session: Session::new(role),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Close the connection to the relay.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }

    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.session.on_send(&msg)?;
        self.transport.send_message(&msg).await
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        let envelope = self.transport.recv().await?;
        let msg = Message::from_envelope(&envelope)?;
        if let Err(e) = self.session.on_receive(&msg) {
            log::warn!("[RemoteGame] Rejecting {:?}: {}", msg, e);
            return Err(e.into());
        }
        Ok(msg)
    }

    /// Host: ask the relay for a room and return its code.
    pub async fn create_room(&mut self) -> anyhow::Result<String> {
        self.send(Message::CreateRoom).await?;
        match self.recv().await? {
            Message::RoomCreated { code } => Ok(code),
            other => Err(anyhow::anyhow!("Expected room_created, got {}", other.message_type())),
        }
    }

    /// Guest: join the room named `code`.
    pub async fn join_room(&mut self, code: &str) -> anyhow::Result<()> {
        self.send(Message::JoinRoom {
            code: code.to_string(),
        })
        .await?;
        match self.recv().await? {
            Message::GameStart => Ok(()),
            Message::JoinError { message } => Err(anyhow::anyhow!("Join rejected: {}", message)),
            other => Err(anyhow::anyhow!("Expected game_start, got {}", other.message_type())),
        }
    }

    /// Play the game to the end. Call after `create_room` or `join_room`.
    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<GameStatus> {
        loop {
            match self.session.phase().clone() {
                Phase::Connecting { .. } => {
                    return Err(anyhow::anyhow!("Not in a room yet"));
                }
                Phase::Placing {
                    own_placed: false, ..
                } => {
                    self.player
                        .place_ships(rng, self.engine.board_mut())
                        .map_err(|e| anyhow::anyhow!(e))?;
                    self.send(Message::ShipsPlaced).await?;
                }
                Phase::Battle { turn: Turn::Mine } => {
                    let (row, col) = self
                        .player
                        .select_target(rng, self.engine.target())
                        .ok_or_else(|| anyhow::anyhow!("No target left to attack"))?;
                    self.send(Message::Attack {
                        row: row as u8,
                        col: col as u8,
                    })
                    .await?;
                }
                Phase::Battle {
                    turn: Turn::Responding { row, col },
                } => {
                    let coord = (row as usize, col as usize);
                    let outcome = self.engine.receive_attack(coord.0, coord.1);
                    self.player.handle_opponent_attack(coord, outcome);
                    log::debug!("[RemoteGame] Opponent fired at {:?}: {:?}", coord, outcome);
                    self.send(Message::AttackResult {
                        row,
                        col,
                        hit: outcome.is_hit(),
                        sunk_ship_name: outcome.sunk_ship().map(str::to_string),
                    })
                    .await?;
                    if self.engine.board().all_sunk() {
                        self.send(Message::GameOver { you_won: true }).await?;
                    }
                }
                Phase::GameOver { won } => {
                    return Ok(if won { GameStatus::Won } else { GameStatus::Lost });
                }
                Phase::Closed(CloseReason::OpponentLeft) => {
                    return Err(anyhow::anyhow!("Opponent left the game"));
                }
                Phase::Closed(CloseReason::JoinRejected(message)) => {
                    return Err(anyhow::anyhow!("Join rejected: {}", message));
                }
                _ => {
                    let msg = self.recv().await?;
                    self.apply(msg)?;
                }
            }
        }
    }

    fn apply(&mut self, msg: Message) -> anyhow::Result<()> {
        if let Message::AttackResult {
            row,
            col,
            hit,
            sunk_ship_name,
        } = msg
        {
            let coord = (row as usize, col as usize);
            self.engine
                .record_result(coord.0, coord.1, hit, sunk_ship_name.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            self.player
                .handle_attack_result(coord, hit, sunk_ship_name.as_deref());
            log::debug!("[RemoteGame] Attack at {:?}: hit={} sunk={:?}", coord, hit, sunk_ship_name);
        }
        Ok(())
    }
}
