//! Client-side protocol state machine.
//!
//! Every message a client sends or receives is checked against its current
//! [`Phase`] before anything acts on it. A message that does not fit the phase
//! is rejected instead of being applied to the board.

use core::fmt;

use crate::protocol::{Message, MessageType};

/// Which side of a room this client is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Created the room; fires first.
    Host,
    Guest,
}

/// Whose move it is during the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// We may send an attack.
    Mine,
    /// We attacked (row, col) and wait for the result.
    AwaitingResult { row: u8, col: u8 },
    /// We wait for the opponent's attack.
    Theirs,
    /// The opponent attacked (row, col) and we owe them a result.
    Responding { row: u8, col: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    JoinRejected(String),
    OpponentLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Connected; `requested` once create_room/join_room has gone out.
    Connecting { requested: bool },
    /// Host only: room exists, nobody has joined yet.
    WaitingForOpponent { code: String },
    /// Both players are in the room and placing ships.
    Placing { own_placed: bool, opponent_placed: bool },
    Battle { turn: Turn },
    GameOver { won: bool },
    Closed(CloseReason),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Connecting { .. } => "connecting",
            Phase::WaitingForOpponent { .. } => "waiting_for_opponent",
            Phase::Placing { .. } => "placing",
            Phase::Battle { .. } => "battle",
            Phase::GameOver { .. } => "game_over",
            Phase::Closed(_) => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    OutOfPhase {
        phase: &'static str,
        message: MessageType,
        direction: Direction,
    },
    /// An attack_result for a different cell than the pending attack.
    CoordinateMismatch {
        expected: (u8, u8),
        got: (u8, u8),
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::OutOfPhase {
                phase,
                message,
                direction,
            } => {
                let verb = match direction {
                    Direction::Sent => "send",
                    Direction::Received => "receive",
                };
                write!(f, "Cannot {} {} while {}", verb, message, phase)
            }
            SessionError::CoordinateMismatch { expected, got } => write!(
                f,
                "Attack result for ({}, {}) does not match pending attack at ({}, {})",
                got.0, got.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// Protocol state of one client connection.
#[derive(Debug, Clone)]
pub struct Session {
    role: Role,
    phase: Phase,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            phase: Phase::Connecting { requested: false },
        }
    }

    pub fn host() -> Self {
        Self::new(Role::Host)
    }

    pub fn guest() -> Self {
        Self::new(Role::Guest)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Room code, once the host has been given one.
    pub fn room_code(&self) -> Option<&str> {
        match &self.phase {
            Phase::WaitingForOpponent { code } => Some(code),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. } | Phase::Closed(_))
    }

    fn first_turn(&self) -> Turn {
        match self.role {
            Role::Host => Turn::Mine,
            Role::Guest => Turn::Theirs,
        }
    }

    fn reject(&self, msg: &Message, direction: Direction) -> SessionError {
        SessionError::OutOfPhase {
            phase: self.phase.name(),
            message: msg.message_type(),
            direction,
        }
    }

    /// Validate and apply a message we are about to send.
    pub fn on_send(&mut self, msg: &Message) -> Result<(), SessionError> {
        let next = match (&self.phase, msg) {
            (Phase::Connecting { requested: false }, Message::CreateRoom)
                if self.role == Role::Host =>
            {
                Phase::Connecting { requested: true }
            }
            (Phase::Connecting { requested: false }, Message::JoinRoom { .. })
                if self.role == Role::Guest =>
            {
                Phase::Connecting { requested: true }
            }
            (
                Phase::Placing {
                    own_placed: false,
                    opponent_placed,
                },
                Message::ShipsPlaced,
            ) => {
                if *opponent_placed {
                    Phase::Battle {
                        turn: self.first_turn(),
                    }
                } else {
                    Phase::Placing {
                        own_placed: true,
                        opponent_placed: false,
                    }
                }
            }
            (Phase::Battle { turn: Turn::Mine }, Message::Attack { row, col }) => Phase::Battle {
                turn: Turn::AwaitingResult {
                    row: *row,
                    col: *col,
                },
            },
            (
                Phase::Battle {
                    turn: Turn::Responding { row, col },
                },
                Message::AttackResult {
                    row: r, col: c, ..
                },
            ) => {
                if (row, col) != (r, c) {
                    return Err(SessionError::CoordinateMismatch {
                        expected: (*row, *col),
                        got: (*r, *c),
                    });
                }
                Phase::Battle { turn: Turn::Mine }
            }
            (Phase::Battle { turn: Turn::Mine }, Message::GameOver { you_won }) => {
                Phase::GameOver { won: !you_won }
            }
            _ => return Err(self.reject(msg, Direction::Sent)),
        };
        self.phase = next;
        Ok(())
    }

    /// Validate and apply a message that just arrived.
    pub fn on_receive(&mut self, msg: &Message) -> Result<(), SessionError> {
        let next = match (&self.phase, msg) {
            (Phase::Connecting { requested: true }, Message::RoomCreated { code })
                if self.role == Role::Host =>
            {
                Phase::WaitingForOpponent { code: code.clone() }
            }
            (Phase::Connecting { requested: true }, Message::JoinError { message }) => {
                Phase::Closed(CloseReason::JoinRejected(message.clone()))
            }
            (Phase::Connecting { requested: true }, Message::GameStart)
                if self.role == Role::Guest =>
            {
                Phase::Placing {
                    own_placed: false,
                    opponent_placed: false,
                }
            }
            (Phase::WaitingForOpponent { .. }, Message::PlayerJoined) => Phase::Placing {
                own_placed: false,
                opponent_placed: false,
            },
            (
                Phase::Placing {
                    own_placed,
                    opponent_placed: false,
                },
                Message::ShipsPlaced,
            ) => {
                if *own_placed {
                    Phase::Battle {
                        turn: self.first_turn(),
                    }
                } else {
                    Phase::Placing {
                        own_placed: false,
                        opponent_placed: true,
                    }
                }
            }
            (Phase::Battle { turn: Turn::Theirs }, Message::Attack { row, col }) => Phase::Battle {
                turn: Turn::Responding {
                    row: *row,
                    col: *col,
                },
            },
            (
                Phase::Battle {
                    turn: Turn::AwaitingResult { row, col },
                },
                Message::AttackResult {
                    row: r, col: c, ..
                },
            ) => {
                if (row, col) != (r, c) {
                    return Err(SessionError::CoordinateMismatch {
                        expected: (*row, *col),
                        got: (*r, *c),
                    });
                }
                Phase::Battle { turn: Turn::Theirs }
            }
            (Phase::Battle { turn: Turn::Theirs }, Message::GameOver { you_won }) => {
                Phase::GameOver { won: *you_won }
            }
            (Phase::GameOver { won }, Message::OpponentLeft) => Phase::GameOver { won: *won },
            (Phase::Closed(_), _) => return Err(self.reject(msg, Direction::Received)),
            (_, Message::OpponentLeft) => Phase::Closed(CloseReason::OpponentLeft),
            _ => return Err(self.reject(msg, Direction::Received)),
        };
        self.phase = next;
        Ok(())
    }
}
