//! Wire protocol: a `{type, payload}` JSON envelope and the typed messages it
//! carries.
//!
//! The relay only ever looks at `type` for the session-control messages and
//! forwards everything else untouched; game clients decode envelopes into
//! [`Message`] and feed them through their [`Session`](crate::session::Session).

use core::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod payload;

pub use payload::*;

/// Raw message as it travels over the wire.
///
/// An envelope decoded with [`Envelope::from_json`] keeps the frame text it
/// came from and [`Envelope::to_json`] hands that text back unchanged, so a
/// relayed frame reaches the other side byte for byte. Equality compares only
/// `kind` and `payload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(skip)]
    raw: Option<String>,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            raw: None,
        }
    }

    /// Envelope with an empty `{}` payload.
    pub fn empty(kind: MessageType) -> Self {
        Self::new(kind.as_str(), Value::Object(Default::default()))
    }

    /// Frame text this envelope was decoded from, if any.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Recognised message type, if any.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::parse(&self.kind)
    }

    /// Wire text: the original frame if there is one, else a fresh encoding.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        if let Some(raw) = &self.raw {
            return Ok(raw.clone());
        }
        serde_json::to_string(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let mut envelope: Envelope =
            serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        envelope.raw = Some(text.to_string());
        Ok(envelope)
    }

    /// Decode the payload into `T`.
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        T::deserialize(&self.payload).map_err(|e| ProtocolError::InvalidPayload {
            kind: self.kind.clone(),
            reason: e.to_string(),
        })
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.payload == other.payload
    }
}

/// Every message type the protocol knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    CreateRoom,
    RoomCreated,
    JoinRoom,
    PlayerJoined,
    JoinError,
    GameStart,
    ShipsPlaced,
    Attack,
    AttackResult,
    GameOver,
    OpponentLeft,
}

impl MessageType {
    pub const ALL: [MessageType; 11] = [
        MessageType::CreateRoom,
        MessageType::RoomCreated,
        MessageType::JoinRoom,
        MessageType::PlayerJoined,
        MessageType::JoinError,
        MessageType::GameStart,
        MessageType::ShipsPlaced,
        MessageType::Attack,
        MessageType::AttackResult,
        MessageType::GameOver,
        MessageType::OpponentLeft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::CreateRoom => "create_room",
            MessageType::RoomCreated => "room_created",
            MessageType::JoinRoom => "join_room",
            MessageType::PlayerJoined => "player_joined",
            MessageType::JoinError => "join_error",
            MessageType::GameStart => "game_start",
            MessageType::ShipsPlaced => "ships_placed",
            MessageType::Attack => "attack",
            MessageType::AttackResult => "attack_result",
            MessageType::GameOver => "game_over",
            MessageType::OpponentLeft => "opponent_left",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == kind)
    }

    /// Messages the relay acts on itself instead of forwarding.
    pub fn is_session_control(self) -> bool {
        matches!(self, MessageType::CreateRoom | MessageType::JoinRoom)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    CreateRoom,
    RoomCreated { code: String },
    JoinRoom { code: String },
    PlayerJoined,
    JoinError { message: String },
    GameStart,
    ShipsPlaced,
    Attack { row: u8, col: u8 },
    AttackResult {
        row: u8,
        col: u8,
        hit: bool,
        sunk_ship_name: Option<String>,
    },
    GameOver { you_won: bool },
    OpponentLeft,
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::CreateRoom => MessageType::CreateRoom,
            Message::RoomCreated { .. } => MessageType::RoomCreated,
            Message::JoinRoom { .. } => MessageType::JoinRoom,
            Message::PlayerJoined => MessageType::PlayerJoined,
            Message::JoinError { .. } => MessageType::JoinError,
            Message::GameStart => MessageType::GameStart,
            Message::ShipsPlaced => MessageType::ShipsPlaced,
            Message::Attack { .. } => MessageType::Attack,
            Message::AttackResult { .. } => MessageType::AttackResult,
            Message::GameOver { .. } => MessageType::GameOver,
            Message::OpponentLeft => MessageType::OpponentLeft,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        let kind = self.message_type();
        let payload = match self {
            Message::RoomCreated { code } | Message::JoinRoom { code } => {
                encode(&RoomCode { code: code.clone() })
            }
            Message::JoinError { message } => encode(&ErrorPayload {
                message: message.clone(),
            }),
            Message::Attack { row, col } => encode(&AttackPayload {
                row: *row,
                col: *col,
            }),
            Message::AttackResult {
                row,
                col,
                hit,
                sunk_ship_name,
            } => encode(&AttackResultPayload {
                row: *row,
                col: *col,
                hit: *hit,
                sunk_ship_name: sunk_ship_name.clone(),
            }),
            Message::GameOver { you_won } => encode(&GameOverPayload { you_won: *you_won }),
            Message::CreateRoom
            | Message::PlayerJoined
            | Message::GameStart
            | Message::ShipsPlaced
            | Message::OpponentLeft => return Envelope::empty(kind),
        };
        Envelope::new(kind.as_str(), payload)
    }

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError> {
        let kind = envelope
            .message_type()
            .ok_or_else(|| ProtocolError::UnknownType(envelope.kind.clone()))?;
        let msg = match kind {
            MessageType::CreateRoom => Message::CreateRoom,
            MessageType::RoomCreated => {
                let p: RoomCode = envelope.parse_payload()?;
                Message::RoomCreated { code: p.code }
            }
            MessageType::JoinRoom => {
                let p: RoomCode = envelope.parse_payload()?;
                Message::JoinRoom { code: p.code }
            }
            MessageType::PlayerJoined => Message::PlayerJoined,
            MessageType::JoinError => {
                let p: ErrorPayload = envelope.parse_payload()?;
                Message::JoinError { message: p.message }
            }
            MessageType::GameStart => Message::GameStart,
            MessageType::ShipsPlaced => Message::ShipsPlaced,
            MessageType::Attack => {
                let p: AttackPayload = envelope.parse_payload()?;
                Message::Attack {
                    row: p.row,
                    col: p.col,
                }
            }
            MessageType::AttackResult => {
                let p: AttackResultPayload = envelope.parse_payload()?;
                Message::AttackResult {
                    row: p.row,
                    col: p.col,
                    hit: p.hit,
                    // peers may send "" for "nothing sunk"
                    sunk_ship_name: p.sunk_ship_name.filter(|name| !name.is_empty()),
                }
            }
            MessageType::GameOver => {
                let p: GameOverPayload = envelope.parse_payload()?;
                Message::GameOver { you_won: p.you_won }
            }
            MessageType::OpponentLeft => Message::OpponentLeft,
        };
        Ok(msg)
    }
}

impl From<&Message> for Envelope {
    fn from(msg: &Message) -> Self {
        msg.to_envelope()
    }
}

impl TryFrom<&Envelope> for Message {
    type Error = ProtocolError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        Message::from_envelope(envelope)
    }
}

fn encode<T: Serialize>(payload: &T) -> Value {
    // Plain structs of strings, integers and bools always serialize.
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

/// Errors raised while decoding protocol messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Text that is not a `{type, payload}` envelope.
    Malformed(String),
    UnknownType(String),
    InvalidPayload { kind: String, reason: String },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(reason) => write!(f, "Malformed envelope: {}", reason),
            ProtocolError::UnknownType(kind) => write!(f, "Unknown message type: {}", kind),
            ProtocolError::InvalidPayload { kind, reason } => {
                write!(f, "Invalid payload for {}: {}", kind, reason)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}
