//! Room registry and relay.
//!
//! Lock discipline: the registry's `RwLock` guards only the code→room map.
//! Each [`Room`] has its own mutex over its two peer slots, held for the whole
//! of every join, relay and teardown on that room so that reading a slot and
//! sending to it cannot interleave with a concurrent unbind. The only place
//! both locks are held is teardown, always room first, then registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, Mutex as AsyncMutex, RwLock};

use crate::core::config::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
use crate::protocol::{Envelope, Message, MessageType, RoomCode};
use crate::session::Role;

pub type ConnId = u64;

/// Server-side handle for one connected client.
///
/// Owns the right to address the client (its outbound queue) but not the
/// socket itself; the connection worker owns that.
pub struct Peer {
    id: ConnId,
    outbox: mpsc::UnboundedSender<Envelope>,
    binding: Mutex<Option<Binding>>,
}

#[derive(Clone)]
struct Binding {
    room: Arc<Room>,
    role: Role,
}

impl Peer {
    pub fn id(&self) -> ConnId {
        self.id
    }

    /// Code of the room this peer is currently bound to.
    pub fn room_code(&self) -> Option<String> {
        self.binding().as_ref().map(|b| b.room.code.clone())
    }

    /// Role held in the current room.
    pub fn role(&self) -> Option<Role> {
        self.binding().as_ref().map(|b| b.role)
    }

    /// Queue an envelope for this peer. Returns `false` if its writer is gone.
    fn deliver(&self, envelope: Envelope) -> bool {
        self.outbox.send(envelope).is_ok()
    }

    fn binding(&self) -> MutexGuard<'_, Option<Binding>> {
        // nothing panics while holding this lock, but don't let poison spread
        self.binding.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peer")
            .field("id", &self.id)
            .field("room", &self.room_code())
            .finish()
    }
}

/// A pending or matched pair of peers.
pub struct Room {
    code: String,
    slots: AsyncMutex<Slots>,
}

#[derive(Default)]
struct Slots {
    host: Option<Arc<Peer>>,
    guest: Option<Arc<Peer>>,
    /// Guest seat held for a peer that is still leaving its previous room.
    reserved: Option<ConnId>,
    /// Set once teardown has started; a closed room accepts no joins.
    closed: bool,
}

impl Slots {
    fn check_vacancy(&self) -> Result<(), JoinError> {
        if self.closed {
            Err(JoinError::NotFound)
        } else if self.guest.is_some() || self.reserved.is_some() {
            Err(JoinError::Full)
        } else {
            Ok(())
        }
    }

    /// The occupant opposite `peer`, if `peer` is in this room at all.
    fn other(&self, peer: &Peer) -> Option<&Arc<Peer>> {
        let is = |slot: &Option<Arc<Peer>>| slot.as_ref().is_some_and(|p| p.id == peer.id);
        if is(&self.host) {
            self.guest.as_ref()
        } else if is(&self.guest) {
            self.host.as_ref()
        } else {
            None
        }
    }
}

impl Room {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Number of bound occupants.
    pub async fn occupants(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.host.iter().chain(slots.guest.iter()).count()
    }
}

/// Reasons a `join_room` request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    NotFound,
    Full,
    /// The requester is the host of that very room.
    AlreadyInRoom,
    InvalidPayload,
}

impl JoinError {
    /// Text sent back in the `join_error` payload.
    pub fn message(self) -> &'static str {
        match self {
            JoinError::NotFound => "Room not found",
            JoinError::Full => "Room is full",
            JoinError::AlreadyInRoom => "Already in this room",
            JoinError::InvalidPayload => "Invalid payload",
        }
    }
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for JoinError {}

/// Process-wide store of live rooms, shared by handle between connection
/// workers.
pub struct Registry {
    rooms: RwLock<HashMap<String, Arc<Room>>>,
    rng: Mutex<SmallRng>,
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self::with_rng(SmallRng::from_rng(&mut seed_rng))
    }

    /// Registry whose room codes come from a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection. The receiver yields everything addressed to
    /// it and should be drained into the socket by the caller.
    pub fn connect(&self) -> (Arc<Peer>, mpsc::UnboundedReceiver<Envelope>) {
        let (outbox, rx) = mpsc::unbounded_channel();
        let peer = Arc::new(Peer {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            outbox,
            binding: Mutex::new(None),
        });
        (peer, rx)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn contains(&self, code: &str) -> bool {
        self.rooms
            .read()
            .await
            .contains_key(&code.to_ascii_uppercase())
    }

    pub async fn room(&self, code: &str) -> Option<Arc<Room>> {
        self.rooms
            .read()
            .await
            .get(&code.to_ascii_uppercase())
            .cloned()
    }

    /// Route one inbound envelope from `peer`.
    pub async fn dispatch(&self, peer: &Arc<Peer>, envelope: Envelope) {
        let kind = match envelope.message_type() {
            Some(kind) if kind.is_session_control() => kind,
            _ => return self.relay(peer, envelope).await,
        };
        if kind == MessageType::CreateRoom {
            let code = self.create_room(peer).await;
            peer.deliver(Message::RoomCreated { code }.to_envelope());
            return;
        }
        let result = match envelope.parse_payload::<RoomCode>() {
            Ok(p) => self.join_room(peer, &p.code).await,
            Err(e) => {
                log::debug!("Peer {} sent bad join payload: {}", peer.id, e);
                Err(JoinError::InvalidPayload)
            }
        };
        if let Err(e) = result {
            peer.deliver(
                Message::JoinError {
                    message: e.message().to_string(),
                }
                .to_envelope(),
            );
        }
    }

    /// Open a new room with `peer` as host and return its code.
    ///
    /// A peer still bound to another room leaves it first.
    pub async fn create_room(&self, peer: &Arc<Peer>) -> String {
        self.disconnect(peer).await;

        let mut rooms = self.rooms.write().await;
        let code = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            allocate_code(&*rooms, || generate_room_code(&mut *rng))
        };
        let room = Arc::new(Room {
            code: code.clone(),
            slots: AsyncMutex::new(Slots {
                host: Some(peer.clone()),
                ..Slots::default()
            }),
        });
        rooms.insert(code.clone(), room.clone());
        drop(rooms);

        *peer.binding() = Some(Binding {
            room,
            role: Role::Host,
        });
        log::info!("Room created: {} (host {})", code, peer.id);
        code
    }

    /// Bind `peer` as guest of the room named `code`.
    ///
    /// On success the guest gets `game_start` and the host `player_joined`.
    /// A peer still bound elsewhere leaves that room only once the guest seat
    /// here is reserved for it; a refused join leaves it where it was.
    pub async fn join_room(&self, peer: &Arc<Peer>, code: &str) -> Result<(), JoinError> {
        let code = code.to_ascii_uppercase();
        let room = self.room(&code).await.ok_or(JoinError::NotFound)?;

        let current = peer.binding().clone();
        if let Some(binding) = &current {
            if Arc::ptr_eq(&binding.room, &room) {
                return Err(JoinError::AlreadyInRoom);
            }
        }

        if current.is_some() {
            {
                let mut slots = room.slots.lock().await;
                slots.check_vacancy()?;
                slots.reserved = Some(peer.id);
            }
            // never hold two room locks at once
            self.disconnect(peer).await;
        }

        let mut slots = room.slots.lock().await;
        if slots.reserved == Some(peer.id) {
            slots.reserved = None;
            if slots.closed {
                return Err(JoinError::NotFound);
            }
        } else {
            slots.check_vacancy()?;
        }
        slots.guest = Some(peer.clone());
        *peer.binding() = Some(Binding {
            room: room.clone(),
            role: Role::Guest,
        });

        peer.deliver(Envelope::empty(MessageType::GameStart));
        if let Some(host) = slots.host.as_ref() {
            host.deliver(Envelope::empty(MessageType::PlayerJoined));
        }
        log::info!("Player {} joined room: {}", peer.id, code);
        Ok(())
    }

    /// Forward `envelope` unchanged to the other occupant of `sender`'s room.
    /// Dropped if the sender is unbound or alone.
    pub async fn relay(&self, sender: &Arc<Peer>, envelope: Envelope) {
        let Some(binding) = sender.binding().clone() else {
            log::debug!("Dropping {} from unbound peer {}", envelope.kind, sender.id);
            return;
        };
        let slots = binding.room.slots.lock().await;
        if slots.closed {
            return;
        }
        match slots.other(sender) {
            Some(target) => {
                if !target.deliver(envelope) {
                    log::debug!("Relay target {} already gone", target.id);
                }
            }
            None => log::debug!(
                "Dropping {} in room {}: no opponent",
                envelope.kind,
                binding.room.code
            ),
        }
    }

    /// Tear down `peer`'s room: notify and unbind the other occupant, then
    /// remove the room from the registry. No-op for an unbound peer.
    pub async fn disconnect(&self, peer: &Arc<Peer>) {
        let Some(binding) = peer.binding().take() else {
            return;
        };
        let room = binding.room;
        let mut slots = room.slots.lock().await;
        if slots.closed {
            return;
        }
        slots.closed = true;

        if let Some(other) = slots.other(peer).cloned() {
            other.deliver(Envelope::empty(MessageType::OpponentLeft));
            let mut other_binding = other.binding();
            if other_binding
                .as_ref()
                .is_some_and(|b| Arc::ptr_eq(&b.room, &room))
            {
                *other_binding = None;
            }
        }
        slots.host = None;
        slots.guest = None;
        slots.reserved = None;

        let mut rooms = self.rooms.write().await;
        if rooms
            .get(&room.code)
            .is_some_and(|live| Arc::ptr_eq(live, &room))
        {
            rooms.remove(&room.code);
        }
        log::info!("Room closed: {} (peer {} left)", room.code, peer.id);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Four letters, each drawn independently and uniformly from A–Z.
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Draw codes until one is not already in use.
fn allocate_code<V>(rooms: &HashMap<String, V>, mut next: impl FnMut() -> String) -> String {
    loop {
        let code = next();
        if !rooms.contains_key(&code) {
            return code;
        }
        log::debug!("Room code collision on {}, retrying", code);
    }
}
