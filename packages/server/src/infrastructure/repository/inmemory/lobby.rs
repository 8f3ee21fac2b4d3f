//! In-memory lobby registry.
//!
//! ## Locking
//!
//! Two levels: one registry lock over the token→player and code→room maps, and
//! one lock per room over its membership, host and state. A room lock is only
//! ever acquired while the registry lock is already held, and is released
//! first. Every path therefore takes the locks in the same order (registry,
//! then room) and no path can deadlock against another.
//!
//! The registry lock is the only await point in any operation. Room locks are
//! plain `std` mutexes whose critical sections never await, so an operation
//! that is dropped mid-way has either not started writing or has finished.
//!
//! Nothing is sent to a socket while either lock is held: mutations return a
//! [`RoomSnapshot`] and the caller broadcasts it afterwards.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as RoomMutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Announcement, ConnectionHandle, ConnectionId, Departure, DisplayName, Expiry, IdGenerator,
    LeaveOutcome, LobbyError, LobbyRepository, Player, RandomIdGenerator, Room, RoomCode,
    RoomSnapshot, SessionToken, Timestamp,
    factory::{unique_room_code, unique_session_token},
};

type SharedRoom = Arc<RoomMutex<Room>>;

fn lock_room(shared: &SharedRoom) -> MutexGuard<'_, Room> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<SessionToken, Player>,
    rooms: HashMap<RoomCode, SharedRoom>,
}

/// What happened to a room after a member was taken out of it
enum Removal {
    RoomMissing,
    RoomDeleted,
    Remaining(SharedRoom),
}

/// In-memory implementation of [`LobbyRepository`].
pub struct InMemoryLobbyRepository {
    registry: Mutex<Registry>,
    generator: Arc<dyn IdGenerator>,
}

impl InMemoryLobbyRepository {
    /// Create an empty registry drawing identifiers from `generator`.
    pub fn new(generator: Arc<dyn IdGenerator>) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            generator,
        }
    }

    /// Create an empty registry with an OS-seeded generator.
    pub fn with_os_rng() -> Self {
        Self::new(Arc::new(RandomIdGenerator::from_os_rng()))
    }
}

/// Take `token` out of room `code`, deleting the room if it empties.
///
/// Caller holds the registry lock.
fn remove_member(registry: &mut Registry, code: &RoomCode, token: &SessionToken) -> Removal {
    let Some(shared) = registry.rooms.get(code).cloned() else {
        return Removal::RoomMissing;
    };

    let departure = lock_room(&shared).remove_member(token);
    match departure {
        Departure::Emptied => {
            registry.rooms.remove(code);
            tracing::info!(room = %code, "Last member left, room deleted");
            Removal::RoomDeleted
        }
        Departure::Remaining {
            new_host: Some(host),
        } => {
            let host_name = registry
                .sessions
                .get(&host)
                .map(Player::name_or_default)
                .unwrap_or_default();
            tracing::info!(room = %code, new_host = %host_name, "Host left, host reassigned");
            Removal::Remaining(shared)
        }
        Departure::Remaining { new_host: None } => Removal::Remaining(shared),
        Departure::NotMember => {
            tracing::warn!(room = %code, "Player pointed at a room it was not a member of");
            Removal::Remaining(shared)
        }
    }
}

/// Put a resumed player back into its room.
///
/// Caller holds the registry lock. If the room is gone the player's stale room
/// reference is cleared.
fn readmit(
    registry: &mut Registry,
    code: &RoomCode,
    token: &SessionToken,
) -> Option<RoomSnapshot> {
    let Some(shared) = registry.rooms.get(code).cloned() else {
        if let Some(player) = registry.sessions.get_mut(token) {
            player.room_code = None;
        }
        tracing::warn!(room = %code, "Resumed player's room no longer exists");
        return None;
    };

    let mut room = lock_room(&shared);
    room.add_member(token.clone());
    Some(RoomSnapshot::capture(&room, &registry.sessions))
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn resolve_or_create(
        &self,
        token: Option<SessionToken>,
        connection: ConnectionHandle,
        now: Timestamp,
    ) -> Announcement {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        if let Some(token) = token.filter(|t| registry.sessions.contains_key(t)) {
            let room_code = registry.sessions.get_mut(&token).and_then(|player| {
                player.connection = Some(connection.clone());
                player.last_active_at = now;
                player.room_code.clone()
            });

            let room = match room_code {
                Some(code) => readmit(registry, &code, &token),
                None => None,
            };

            if let Some(player) = registry.sessions.get(&token) {
                tracing::info!(player = %player.name_or_default(), "Session resumed");
                return Announcement {
                    player: player.clone(),
                    resumed: true,
                    room,
                };
            }
        }

        let token = unique_session_token(self.generator.as_ref(), |t| {
            registry.sessions.contains_key(t)
        });
        let player = Player::new(token.clone(), connection, now);
        registry.sessions.insert(token, player.clone());
        tracing::info!(sessions = registry.sessions.len(), "Session created");

        Announcement {
            player,
            resumed: false,
            room: None,
        }
    }

    async fn lookup(&self, token: &SessionToken) -> Option<Player> {
        let registry = self.registry.lock().await;
        registry.sessions.get(token).cloned()
    }

    async fn touch(&self, token: &SessionToken, now: Timestamp) {
        let mut registry = self.registry.lock().await;
        if let Some(player) = registry.sessions.get_mut(token) {
            player.last_active_at = player.last_active_at.max(now);
        }
    }

    async fn detach_connection(
        &self,
        token: &SessionToken,
        connection_id: ConnectionId,
        now: Timestamp,
    ) -> Option<RoomSnapshot> {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        let player = registry.sessions.get_mut(token)?;
        if player.connection.as_ref().map(ConnectionHandle::id) != Some(connection_id) {
            tracing::debug!(
                connection = %connection_id,
                "Connection already replaced, leaving session attached"
            );
            return None;
        }
        player.connection = None;
        player.last_active_at = now;

        let code = player.room_code.clone()?;
        let shared = registry.rooms.get(&code).cloned()?;
        let room = lock_room(&shared);
        Some(RoomSnapshot::capture(&room, &registry.sessions))
    }

    async fn create_room(
        &self,
        token: &SessionToken,
        display_name: DisplayName,
        now: Timestamp,
    ) -> Result<RoomSnapshot, LobbyError> {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        let player = registry
            .sessions
            .get_mut(token)
            .ok_or(LobbyError::NoSuchSession)?;
        player.last_active_at = now;
        if player.room_code.is_some() {
            return Err(LobbyError::AlreadyInRoom);
        }

        let code = unique_room_code(self.generator.as_ref(), |c| registry.rooms.contains_key(c));
        let shared = Arc::new(RoomMutex::new(Room::new(code.clone(), token.clone(), now)));
        registry.rooms.insert(code.clone(), Arc::clone(&shared));

        if let Some(player) = registry.sessions.get_mut(token) {
            player.display_name = Some(display_name);
            player.room_code = Some(code.clone());
        }

        tracing::info!(room = %code, rooms = registry.rooms.len(), "Room created");
        let room = lock_room(&shared);
        Ok(RoomSnapshot::capture(&room, &registry.sessions))
    }

    async fn join_room(
        &self,
        code: &RoomCode,
        token: &SessionToken,
        display_name: DisplayName,
        now: Timestamp,
    ) -> Result<RoomSnapshot, LobbyError> {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        let player = registry
            .sessions
            .get_mut(token)
            .ok_or(LobbyError::NoSuchSession)?;
        player.last_active_at = now;
        if player.room_code.is_some() {
            return Err(LobbyError::AlreadyInRoom);
        }

        let shared = registry
            .rooms
            .get(code)
            .cloned()
            .ok_or(LobbyError::RoomNotFound)?;
        let mut room = lock_room(&shared);

        if let Some(player) = registry.sessions.get_mut(token) {
            player.display_name = Some(display_name);
            player.room_code = Some(code.clone());
        }
        room.add_member(token.clone());

        tracing::info!(room = %code, members = room.len(), "Player joined room");
        Ok(RoomSnapshot::capture(&room, &registry.sessions))
    }

    async fn leave_room(
        &self,
        token: &SessionToken,
        now: Timestamp,
    ) -> Result<LeaveOutcome, LobbyError> {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        let player = registry
            .sessions
            .get_mut(token)
            .ok_or(LobbyError::NoSuchSession)?;
        player.last_active_at = now;
        let Some(code) = player.room_code.take() else {
            return Ok(LeaveOutcome::AlreadyLeft);
        };

        let remaining = match remove_member(registry, &code, token) {
            Removal::RoomMissing | Removal::RoomDeleted => None,
            Removal::Remaining(shared) => {
                let room = lock_room(&shared);
                Some(RoomSnapshot::capture(&room, &registry.sessions))
            }
        };

        Ok(LeaveOutcome::Left { code, remaining })
    }

    async fn start_game(
        &self,
        token: &SessionToken,
        now: Timestamp,
    ) -> Result<RoomSnapshot, LobbyError> {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        let player = registry
            .sessions
            .get_mut(token)
            .ok_or(LobbyError::NoSuchSession)?;
        player.last_active_at = now;
        let code = player.room_code.clone().ok_or(LobbyError::NotInRoom)?;

        let shared = registry
            .rooms
            .get(&code)
            .cloned()
            .ok_or(LobbyError::NotInRoom)?;
        let mut room = lock_room(&shared);
        room.start_game()?;

        tracing::info!(room = %code, members = room.len(), "Game started");
        Ok(RoomSnapshot::capture(&room, &registry.sessions))
    }

    async fn expire_inactive(&self, cutoff: Timestamp) -> Expiry {
        let mut guard = self.registry.lock().await;
        let registry = &mut *guard;

        let stale: Vec<SessionToken> = registry
            .sessions
            .values()
            .filter(|p| !p.is_connected() && p.last_active_at < cutoff)
            .map(|p| p.token.clone())
            .collect();

        let mut expiry = Expiry::default();
        let mut changed: Vec<(RoomCode, SharedRoom)> = Vec::new();

        for token in stale {
            let room_code = registry
                .sessions
                .get(&token)
                .and_then(|p| p.room_code.clone());

            if let Some(code) = room_code {
                match remove_member(registry, &code, &token) {
                    Removal::RoomMissing => {}
                    Removal::RoomDeleted => {
                        changed.retain(|(c, _)| c != &code);
                        expiry.deleted_rooms.push(code);
                    }
                    Removal::Remaining(shared) => {
                        if !changed.iter().any(|(c, _)| c == &code) {
                            changed.push((code, shared));
                        }
                    }
                }
            }

            registry.sessions.remove(&token);
            expiry.expired.push(token);
        }

        for (_, shared) in changed {
            let room = lock_room(&shared);
            expiry
                .changed_rooms
                .push(RoomSnapshot::capture(&room, &registry.sessions));
        }

        expiry
    }

    async fn room_snapshot(&self, code: &RoomCode) -> Option<RoomSnapshot> {
        let registry = self.registry.lock().await;
        let shared = registry.rooms.get(code).cloned()?;
        let room = lock_room(&shared);
        Some(RoomSnapshot::capture(&room, &registry.sessions))
    }

    async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let registry = self.registry.lock().await;
        let rooms: Vec<SharedRoom> = registry.rooms.values().cloned().collect();
        let mut snapshots = Vec::with_capacity(rooms.len());
        for shared in rooms {
            let room = lock_room(&shared);
            snapshots.push(RoomSnapshot::capture(&room, &registry.sessions));
        }
        snapshots.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
        snapshots
    }

    async fn count_sessions(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.sessions.len()
    }
}
