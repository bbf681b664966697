//! Room registry: the single process-wide owner of live rooms.
//!
//! Lookups, inserts, and removals are atomic with respect to each
//! other because `DashMap` shards its internal locking beneath a
//! lock-free-looking API; callers never observe a partial insert or a
//! lost delete (invariant: at most one Room per `roomCode`).

use crate::protocol::room_codes::generate_room_code;
use crate::protocol::RoomCode;
use crate::room::RoomHandle;
use dashmap::DashMap;
use std::sync::Arc;

/// How many times `mint` retries on a collision before giving up. With
/// 4-character codes the birthday bound makes repeated collisions
/// vanishingly unlikely until the registry holds hundreds of rooms
/// Retries with a fresh code on collision instead of failing outright.
const MINT_RETRY_LIMIT: usize = 32;

/// Process-wide `roomCode -> Room` map.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomCode, Arc<RoomHandle>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Insert a room, failing if its code is already taken. Callers
    /// that mint their own code should prefer [`RoomRegistry::mint`].
    pub fn insert(&self, handle: Arc<RoomHandle>) -> Result<(), Arc<RoomHandle>> {
        let code = handle.code().clone();
        match self.rooms.entry(code) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(handle),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<Arc<RoomHandle>> {
        self.rooms.get(code).map(|entry| entry.value().clone())
    }

    /// Remove a room, but only if the registry still holds this exact
    /// instance (guards the host-disconnect/expiry timer race described
    /// preventing the late timer from evicting a room that was already reused.
    pub fn remove_if_current(&self, code: &str, expected: &Arc<RoomHandle>) -> bool {
        let Some((_, current)) = self.rooms.remove_if(code, |_, v| Arc::ptr_eq(v, expected))
        else {
            return false;
        };
        drop(current);
        true
    }

    pub fn remove(&self, code: &str) -> Option<Arc<RoomHandle>> {
        self.rooms.remove(code).map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Iterate over every live room. Used by the lifecycle manager for
    /// expiry sweeps and graceful shutdown fan-out.
    pub fn for_each(&self, mut f: impl FnMut(Arc<RoomHandle>)) {
        for entry in self.rooms.iter() {
            f(entry.value().clone());
        }
    }

    /// Build a room via `make` using a freshly minted, registry-unique
    /// code, inserting it atomically. Retries on collision.
    pub fn mint(
        &self,
        make: impl Fn(RoomCode) -> Arc<RoomHandle>,
    ) -> Option<Arc<RoomHandle>> {
        for _ in 0..MINT_RETRY_LIMIT {
            let code = generate_room_code();
            if self.rooms.contains_key(&code) {
                continue;
            }
            let handle = make(code);
            if self.insert(handle.clone()).is_ok() {
                return Some(handle);
            }
        }
        None
    }
}
