#![cfg_attr(not(test), no_std)]

use core::num::NonZeroU64;
use dashmap::DashMap;

pub use model::Session;

/// Storage for in-progress quizzes, keyed by the Discord ID of the user taking them.
///
/// Handlers only ever perform a single call per store access, so an implementation
/// need not provide anything stronger than "last write wins" per user.
pub trait SessionStore: Send + Sync {
    /// Retrieves a copy of the user's current session, if any.
    fn get(&self, user: NonZeroU64) -> Option<Session>;
    /// Replaces the user's session. Returns the session that was overwritten.
    fn set(&self, user: NonZeroU64, session: Session) -> Option<Session>;
    /// Discards the user's session. Returns the session that was removed.
    fn delete(&self, user: NonZeroU64) -> Option<Session>;
}

/// Process-wide in-memory store. Everything is lost on restart.
#[derive(Default)]
pub struct MemoryStore(DashMap<NonZeroU64, Session>);

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, user: NonZeroU64) -> Option<Session> {
        self.0.get(&user).map(|entry| entry.value().clone())
    }

    fn set(&self, user: NonZeroU64, session: Session) -> Option<Session> {
        self.0.insert(user, session)
    }

    fn delete(&self, user: NonZeroU64) -> Option<Session> {
        self.0.remove(&user).map(|(_, session)| session)
    }
}
