//! The session store.

use super::storage::{FileSlots, MemorySlots, SessionSlots, Slot, StorageError};
use crate::auth::models::Identity;
use log::debug;
use std::path::PathBuf;

/// Single source of truth for the current identity and bearer token.
///
/// Every mutation writes through to the backing slots before updating the
/// in-memory view, so a restart can never observe a session that differs
/// from what a caller last saw. The store holds data only; state
/// transitions belong to the auth gateway, its sole writer.
pub struct SessionStore {
    slots: Box<dyn SessionSlots>,
    identity: Option<Identity>,
    token: Option<String>,
    pending_email: Option<String>,
}

impl SessionStore {
    /// Create a store over an arbitrary slot backing. The store starts
    /// empty; call [`restore`](Self::restore) to hydrate it.
    pub fn new(slots: Box<dyn SessionSlots>) -> Self {
        Self {
            slots,
            identity: None,
            token: None,
            pending_email: None,
        }
    }

    /// Store backed by one file per slot under `dir`.
    pub fn on_disk(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileSlots::new(dir)))
    }

    /// Ephemeral store for tests and one-shot sessions.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySlots::new()))
    }

    /// Hydrate from persisted slots.
    ///
    /// A session is restored only when both the token and a parseable
    /// identity are present; anything partial or malformed is treated as
    /// "no session" and never surfaces as an error. A session and a
    /// pending-email marker are mutually exclusive, so whichever of the
    /// two is restored evicts the other's slot.
    pub fn restore(&mut self) {
        let token = self.slots.read(Slot::Token);
        let identity = self
            .slots
            .read(Slot::Identity)
            .and_then(|raw| match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    debug!("discarding malformed persisted identity: {e}");
                    None
                }
            });

        match (token, identity) {
            (Some(token), Some(identity)) => {
                self.token = Some(token);
                self.identity = Some(identity);
                self.pending_email = None;
                self.slots.remove(Slot::PendingEmail);
            }
            _ => {
                self.token = None;
                self.identity = None;
                self.pending_email = self.slots.read(Slot::PendingEmail);
            }
        }
    }

    /// Atomically set identity + token and persist both before returning.
    /// Clears any pending-email marker: a committed session and a pending
    /// verification cannot coexist.
    pub fn commit(&mut self, identity: Identity, token: String) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&identity)?;
        self.slots.write(Slot::Token, &token)?;
        self.slots.write(Slot::Identity, &serialized)?;
        self.slots.remove(Slot::PendingEmail);
        self.identity = Some(identity);
        self.token = Some(token);
        self.pending_email = None;
        Ok(())
    }

    /// Empty the store and remove all persisted material. Never fails.
    pub fn clear(&mut self) {
        self.slots.remove(Slot::Token);
        self.slots.remove(Slot::Identity);
        self.slots.remove(Slot::PendingEmail);
        self.identity = None;
        self.token = None;
        self.pending_email = None;
    }

    /// Mark a verification as pending for `email`. Owned by the auth
    /// gateway; never called while a session is committed.
    pub fn set_pending_email(&mut self, email: &str) -> Result<(), StorageError> {
        self.slots.write(Slot::PendingEmail, email)?;
        self.pending_email = Some(email.to_string());
        Ok(())
    }

    /// Drop the pending-email marker, persisted and in memory.
    pub fn clear_pending_email(&mut self) {
        self.slots.remove(Slot::PendingEmail);
        self.pending_email = None;
    }

    /// A session is active iff it holds a non-empty token for a verified
    /// identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(
            (&self.token, &self.identity),
            (Some(token), Some(identity)) if !token.is_empty() && identity.email_verified
        )
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn identity(verified: bool) -> Identity {
        Identity {
            id: "9".to_string(),
            name: "Avery Driver".to_string(),
            email: "driver@hospital.com".to_string(),
            role: Role::AmbulanceDriver,
            hospital_id: Some("1".to_string()),
            hospital_name: Some("Riverside General".to_string()),
            email_verified: verified,
        }
    }

    fn store_pair() -> (SessionStore, MemorySlots) {
        let slots = MemorySlots::new();
        (SessionStore::new(Box::new(slots.clone())), slots)
    }

    #[test]
    fn commit_then_restore_reproduces_the_session() {
        let (mut store, slots) = store_pair();
        store.commit(identity(true), "tok-1".to_string()).unwrap();
        assert!(store.is_authenticated());

        // Same backing, fresh store: a process restart.
        let mut reloaded = SessionStore::new(Box::new(slots));
        reloaded.restore();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), Some("tok-1"));
        assert_eq!(reloaded.identity(), Some(&identity(true)));
    }

    #[test]
    fn restore_ignores_malformed_identity() {
        let (mut store, mut slots) = store_pair();
        slots.write(Slot::Token, "tok-1").unwrap();
        slots.write(Slot::Identity, "{not json").unwrap();
        store.restore();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn restore_ignores_token_without_identity() {
        let (mut store, mut slots) = store_pair();
        slots.write(Slot::Token, "tok-1").unwrap();
        store.restore();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn restore_prefers_session_over_stale_pending_marker() {
        let (mut store, mut slots) = store_pair();
        slots.write(Slot::PendingEmail, "driver@hospital.com").unwrap();
        store.commit(identity(true), "tok-1".to_string()).unwrap();

        let mut reloaded = SessionStore::new(Box::new(slots.clone()));
        reloaded.restore();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.pending_email(), None);
        assert_eq!(slots.read(Slot::PendingEmail), None);
    }

    #[test]
    fn restore_recovers_pending_marker_without_session() {
        let (mut store, mut slots) = store_pair();
        slots.write(Slot::PendingEmail, "driver@hospital.com").unwrap();
        store.restore();
        assert!(!store.is_authenticated());
        assert_eq!(store.pending_email(), Some("driver@hospital.com"));
    }

    #[test]
    fn unverified_identity_is_never_active() {
        let (mut store, _slots) = store_pair();
        store.commit(identity(false), "tok-1".to_string()).unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn commit_clears_pending_marker() {
        let (mut store, slots) = store_pair();
        store.set_pending_email("driver@hospital.com").unwrap();
        store.commit(identity(true), "tok-1".to_string()).unwrap();
        assert_eq!(store.pending_email(), None);
        assert_eq!(slots.read(Slot::PendingEmail), None);
    }

    #[test]
    fn clear_empties_all_three_slots() {
        let (mut store, slots) = store_pair();
        store.commit(identity(true), "tok-1".to_string()).unwrap();
        store.set_pending_email("x@hospital.com").unwrap();
        store.clear();
        assert!(!store.is_authenticated());
        assert_eq!(slots.read(Slot::Token), None);
        assert_eq!(slots.read(Slot::Identity), None);
        assert_eq!(slots.read(Slot::PendingEmail), None);
    }
}
