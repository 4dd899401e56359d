//! Durable session storage.
//!
//! The [`SessionStore`] is the single source of truth for "who is signed in
//! and with what token". It writes through to its [`SessionSlots`] backing
//! synchronously, so there is never a window where a session is observed in
//! memory but would not survive a restart.
//!
//! Three independent slots are persisted: the bearer token, the serialized
//! identity, and (while a verification is in flight) the pending-email
//! marker. Logout removes all three together.

pub mod storage;
pub mod store;

pub use storage::{FileSlots, MemorySlots, SessionSlots, Slot, StorageError};
pub use store::SessionStore;
