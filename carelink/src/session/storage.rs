//! Key/value slots backing the session store.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur while persisting session material.
///
/// Reads never produce these: unreadable or malformed persisted data is
/// treated as an absent slot, not an error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing a slot to disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing session material failed
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The three persisted session slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Token,
    Identity,
    PendingEmail,
}

impl Slot {
    fn file_name(self) -> &'static str {
        match self {
            Slot::Token => "token",
            Slot::Identity => "identity.json",
            Slot::PendingEmail => "pending_email",
        }
    }
}

/// Storage backing for the session store.
///
/// All access is synchronous; the store is the sole reader and writer, so
/// implementations need no locking discipline beyond their own interior
/// mutability.
pub trait SessionSlots: Send {
    /// Read a slot. Absent, unreadable, or empty slots all read as `None`.
    fn read(&self, slot: Slot) -> Option<String>;

    /// Write a slot, replacing any previous value, durable on return.
    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing an absent slot is not an error.
    fn remove(&mut self, slot: Slot);
}

/// One file per slot under a directory.
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }
}

impl SessionSlots for FileSlots {
    fn read(&self, slot: Slot) -> Option<String> {
        match fs::read_to_string(self.path(slot)) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(slot), value)?;
        Ok(())
    }

    fn remove(&mut self, slot: Slot) {
        let _ = fs::remove_file(self.path(slot));
    }
}

/// In-memory slots for tests and ephemeral sessions.
///
/// Clones share the same underlying map, which lets a test hand "the same
/// disk" to a second store to simulate a process restart.
#[derive(Clone, Default)]
pub struct MemorySlots {
    slots: Arc<Mutex<HashMap<Slot, String>>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSlots for MemorySlots {
    fn read(&self, slot: Slot) -> Option<String> {
        self.slots
            .lock()
            .expect("session slots poisoned")
            .get(&slot)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .expect("session slots poisoned")
            .insert(slot, value.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: Slot) {
        self.slots
            .lock()
            .expect("session slots poisoned")
            .remove(&slot);
    }
}
