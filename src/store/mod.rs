use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::{debug, info, warn};
use rocket::tokio;
use rocket::tokio::sync::broadcast;
use serde::Serialize;
use serde_json::Value;

use crate::models::content::{defaults, ContentRecord};
use crate::models::normalize::{normalize, renormalize};
use crate::storage::Storage;

pub mod mutations;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Emitted whenever a store persists a value. Other stores attached to the
/// same storage reload when the key matches theirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageChange {
    pub key: String,
    /// Id of the store that wrote the value.
    pub origin: u64,
}

/// Sender half shared by every store attached to one `Storage`.
pub fn change_channel() -> broadcast::Sender<StorageChange> {
    let (tx, _) = broadcast::channel(64);
    tx
}

/// Owns the canonical in-memory `ContentRecord` and is the only writer of its
/// storage key.
pub struct ContentStore {
    id: u64,
    key: String,
    storage: Arc<Storage>,
    events: broadcast::Sender<StorageChange>,
    current: RwLock<ContentRecord>,
    /// Serializes read-modify-write sequences from `update`.
    write_lock: Mutex<()>,
}

impl ContentStore {
    /// Attach to `storage` under `key` and load the persisted content.
    pub fn open(
        storage: Arc<Storage>,
        key: &str,
        events: broadcast::Sender<StorageChange>,
    ) -> Self {
        let store = ContentStore {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::SeqCst),
            key: key.to_string(),
            storage,
            events,
            current: RwLock::new(defaults()),
            write_lock: Mutex::new(()),
        };
        store.load();
        store
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Re-read the persisted value, normalize it, and replace the cache.
    /// A missing or unparseable value is replaced by the defaults, which are
    /// written back so the next load sees a stable document. When the read
    /// itself fails the cached record is kept and nothing is written.
    pub fn load(&self) -> ContentRecord {
        let record = match self.storage.read(&self.key) {
            Err(e) => {
                warn!("Could not read content under {:?} ({}); keeping cached copy", self.key, e);
                return self.current();
            }
            Ok(None) => {
                info!("No stored content under {:?}; seeding defaults", self.key);
                self.persist_defaults()
            }
            Ok(Some(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(v @ Value::Object(_)) => normalize(&v),
                Ok(_) => {
                    warn!("Stored content under {:?} is not an object; restoring defaults", self.key);
                    self.persist_defaults()
                }
                Err(e) => {
                    warn!("Stored content under {:?} is not valid JSON ({}); restoring defaults", self.key, e);
                    self.persist_defaults()
                }
            },
        };

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = record.clone();
        record
    }

    /// Persist `record` as-is and make it the cached value. Callers are
    /// expected to pass normalized content.
    pub fn save(&self, record: &ContentRecord) {
        let text = match serde_json::to_string(record) {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to serialize content: {}", e);
                return;
            }
        };
        self.storage.write(&self.key, &text);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = record.clone();

        // No receivers is fine
        let _ = self.events.send(StorageChange {
            key: self.key.clone(),
            origin: self.id,
        });
        debug!("Saved content under {:?} ({} bytes)", self.key, text.len());
    }

    /// Snapshot of the cached record.
    pub fn current(&self) -> ContentRecord {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Clone the current record, let `f` mutate it, re-normalize and save.
    /// When `f` returns `None` nothing is written.
    pub fn update<R>(&self, f: impl FnOnce(&mut ContentRecord) -> Option<R>) -> Option<R> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = self.current();
        let out = f(&mut next)?;
        self.save(&renormalize(&next));
        Some(out)
    }

    /// Replace everything with the compiled-in defaults.
    pub fn reset(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.save(&defaults());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.events.subscribe()
    }

    /// React to a change notification. Reloads when another store wrote our
    /// key; our own writes and other keys are ignored. Returns whether a
    /// reload happened.
    pub fn handle_change(&self, change: &StorageChange) -> bool {
        if change.key != self.key || change.origin == self.id {
            return false;
        }
        debug!("Store {} reloading after write by store {}", self.id, change.origin);
        self.load();
        true
    }

    /// Keep this store in sync with writes from other stores for as long as
    /// the channel is open.
    pub fn spawn_listener(self: Arc<Self>) {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        self.handle_change(&change);
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Store {} missed {} change notifications; reloading", self.id, n);
                        self.load();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    fn persist_defaults(&self) -> ContentRecord {
        let record = defaults();
        match serde_json::to_string(&record) {
            Ok(text) => self.storage.write(&self.key, &text),
            Err(e) => warn!("Failed to serialize default content: {}", e),
        }
        record
    }
}
