use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use log::{debug, warn};
use rusqlite::params;

use crate::db::DbPool;

const PROBE_KEY: &str = "__folio_probe__";

/// Raw key-value byte store the content store persists into.
/// Implementations: `SqliteKv` (the `kv_store` table).
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

pub struct SqliteKv {
    pool: DbPool,
}

impl SqliteKv {
    pub fn new(pool: DbPool) -> Self {
        SqliteKv { pool }
    }
}

impl KvBackend for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        match conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        ) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Persistence adapter over a `KvBackend`.
///
/// The first access runs a capability probe (trial write + delete). When the
/// probe fails, or a later native write fails, every read and write for the
/// rest of the process goes to an in-memory mirror instead. The storage is
/// never re-probed.
pub struct Storage {
    backend: Option<Box<dyn KvBackend>>,
    probed: OnceLock<bool>,
    /// Cleared on the first failed native write.
    native_ok: AtomicBool,
    warned: AtomicBool,
    mirror: Mutex<HashMap<String, String>>,
}

impl Storage {
    pub fn new(backend: Box<dyn KvBackend>) -> Self {
        Storage {
            backend: Some(backend),
            probed: OnceLock::new(),
            native_ok: AtomicBool::new(true),
            warned: AtomicBool::new(false),
            mirror: Mutex::new(HashMap::new()),
        }
    }

    /// Storage with no native backend at all. Every write lands in the mirror.
    pub fn memory_only() -> Self {
        Storage {
            backend: None,
            probed: OnceLock::new(),
            native_ok: AtomicBool::new(false),
            warned: AtomicBool::new(false),
            mirror: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the native backend is usable. Runs the trial write + delete
    /// once; the answer is cached for the lifetime of this `Storage`.
    pub fn probe(&self) -> bool {
        *self.probed.get_or_init(|| {
            let Some(backend) = self.backend.as_ref() else {
                self.warn_once("no persistent backend configured");
                return false;
            };
            let result = backend
                .set(PROBE_KEY, PROBE_KEY)
                .and_then(|_| backend.remove(PROBE_KEY));
            match result {
                Ok(()) => {
                    debug!("Storage probe succeeded");
                    true
                }
                Err(e) => {
                    self.warn_once(&e);
                    false
                }
            }
        })
    }

    /// True while reads and writes go to the native backend.
    pub fn is_supported(&self) -> bool {
        self.probe() && self.native_ok.load(Ordering::SeqCst)
    }

    /// `Ok(None)` means nothing is stored under `key`. A failed backend read
    /// is an error, never an absent value.
    pub fn read(&self, key: &str) -> Result<Option<String>, String> {
        if self.is_supported() {
            if let Some(backend) = self.backend.as_ref() {
                return backend.get(key).map_err(|e| {
                    warn!("Storage read of {:?} failed: {}", key, e);
                    e
                });
            }
        }
        Ok(self.mirror_guard().get(key).cloned())
    }

    /// Write `value` under `key`. Never fails from the caller's point of view:
    /// a failed native write switches the storage to the mirror for good and
    /// the value is kept there.
    pub fn write(&self, key: &str, value: &str) {
        if self.is_supported() {
            if let Some(backend) = self.backend.as_ref() {
                match backend.set(key, value) {
                    Ok(()) => return,
                    Err(e) => {
                        self.native_ok.store(false, Ordering::SeqCst);
                        self.warn_once(&e);
                    }
                }
            }
        }
        self.mirror_guard().insert(key.to_string(), value.to_string());
    }

    fn mirror_guard(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.mirror.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn warn_once(&self, reason: &str) {
        if !self.warned.swap(true, Ordering::SeqCst) {
            warn!(
                "Persistent storage unavailable ({}); content is kept in memory for this session",
                reason
            );
        }
    }
}
