use std::sync::{Arc, Mutex};
use std::time::Duration;

use rocket::tokio;
use rocket::tokio::task::JoinHandle;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: String,
    pub text: String,
    pub generation: u64,
}

#[derive(Default)]
struct Slot {
    message: Option<StatusMessage>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// One transient admin message at a time. Each new message cancels the
/// previous clear timer, and a timer only clears the message it was started
/// for.
#[derive(Clone)]
pub struct StatusBoard {
    slot: Arc<Mutex<Slot>>,
    clear_after: Duration,
}

impl StatusBoard {
    pub fn new(clear_after: Duration) -> Self {
        StatusBoard {
            slot: Arc::new(Mutex::new(Slot::default())),
            clear_after,
        }
    }

    /// Replace the current message. Returns its generation.
    pub fn show(&self, kind: &str, text: &str) -> u64 {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.generation += 1;
        let generation = slot.generation;
        slot.message = Some(StatusMessage {
            kind: kind.to_string(),
            text: text.to_string(),
            generation,
        });
        if let Some(old) = slot.timer.take() {
            old.abort();
        }

        // Outside a runtime (unit tests, CLI use) the message stays until replaced.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let board = self.clone();
            let delay = self.clear_after;
            slot.timer = Some(handle.spawn(async move {
                tokio::time::sleep(delay).await;
                board.clear_if(generation);
            }));
        }
        generation
    }

    /// Clear the message only if it is still the one from `generation`.
    pub fn clear_if(&self, generation: u64) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.message.as_ref().map(|m| m.generation) != Some(generation) {
            return false;
        }
        slot.message = None;
        slot.timer = None;
        true
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .message
            .clone()
    }
}
