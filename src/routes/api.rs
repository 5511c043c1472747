use std::sync::Arc;

use rocket::response::stream::{Event, EventStream};
use rocket::serde::json::Json;
use rocket::tokio::select;
use rocket::tokio::sync::broadcast::error::RecvError;
use rocket::{Shutdown, State};
use serde_json::{json, Value};

use crate::models::content::ContentRecord;
use crate::models::normalize::normalize;
use crate::status::StatusBoard;
use crate::store::ContentStore;

// ── Export / import ────────────────────────────────────

#[get("/content")]
pub fn content_export(store: &State<Arc<ContentStore>>) -> Json<ContentRecord> {
    Json(store.current())
}

/// Replace the whole record. Whatever arrives is normalized first, so a
/// malformed upload degrades to defaults field by field.
#[put("/content", format = "json", data = "<body>")]
pub fn content_import(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    body: Json<Value>,
) -> Json<ContentRecord> {
    let incoming = normalize(&body.into_inner());
    store.update(move |rec| {
        *rec = incoming;
        Some(())
    });
    let record = store.current();
    log::info!(
        "Imported content: {} project(s), {} post(s)",
        record.projects.len(),
        record.posts.len()
    );
    status.show("success", "Content imported.");
    Json(record)
}

// ── Health ─────────────────────────────────────────────

#[get("/health")]
pub fn health(store: &State<Arc<ContentStore>>) -> Json<Value> {
    let record = store.current();
    Json(json!({
        "ok": true,
        "storage_supported": store.storage().is_supported(),
        "projects": record.projects.len(),
        "posts": record.posts.len(),
    }))
}

// ── Change notifications ───────────────────────────────

/// One `content-changed` event per persisted write, for open pages to reload.
#[get("/events")]
pub fn events(store: &State<Arc<ContentStore>>, mut end: Shutdown) -> EventStream![] {
    let mut rx = store.subscribe();
    let key = store.key().to_string();
    EventStream! {
        loop {
            let change = select! {
                msg = rx.recv() => match msg {
                    Ok(change) => change,
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(_)) => continue,
                },
                _ = &mut end => break,
            };
            if change.key != key {
                continue;
            }
            yield Event::json(&change).event("content-changed");
        }
    }
}

/// Mounted under `/api`.
pub fn routes() -> Vec<rocket::Route> {
    routes![content_export, content_import]
}

/// Mounted at the root.
pub fn service_routes() -> Vec<rocket::Route> {
    routes![health, events]
}
