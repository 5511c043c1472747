#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::{FileServer, Options};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Request, Rocket};

mod boot;
mod config;
mod db;
mod models;
mod notes;
mod routes;
mod status;
mod storage;
mod store;
mod views;


use config::SiteConfig;
use notes::NotesLibrary;
use status::StatusBoard;
use storage::{SqliteKv, Storage};
use store::ContentStore;
use views::layout::Layouts;

/// Editor and content API responses are never cached.
const UNCACHED_PREFIXES: &[&str] = &["/admin", "/api/"];

pub struct NoStoreContent;

#[rocket::async_trait]
impl Fairing for NoStoreContent {
    fn info(&self) -> Info {
        Info { name: "No-Store Editor & API", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut rocket::Response<'r>) {
        let path = req.uri().path();
        if UNCACHED_PREFIXES.iter().any(|p| path.starts_with(p)) {
            res.set_header(Header::new("Cache-Control", "no-store"));
        }
    }
}

/// Minimal page in the site's own shell for catcher responses.
fn error_page(req: &Request<'_>, heading: &str, detail: &str) -> RawHtml<String> {
    let site = req
        .rocket()
        .state::<SiteConfig>()
        .map(|c| c.site_name.as_str())
        .unwrap_or("folio");
    let theme = routes::public::theme_of(req.cookies());
    RawHtml(format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{theme}\"><head><meta charset=\"utf-8\">\
         <title>{heading} · {site}</title><link rel=\"stylesheet\" href=\"/static/site.css\"></head>\
         <body class=\"error-page\"><header><a href=\"/\">{site}</a></header>\
         <main><h1>{heading}</h1><p class=\"empty-state\">{detail}</p></main></body></html>",
        theme = theme,
        heading = views::html_escape(heading),
        site = views::html_escape(site),
        detail = views::html_escape(detail),
    ))
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> RawHtml<String> {
    error_page(req, "Nothing here", "That page doesn't exist. Try the tabs on the home page.")
}

#[catch(500)]
fn server_error(req: &Request<'_>) -> RawHtml<String> {
    log::error!("500 on {}", req.uri());
    error_page(req, "Something broke", "The page could not be rendered. Your content is unchanged.")
}

/// SQLite-backed storage, or an in-memory one when the database can't be opened.
fn open_storage(config: &SiteConfig) -> Storage {
    let pool = db::init_pool(&config.db_path).and_then(|pool| {
        db::run_migrations(&pool)?;
        Ok(pool)
    });
    match pool {
        Ok(pool) => Storage::new(Box::new(SqliteKv::new(pool))),
        Err(e) => {
            log::error!("Database {} unavailable: {}", config.db_path, e);
            Storage::memory_only()
        }
    }
}

/// Assemble the server around `storage`. Split from `rocket()` so tests can
/// supply their own storage.
pub fn build(config: SiteConfig, storage: Arc<Storage>) -> Rocket<Build> {
    let store = Arc::new(ContentStore::open(
        storage,
        &config.storage_key,
        store::change_channel(),
    ));
    if !store.storage().is_supported() {
        log::warn!("Edits will be lost when the server stops");
    }

    let status = StatusBoard::new(config.status_clear);
    let notes = NotesLibrary::new(&config.notes_dir);
    let layouts = Layouts::load(&config.layout_path);

    rocket::build()
        .manage(store)
        .manage(status)
        .manage(notes)
        .manage(layouts)
        .manage(config)
        .attach(NoStoreContent)
        .mount("/static", FileServer::new("website/static", Options::Missing))
        .mount("/", routes::public::routes())
        .mount("/", routes::api::service_routes())
        .mount("/admin", routes::admin::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = SiteConfig::load();
    boot::run(&config);

    let storage = Arc::new(open_storage(&config));
    build(config, storage)
}
