use std::sync::Arc;

use rocket::form::Form;
use rocket::http::{Cookie, CookieJar};
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::State;

use crate::config::SiteConfig;
use crate::notes::NotesLibrary;
use crate::store::ContentStore;
use crate::views::blog::BlogFilter;
use crate::views::html_escape;
use crate::views::layout::{render_page, Layouts, PageContext, Tab};

pub(crate) fn theme_of(cookies: &CookieJar<'_>) -> &'static str {
    match cookies.get("theme").map(|c| c.value()) {
        Some("dark") => "dark",
        _ => "light",
    }
}

// ── Landing page ───────────────────────────────────────

#[get("/?<tab>&<start>&<end>&<tag>")]
pub fn index(
    store: &State<Arc<ContentStore>>,
    config: &State<SiteConfig>,
    layouts: &State<Layouts>,
    cookies: &CookieJar<'_>,
    flash: Option<FlashMessage<'_>>,
    tab: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    tag: Option<&str>,
) -> RawHtml<String> {
    let record = store.current();
    let filter = BlogFilter::from_query(start, end, tag);
    let ctx = PageContext {
        site_name: &config.site_name,
        theme: theme_of(cookies),
        tab: Tab::parse(tab),
        filter: &filter,
        status: None,
        contact_flash: flash.as_ref().map(|f| (f.kind(), f.message())),
    };
    RawHtml(render_page(&layouts.public, &record, &ctx))
}

#[post("/theme")]
pub fn toggle_theme(cookies: &CookieJar<'_>) -> Redirect {
    let next = if theme_of(cookies) == "dark" { "light" } else { "dark" };
    cookies.add(Cookie::new("theme", next));
    Redirect::to("/")
}

// ── Contact form ───────────────────────────────────────

#[derive(FromForm)]
pub struct ContactFormData {
    #[field(default = String::new())]
    pub name: String,
    #[field(default = String::new())]
    pub email: String,
    #[field(default = String::new())]
    pub message: String,
}

/// Sending is not implemented; valid submissions get a static failure notice.
#[post("/contact", data = "<form>")]
pub fn contact_submit(form: Form<ContactFormData>) -> Flash<Redirect> {
    let back = Redirect::to("/?tab=contact");
    if [&form.name, &form.email, &form.message]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Flash::error(back, "Please fill in your name, email and message.");
    }
    log::info!(
        "Contact form submitted by {:?} ({} chars); no delivery backend configured",
        form.email.trim(),
        form.message.len()
    );
    Flash::error(
        back,
        "Sending messages isn't available yet. Please reach out using the links above.",
    )
}

// ── Notes ──────────────────────────────────────────────

fn notes_page(config: &SiteConfig, theme: &str, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{theme}\"><head><meta charset=\"utf-8\">\
         <title>{title} · {site}</title><link rel=\"stylesheet\" href=\"/static/site.css\"></head>\
         <body class=\"notes\"><header><a href=\"/\">{site}</a> / <a href=\"/notes\">Notes</a></header>\
         <main><h1>{title}</h1>{body}</main></body></html>",
        theme = theme,
        title = html_escape(title),
        site = html_escape(&config.site_name),
        body = body,
    )
}

#[get("/notes")]
pub fn notes_index(
    notes: &State<NotesLibrary>,
    config: &State<SiteConfig>,
    cookies: &CookieJar<'_>,
) -> RawHtml<String> {
    RawHtml(notes_page(config, theme_of(cookies), "Notes", &notes.render_index()))
}

#[get("/notes/<slug>")]
pub fn note_single(
    notes: &State<NotesLibrary>,
    config: &State<SiteConfig>,
    cookies: &CookieJar<'_>,
    slug: &str,
) -> Option<RawHtml<String>> {
    let entry = notes.find(slug)?;
    let body = notes.render(&entry);
    Some(RawHtml(notes_page(config, theme_of(cookies), &entry.title, &body)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, toggle_theme, contact_submit, notes_index, note_single]
}
