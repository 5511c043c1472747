use std::sync::Arc;

use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;

use crate::config::SiteConfig;
use crate::status::StatusBoard;
use crate::store::mutations::{
    self, ContactInput, PostInput, ProjectInput, SectionsInput,
};
use crate::store::ContentStore;
use crate::views::blog::BlogFilter;
use crate::views::layout::{render_page, Layouts, PageContext, Tab};

use super::public::theme_of;

fn back() -> Redirect {
    Redirect::to("/admin")
}

#[get("/")]
pub fn dashboard(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    config: &State<SiteConfig>,
    layouts: &State<Layouts>,
    cookies: &CookieJar<'_>,
) -> RawHtml<String> {
    let record = store.current();
    let message = status.current();
    let filter = BlogFilter::default();
    let ctx = PageContext {
        site_name: &config.site_name,
        theme: theme_of(cookies),
        tab: Tab::About,
        filter: &filter,
        status: message.as_ref(),
        contact_flash: None,
    };
    RawHtml(render_page(&layouts.admin, &record, &ctx))
}

// ── Sections & contact ─────────────────────────────────

#[derive(FromForm)]
pub struct SectionsFormData {
    #[field(default = String::new())]
    pub about: String,
    #[field(default = String::new())]
    pub portfolio_intro: String,
}

#[post("/sections", data = "<form>")]
pub fn sections_save(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    form: Form<SectionsFormData>,
) -> Redirect {
    let form = form.into_inner();
    mutations::update_sections(
        store,
        SectionsInput {
            about: form.about,
            portfolio_intro: form.portfolio_intro,
        },
    );
    status.show("success", "Sections saved.");
    back()
}

#[derive(FromForm)]
pub struct ContactFormData {
    #[field(default = String::new())]
    pub email: String,
    #[field(default = String::new())]
    pub instagram: String,
    #[field(default = String::new())]
    pub facebook: String,
    #[field(default = String::new())]
    pub linkedin: String,
}

#[post("/contact", data = "<form>")]
pub fn contact_save(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    form: Form<ContactFormData>,
) -> Redirect {
    let form = form.into_inner();
    mutations::update_contact(
        store,
        ContactInput {
            email: form.email,
            instagram: form.instagram,
            facebook: form.facebook,
            linkedin: form.linkedin,
        },
    );
    status.show("success", "Contact links saved.");
    back()
}

// ── Projects ───────────────────────────────────────────

#[derive(FromForm)]
pub struct ProjectFormData {
    #[field(default = String::new())]
    pub title: String,
    #[field(default = String::new())]
    pub description: String,
    #[field(default = String::new())]
    pub media_src: String,
    #[field(default = String::new())]
    pub media_alt: String,
}

#[post("/projects", data = "<form>")]
pub fn project_create(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    form: Form<ProjectFormData>,
) -> Redirect {
    let form = form.into_inner();
    let input = ProjectInput {
        title: form.title,
        description: form.description,
        media_src: form.media_src,
        media_alt: form.media_alt,
    };
    match mutations::add_project(store, input) {
        Ok(p) => {
            log::info!("Added project {:?}", p.id);
            status.show("success", &format!("Added project \"{}\".", p.title));
        }
        Err(e) => {
            status.show("error", &e);
        }
    }
    back()
}

#[post("/projects/<id>/delete")]
pub fn project_delete(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    id: &str,
) -> Redirect {
    if mutations::remove_project(store, id) {
        log::info!("Removed project {:?}", id);
        status.show("success", "Project removed.");
    } else {
        status.show("error", "No such project.");
    }
    back()
}

// ── Posts ──────────────────────────────────────────────

#[derive(FromForm)]
pub struct PostFormData {
    #[field(default = String::new())]
    pub title: String,
    #[field(default = String::new())]
    pub body: String,
    #[field(default = String::new())]
    pub tags: String,
    #[field(default = String::new())]
    pub published: String,
    #[field(default = String::new())]
    pub image_src: String,
    #[field(default = String::new())]
    pub image_alt: String,
}

#[post("/posts", data = "<form>")]
pub fn post_create(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    form: Form<PostFormData>,
) -> Redirect {
    let form = form.into_inner();
    let input = PostInput {
        title: form.title,
        body: form.body,
        tags: form.tags,
        published: form.published,
        image_src: form.image_src,
        image_alt: form.image_alt,
    };
    match mutations::add_post(store, input) {
        Ok(p) => {
            log::info!("Added post {:?}", p.id);
            status.show("success", &format!("Published \"{}\".", p.title));
        }
        Err(e) => {
            status.show("error", &e);
        }
    }
    back()
}

#[post("/posts/<id>/delete")]
pub fn post_delete(
    store: &State<Arc<ContentStore>>,
    status: &State<StatusBoard>,
    id: &str,
) -> Redirect {
    if mutations::remove_post(store, id) {
        log::info!("Removed post {:?}", id);
        status.show("success", "Post removed.");
    } else {
        status.show("error", "No such post.");
    }
    back()
}

#[post("/reset")]
pub fn reset(store: &State<Arc<ContentStore>>, status: &State<StatusBoard>) -> Redirect {
    store.reset();
    log::warn!("Content reset to defaults");
    status.show("success", "Defaults restored.");
    back()
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        dashboard,
        sections_save,
        contact_save,
        project_create,
        project_delete,
        post_create,
        post_delete,
        reset,
    ]
}
