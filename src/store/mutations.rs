use crate::models::content::{ContactKey, Media, Post, Project};
use crate::models::normalize::split_tags;

use super::ContentStore;

#[derive(Debug, Default, Clone)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub media_src: String,
    pub media_alt: String,
}

#[derive(Debug, Default, Clone)]
pub struct PostInput {
    pub title: String,
    pub body: String,
    /// Comma-separated
    pub tags: String,
    /// `YYYY-MM-DD`; blank means today
    pub published: String,
    pub image_src: String,
    pub image_alt: String,
}

#[derive(Debug, Default, Clone)]
pub struct SectionsInput {
    pub about: String,
    pub portfolio_intro: String,
}

#[derive(Debug, Default, Clone)]
pub struct ContactInput {
    pub email: String,
    pub instagram: String,
    pub facebook: String,
    pub linkedin: String,
}

/// Random id for a new entity. Uniqueness against existing ids is not checked.
fn fresh_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &hex[..8])
}

fn media(src: &str, alt: &str) -> Option<Media> {
    if src.trim().is_empty() {
        return None;
    }
    Some(Media {
        src: src.trim().to_string(),
        alt: alt.trim().to_string(),
    })
}

pub fn add_project(store: &ContentStore, input: ProjectInput) -> Result<Project, String> {
    if input.title.trim().is_empty() || input.description.trim().is_empty() {
        return Err("Title and description are required.".to_string());
    }
    let id = fresh_id("project");
    let project = Project {
        id: id.clone(),
        title: input.title,
        description: input.description,
        media: media(&input.media_src, &input.media_alt),
    };
    store.update(|rec| {
        rec.projects.push(project);
        Some(())
    });
    store
        .current()
        .projects
        .into_iter()
        .rfind(|p| p.id == id)
        .ok_or_else(|| "Project was not saved.".to_string())
}

pub fn add_post(store: &ContentStore, input: PostInput) -> Result<Post, String> {
    if input.title.trim().is_empty() || input.body.trim().is_empty() {
        return Err("Title and body are required.".to_string());
    }
    let id = fresh_id("post");
    let post = Post {
        id: id.clone(),
        title: input.title,
        body: input.body,
        tags: split_tags(&input.tags),
        published: input.published.trim().to_string(),
        image: media(&input.image_src, &input.image_alt),
    };
    store.update(|rec| {
        rec.posts.push(post);
        Some(())
    });
    store
        .current()
        .posts
        .into_iter()
        .rfind(|p| p.id == id)
        .ok_or_else(|| "Post was not saved.".to_string())
}

/// Remove every project whose id equals `id`. Returns false when none matched.
pub fn remove_project(store: &ContentStore, id: &str) -> bool {
    store
        .update(|rec| {
            let before = rec.projects.len();
            rec.projects.retain(|p| p.id != id);
            (rec.projects.len() != before).then_some(())
        })
        .is_some()
}

pub fn remove_post(store: &ContentStore, id: &str) -> bool {
    store
        .update(|rec| {
            let before = rec.posts.len();
            rec.posts.retain(|p| p.id != id);
            (rec.posts.len() != before).then_some(())
        })
        .is_some()
}

/// Blank sections fall back to the defaults on re-normalization.
pub fn update_sections(store: &ContentStore, input: SectionsInput) {
    store.update(|rec| {
        rec.about = input.about;
        rec.portfolio_intro = input.portfolio_intro;
        Some(())
    });
}

pub fn update_contact(store: &ContentStore, input: ContactInput) {
    store.update(|rec| {
        rec.contact.set(ContactKey::Email, input.email);
        rec.contact.set(ContactKey::Instagram, input.instagram);
        rec.contact.set(ContactKey::Facebook, input.facebook);
        rec.contact.set(ContactKey::Linkedin, input.linkedin);
        Some(())
    });
}
