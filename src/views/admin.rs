use crate::models::content::ContentRecord;
use crate::status::StatusMessage;

use super::{html_escape, urlencode};

pub fn render_projects(record: &ContentRecord) -> String {
    if record.projects.is_empty() {
        return r#"<p class="empty-state" data-empty="admin-projects">No projects.</p>"#.to_string();
    }
    let mut html = String::from(
        r#"<table id="admin-projects" class="admin-table"><thead><tr><th>Title</th><th>Description</th><th></th></tr></thead><tbody>"#,
    );
    for p in &record.projects {
        html.push_str(&format!(
            r#"<tr data-id="{id}"><td>{title}</td><td>{desc}</td><td><form method="post" action="/admin/projects/{id_path}/delete"><button type="submit">Remove</button></form></td></tr>"#,
            id = html_escape(&p.id),
            id_path = html_escape(&urlencode(&p.id)),
            title = html_escape(&p.title),
            desc = html_escape(&p.description),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

pub fn render_posts(record: &ContentRecord) -> String {
    if record.posts.is_empty() {
        return r#"<p class="empty-state" data-empty="admin-posts">No posts.</p>"#.to_string();
    }
    let mut html = String::from(
        r#"<table id="admin-posts" class="admin-table"><thead><tr><th>Title</th><th>Published</th><th>Tags</th><th></th></tr></thead><tbody>"#,
    );
    for p in &record.posts {
        html.push_str(&format!(
            r#"<tr data-id="{id}"><td>{title}</td><td>{date}</td><td>{tags}</td><td><form method="post" action="/admin/posts/{id_path}/delete"><button type="submit">Remove</button></form></td></tr>"#,
            id = html_escape(&p.id),
            id_path = html_escape(&urlencode(&p.id)),
            title = html_escape(&p.title),
            date = html_escape(&p.published),
            tags = html_escape(&p.tags.join(", ")),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

/// Section, contact, project and post forms, prefilled where it makes sense.
pub fn render_forms(record: &ContentRecord) -> String {
    let c = &record.contact;
    format!(
        r#"<form id="admin-sections" method="post" action="/admin/sections">
<label>About <textarea name="about" rows="6">{about}</textarea></label>
<label>Portfolio intro <input type="text" name="portfolio_intro" value="{intro}"></label>
<button type="submit">Save sections</button>
</form>
<form id="admin-contact" method="post" action="/admin/contact">
<label>Email <input type="text" name="email" value="{email}"></label>
<label>Instagram <input type="url" name="instagram" value="{instagram}"></label>
<label>Facebook <input type="url" name="facebook" value="{facebook}"></label>
<label>LinkedIn <input type="url" name="linkedin" value="{linkedin}"></label>
<button type="submit">Save contact</button>
</form>
<form id="admin-project" method="post" action="/admin/projects">
<label>Title <input type="text" name="title" required></label>
<label>Description <textarea name="description" rows="3" required></textarea></label>
<label>Image URL <input type="text" name="media_src"></label>
<label>Image alt <input type="text" name="media_alt"></label>
<button type="submit">Add project</button>
</form>
<form id="admin-post" method="post" action="/admin/posts">
<label>Title <input type="text" name="title" required></label>
<label>Body (Markdown) <textarea name="body" rows="6" required></textarea></label>
<label>Tags <input type="text" name="tags" placeholder="comma, separated"></label>
<label>Published <input type="date" name="published"></label>
<label>Image URL <input type="text" name="image_src"></label>
<label>Image alt <input type="text" name="image_alt"></label>
<button type="submit">Add post</button>
</form>
<form id="admin-reset" method="post" action="/admin/reset">
<button type="submit">Restore defaults</button>
</form>"#,
        about = html_escape(&record.about),
        intro = html_escape(&record.portfolio_intro),
        email = html_escape(&c.email),
        instagram = html_escape(&c.instagram),
        facebook = html_escape(&c.facebook),
        linkedin = html_escape(&c.linkedin),
    )
}

pub fn render_status(status: Option<&StatusMessage>) -> String {
    match status {
        Some(m) => format!(
            r#"<div id="admin-status" class="status status-{}" data-generation="{}">{}</div>"#,
            html_escape(&m.kind),
            m.generation,
            html_escape(&m.text)
        ),
        None => r#"<div id="admin-status" class="status"></div>"#.to_string(),
    }
}
