use crate::models::content::{ContactKey, ContentRecord};

use super::{html_escape, safe_url};

/// Contact links, skipping empty entries. Email becomes a `mailto:` link.
/// Entries whose target is not a web or mail link are shown as plain text.
pub fn render(record: &ContentRecord) -> String {
    let mut html = String::from(r#"<ul id="contact-list" class="contact-list">"#);
    for (key, value) in record.contact.entries() {
        let href = match key {
            ContactKey::Email if !value.starts_with("mailto:") => format!("mailto:{}", value),
            _ => value.to_string(),
        };
        let item = match safe_url(&href) {
            Some(href) => format!(
                r#"<a href="{}" rel="noopener">{}</a>"#,
                html_escape(href),
                key.label()
            ),
            None => {
                log::warn!("Contact {} has an unsafe link; rendering it as text", key.as_str());
                format!(r#"<span class="contact-unlinked">{}</span>"#, key.label())
            }
        };
        html.push_str(&format!(
            r#"<li class="contact-{key}">{item}</li>"#,
            key = key.as_str(),
            item = item,
        ));
    }
    html.push_str("</ul>");
    html
}

/// Contact form. Sending is not wired to any backend yet; see
/// `routes::public::contact_submit`.
pub fn render_form(flash: Option<(&str, &str)>) -> String {
    let flash_html = match flash {
        Some((kind, msg)) => format!(
            r#"<div class="contact-flash contact-flash-{}">{}</div>"#,
            html_escape(kind),
            html_escape(msg)
        ),
        None => String::new(),
    };
    format!(
        r#"{flash_html}<form method="post" action="/contact" class="contact-form">
<label>Name <input type="text" name="name" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Message <textarea name="message" rows="5" required></textarea></label>
<button type="submit">Send</button>
</form>"#,
        flash_html = flash_html
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::defaults;

    #[test]
    fn skips_empty_entries() {
        let mut rec = defaults();
        rec.contact.email = "me@example.com".into();
        rec.contact.linkedin = "https://linkedin.com/in/me".into();
        let html = render(&rec);
        assert!(html.contains(r#"href="mailto:me@example.com""#));
        assert!(html.contains("contact-linkedin"));
        assert!(!html.contains("contact-instagram"));
        assert!(!html.contains("contact-facebook"));
    }

    #[test]
    fn script_links_are_not_clickable() {
        let mut rec = defaults();
        rec.contact.instagram = "javascript:alert(document.cookie)".into();
        rec.contact.facebook = " JAVASCRIPT:alert(1)".into();
        let html = render(&rec);
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
        assert!(html.contains(r#"<li class="contact-instagram"><span class="contact-unlinked">Instagram</span></li>"#));
        assert!(html.contains(r#"href="mailto:hello@example.com""#));
    }
}
