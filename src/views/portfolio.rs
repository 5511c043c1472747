use crate::models::content::ContentRecord;

use super::{html_escape, safe_url};

pub fn render(record: &ContentRecord) -> String {
    let mut html = format!(
        r#"<section id="portfolio" class="portfolio"><p class="portfolio-intro">{}</p>"#,
        html_escape(&record.portfolio_intro)
    );

    if record.projects.is_empty() {
        html.push_str(r#"<p class="empty-state" data-empty="portfolio">No projects yet.</p></section>"#);
        return html;
    }

    html.push_str(r#"<div class="portfolio-grid">"#);
    for project in &record.projects {
        let media_html = project
            .media
            .as_ref()
            .and_then(|m| Some((safe_url(&m.src)?, &m.alt)))
            .map(|(src, alt)| {
                format!(
                    r#"<img src="{}" alt="{}" loading="lazy">"#,
                    html_escape(src),
                    html_escape(alt)
                )
            })
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<article class="project-card" data-id="{id}">{media}<h3>{title}</h3><p>{desc}</p></article>"#,
            id = html_escape(&project.id),
            media = media_html,
            title = html_escape(&project.title),
            desc = html_escape(&project.description),
        ));
    }
    html.push_str("</div></section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{defaults, Media};

    #[test]
    fn empty_portfolio_has_marker() {
        let mut rec = defaults();
        rec.projects.clear();
        assert!(render(&rec).contains(r#"data-empty="portfolio""#));
    }

    #[test]
    fn unsafe_media_is_dropped() {
        let mut rec = defaults();
        rec.projects[0].media = Some(Media { src: "data:text/html,<script>".into(), alt: "x".into() });
        rec.projects[1].media = Some(Media { src: "/static/p.png".into(), alt: "Editor".into() });
        let html = render(&rec);
        assert!(!html.contains("data:text/html"));
        assert!(html.contains(r#"<img src="/static/p.png" alt="Editor""#));
        assert_eq!(html.matches("<img").count(), 1);
    }
}
