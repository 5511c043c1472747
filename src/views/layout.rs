use crate::models::content::ContentRecord;
use crate::status::StatusMessage;

use super::blog::BlogFilter;
use super::{about, admin, blog, contact, html_escape, portfolio};

/// Tabs of the public page. Unknown values fall back to About.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    About,
    Portfolio,
    Blog,
    Contact,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::About, Tab::Portfolio, Tab::Blog, Tab::Contact];

    pub fn parse(s: Option<&str>) -> Tab {
        match s.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("portfolio") => Tab::Portfolio,
            Some("blog") => Tab::Blog,
            Some("contact") => Tab::Contact,
            _ => Tab::About,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::About => "about",
            Tab::Portfolio => "portfolio",
            Tab::Blog => "blog",
            Tab::Contact => "contact",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tab::About => "About",
            Tab::Portfolio => "Portfolio",
            Tab::Blog => "Blog",
            Tab::Contact => "Contact",
        }
    }
}

/// Everything a page needs besides the content record.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub site_name: &'a str,
    /// "light" or "dark"
    pub theme: &'a str,
    pub tab: Tab,
    pub filter: &'a BlogFilter,
    pub status: Option<&'a StatusMessage>,
    pub contact_flash: Option<(&'a str, &'a str)>,
}

pub const PUBLIC_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{theme}}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{site_name}}</title>
<link rel="stylesheet" href="/static/site.css">
</head>
<body data-active-tab="{{active_tab}}">
<canvas id="background-canvas"></canvas>
<header>
<h1>{{site_name}}</h1>
<form method="post" action="/theme"><button id="theme-toggle" type="submit">Toggle theme</button></form>
{{tabs}}
</header>
<main>
{{about}}
{{portfolio}}
{{blog}}
<section id="contact" class="contact">{{contact}}{{contact_form}}</section>
</main>
<footer><a href="/notes">Notes</a> · <a href="/admin">Edit</a></footer>
<script>new EventSource('/events').addEventListener('content-changed', function () { location.reload(); });</script>
<script src="/static/site.js" defer></script>
</body>
</html>
"#;

pub const ADMIN_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{theme}}">
<head>
<meta charset="utf-8">
<title>Edit · {{site_name}}</title>
<link rel="stylesheet" href="/static/site.css">
</head>
<body class="admin">
<header><h1>Edit {{site_name}}</h1><a href="/">View site</a></header>
{{status}}
<main>
{{admin_forms}}
<h2>Projects</h2>
{{admin_projects}}
<h2>Posts</h2>
{{admin_posts}}
</main>
<script>new EventSource('/events').addEventListener('content-changed', function () { location.reload(); });</script>
</body>
</html>
"#;

/// Page shells in use. The public shell can be replaced by a file on disk.
pub struct Layouts {
    pub public: String,
    pub admin: String,
}

impl Layouts {
    pub fn load(path: &str) -> Self {
        let public = if path.is_empty() {
            PUBLIC_LAYOUT.to_string()
        } else {
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    log::info!("Using page layout from {}", path);
                    text
                }
                Err(e) => {
                    log::warn!("Layout {} unreadable ({}); using built-in layout", path, e);
                    PUBLIC_LAYOUT.to_string()
                }
            }
        };
        Layouts {
            public,
            admin: ADMIN_LAYOUT.to_string(),
        }
    }
}

fn render_tabs(active: Tab) -> String {
    let mut html = String::from(r#"<nav class="tabs">"#);
    for tab in Tab::ALL {
        html.push_str(&format!(
            r#"<a href="/?tab={}" class="tab{}">{}</a>"#,
            tab.as_str(),
            if tab == active { " active" } else { "" },
            tab.label()
        ));
    }
    html.push_str("</nav>");
    html
}

/// Fill `layout` from `record`. A region is only rendered when its
/// `{{placeholder}}` appears in the layout, so layouts may carry any subset of
/// the views. Unknown placeholders are removed.
pub fn render_page(layout: &str, record: &ContentRecord, ctx: &PageContext<'_>) -> String {
    let mut html = layout.to_string();

    let mut fill = |tag: &str, render: &dyn Fn() -> String| {
        if html.contains(tag) {
            html = html.replace(tag, &render());
        }
    };

    fill("{{site_name}}", &|| html_escape(ctx.site_name));
    fill("{{theme}}", &|| html_escape(ctx.theme));
    fill("{{active_tab}}", &|| ctx.tab.as_str().to_string());
    fill("{{tabs}}", &|| render_tabs(ctx.tab));
    fill("{{about}}", &|| about::render(record));
    fill("{{portfolio}}", &|| portfolio::render(record));
    fill("{{blog}}", &|| blog::render(record, ctx.filter));
    fill("{{contact}}", &|| contact::render(record));
    fill("{{contact_form}}", &|| contact::render_form(ctx.contact_flash));
    fill("{{admin_forms}}", &|| admin::render_forms(record));
    fill("{{admin_projects}}", &|| admin::render_projects(record));
    fill("{{admin_posts}}", &|| admin::render_posts(record));
    fill("{{status}}", &|| admin::render_status(ctx.status));

    strip_unreplaced_placeholders(&html)
}

/// Remove any remaining {{placeholder}} tags from rendered HTML.
fn strip_unreplaced_placeholders(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end)
                if !after[..end].is_empty()
                    && after[..end]
                        .bytes()
                        .all(|b| b.is_ascii_lowercase() || b == b'_') =>
            {
                rest = &after[end + 2..];
            }
            _ => {
                result.push_str("{{");
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::defaults;

    fn ctx(filter: &BlogFilter) -> PageContext<'_> {
        PageContext {
            site_name: "Test <Site>",
            theme: "dark",
            tab: Tab::Blog,
            filter,
            status: None,
            contact_flash: None,
        }
    }

    #[test]
    fn full_layout_renders_every_region() {
        let filter = BlogFilter::default();
        let html = render_page(PUBLIC_LAYOUT, &defaults(), &ctx(&filter));
        assert!(html.contains(r#"id="about""#));
        assert!(html.contains(r#"class="portfolio-grid""#));
        assert!(html.contains(r#"class="blog-grid""#));
        assert!(html.contains(r#"id="contact-list""#));
        assert!(html.contains(r#"data-active-tab="blog""#));
        assert!(html.contains("Test &lt;Site&gt;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn missing_anchor_skips_the_view() {
        let filter = BlogFilter::default();
        let html = render_page("<main>{{about}}{{unknown_view}}</main>", &defaults(), &ctx(&filter));
        assert!(html.contains(r#"id="about""#));
        assert!(!html.contains("portfolio-grid"));
        assert!(!html.contains("blog-grid"));
        assert_eq!(html.matches("<main>").count(), 1);
        assert!(!html.contains("unknown_view"));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let filter = BlogFilter::from_query(None, None, Some("design"));
        let rec = defaults();
        assert_eq!(
            render_page(PUBLIC_LAYOUT, &rec, &ctx(&filter)),
            render_page(PUBLIC_LAYOUT, &rec, &ctx(&filter))
        );
    }

    #[test]
    fn non_placeholder_braces_survive() {
        assert_eq!(strip_unreplaced_placeholders("a {{x}} {{ B }} c"), "a  {{ B }} c");
    }

    #[test]
    fn tab_parsing_defaults_to_about() {
        assert_eq!(Tab::parse(Some("Blog")), Tab::Blog);
        assert_eq!(Tab::parse(Some("nope")), Tab::About);
        assert_eq!(Tab::parse(None), Tab::About);
    }
}
