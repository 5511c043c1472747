use chrono::NaiveDate;

use crate::models::content::{ContentRecord, Post};

use super::{html_escape, markdown_to_html, safe_url, urlencode};

/// Blog grid filter. All present predicates must hold.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlogFilter {
    /// Inclusive
    pub start: Option<NaiveDate>,
    /// Inclusive
    pub end: Option<NaiveDate>,
    pub tag: Option<String>,
}

impl BlogFilter {
    /// Build from raw query values. Blank or unparseable values are ignored.
    pub fn from_query(start: Option<&str>, end: Option<&str>, tag: Option<&str>) -> Self {
        let date = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        };
        BlogFilter {
            start: date(start),
            end: date(end),
            tag: tag
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.tag.is_none()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let date = post.published_date();
        if let Some(start) = self.start {
            if !date.is_some_and(|d| d >= start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if !date.is_some_and(|d| d <= end) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !post.has_tag(tag) {
                return false;
            }
        }
        true
    }
}

/// Posts passing `filter`, newest first. Equal dates keep their original
/// order; posts without a parseable date sort last.
pub fn filter_posts<'a>(posts: &'a [Post], filter: &BlogFilter) -> Vec<&'a Post> {
    let mut out: Vec<&Post> = posts.iter().filter(|p| filter.matches(p)).collect();
    // None < Some(_), so reversing the comparison puts undated posts last
    out.sort_by(|a, b| b.published_date().cmp(&a.published_date()));
    out
}

fn render_filters(filter: &BlogFilter) -> String {
    let fmt = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    format!(
        r#"<form class="blog-filters" method="get" action="/">
<input type="hidden" name="tab" value="blog">
<label>From <input type="date" name="start" value="{start}"></label>
<label>To <input type="date" name="end" value="{end}"></label>
<label>Tag <input type="text" name="tag" value="{tag}" placeholder="any"></label>
<button type="submit">Filter</button>
<a href="/?tab=blog" class="blog-filters-reset">Reset</a>
</form>"#,
        start = fmt(filter.start),
        end = fmt(filter.end),
        tag = html_escape(filter.tag.as_deref().unwrap_or("")),
    )
}

fn render_post(post: &Post) -> String {
    let image_html = post
        .image
        .as_ref()
        .and_then(|m| Some((safe_url(&m.src)?, &m.alt)))
        .map(|(src, alt)| {
            format!(
                r#"<div class="post-image"><img src="{}" alt="{}" loading="lazy"></div>"#,
                html_escape(src),
                html_escape(alt)
            )
        })
        .unwrap_or_default();

    let tags_html = if post.tags.is_empty() {
        String::new()
    } else {
        let links: Vec<String> = post
            .tags
            .iter()
            .map(|t| {
                format!(
                    r#"<a href="/?tab=blog&amp;tag={}" class="post-tag">{}</a>"#,
                    html_escape(&urlencode(t)),
                    html_escape(t)
                )
            })
            .collect();
        format!(r#"<div class="post-tags">{}</div>"#, links.join(" "))
    };

    format!(
        r#"<article class="post-card" data-id="{id}">{image}<h3>{title}</h3><time datetime="{date}">{date}</time><div class="post-body">{body}</div>{tags}</article>"#,
        id = html_escape(&post.id),
        image = image_html,
        title = html_escape(&post.title),
        date = html_escape(&post.published),
        body = markdown_to_html(&post.body),
        tags = tags_html,
    )
}

pub fn render(record: &ContentRecord, filter: &BlogFilter) -> String {
    let mut html = String::from(r#"<section id="blog" class="blog">"#);
    html.push_str(&render_filters(filter));

    let posts = filter_posts(&record.posts, filter);
    if posts.is_empty() {
        html.push_str(r#"<p class="empty-state" data-empty="blog">No posts match.</p></section>"#);
        return html;
    }

    html.push_str(r#"<div class="blog-grid">"#);
    for post in posts {
        html.push_str(&render_post(post));
    }
    html.push_str("</div></section>");
    html
}
