//! HTML renderers. Each takes the content record explicitly and returns the
//! markup for one region of the page; none of them touch the store.

pub mod about;
pub mod admin;
pub mod blog;
pub mod contact;
pub mod layout;
pub mod portfolio;

use pulldown_cmark::{html, Event, Options, Parser};

/// Escapes braces too, so user text can never form a layout placeholder.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('{', "&#123;")
}

/// URI schemes allowed in rendered `href`/`src` attributes
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// `url` trimmed, if it is relative or uses an allowed scheme. Anything else
/// (`javascript:`, `data:`, `vbscript:` ...) yields `None`.
pub(crate) fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    // Browsers ignore tabs and newlines inside a scheme ("java\tscript:")
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    let scheme_end = compact.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(i) if compact[i..].starts_with(':') => {
            let scheme = compact[..i].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str()).then_some(url)
        }
        _ => Some(url),
    }
}

/// Percent-encode for use in a URL path segment or query value.
pub(crate) fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Render Markdown to HTML. Raw HTML in the source is escaped, not passed
/// through.
pub(crate) fn markdown_to_html(src: &str) -> String {
    let parser = Parser::new_ext(src, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.replace('{', "&#123;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn safe_url_allows_web_links_and_relative_paths() {
        assert_eq!(safe_url(" https://example.com/a "), Some("https://example.com/a"));
        assert_eq!(safe_url("HTTP://example.com"), Some("HTTP://example.com"));
        assert_eq!(safe_url("mailto:me@example.com"), Some("mailto:me@example.com"));
        assert_eq!(safe_url("/static/me.png"), Some("/static/me.png"));
        assert_eq!(safe_url("img/me.png"), Some("img/me.png"));
        assert_eq!(safe_url("?tab=blog#top"), Some("?tab=blog#top"));
    }

    #[test]
    fn safe_url_rejects_script_schemes() {
        for bad in [
            "javascript:alert(document.cookie)",
            "  JavaScript:alert(1)",
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "data:text/html;base64,PHNjcmlwdD4=",
            "vbscript:msgbox(1)",
            "",
            "   ",
        ] {
            assert_eq!(safe_url(bad), None, "{:?}", bad);
        }
    }

    #[test]
    fn markdown_basics() {
        let out = markdown_to_html("# Title\n\nSome **bold** and `code`.\n\n- one\n- two");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<strong>bold</strong>"));
        assert!(out.contains("<code>code</code>"));
        assert!(out.contains("<li>one</li>"));
    }

    #[test]
    fn braces_cannot_form_placeholders() {
        assert_eq!(html_escape("{{blog}}"), "&#123;&#123;blog}}");
        assert!(!markdown_to_html("see {{about}}").contains("{{"));
    }

    #[test]
    fn markdown_escapes_raw_html() {
        let out = markdown_to_html("hi <script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
