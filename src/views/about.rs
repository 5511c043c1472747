use crate::models::content::ContentRecord;

use super::html_escape;

/// One paragraph per blank-line-separated block of the about text.
pub fn render(record: &ContentRecord) -> String {
    let mut html = String::from(r#"<section id="about" class="about">"#);
    for para in record
        .about
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        html.push_str(&format!("<p>{}</p>", html_escape(para).replace('\n', "<br>")));
    }
    html.push_str("</section>");
    html
}
