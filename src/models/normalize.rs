//! Repairs arbitrary parsed JSON into a valid [`ContentRecord`].
//!
//! Every function here is total: malformed input never errors, it falls back
//! to the compiled-in defaults field by field. Projects and posts that lack a
//! title or body are dropped rather than repaired.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::content::{defaults, Contact, ContactKey, ContentRecord, Media, Post, Project};

pub fn normalize(raw: &Value) -> ContentRecord {
    normalize_on(raw, chrono::Local::now().date_naive())
}

/// `normalize` with an explicit "today", used for posts without a valid date.
pub fn normalize_on(raw: &Value, today: NaiveDate) -> ContentRecord {
    let base = defaults();
    let Value::Object(obj) = raw else {
        return base;
    };

    ContentRecord {
        about: text_or(obj.get("about"), base.about),
        portfolio_intro: text_or(obj.get("portfolioIntro"), base.portfolio_intro),
        contact: normalize_contact(obj.get("contact"), base.contact),
        projects: match obj.get("projects") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| normalize_project(v, i))
                .collect(),
            _ => base.projects,
        },
        posts: match obj.get("posts") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| normalize_post(v, i, today))
                .collect(),
            _ => base.posts,
        },
    }
}

/// Run an in-memory record back through the normalizer.
pub fn renormalize(record: &ContentRecord) -> ContentRecord {
    match serde_json::to_value(record) {
        Ok(v) => normalize(&v),
        Err(e) => {
            log::warn!("Could not serialize content for normalization: {}", e);
            record.clone()
        }
    }
}

fn trimmed(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn text_or(v: Option<&Value>, fallback: String) -> String {
    trimmed(v).unwrap_or(fallback)
}

fn normalize_contact(v: Option<&Value>, mut contact: Contact) -> Contact {
    if let Some(Value::Object(map)) = v {
        for key in ContactKey::ALL {
            if let Some(value) = trimmed(map.get(key.as_str())) {
                contact.set(key, value);
            }
        }
    }
    contact
}

fn normalize_id(obj: &Map<String, Value>, prefix: &str, index: usize) -> String {
    match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("{}-{}", prefix, index + 1),
    }
}

fn normalize_media(v: Option<&Value>, fallback_alt: impl FnOnce() -> String) -> Option<Media> {
    let Some(Value::Object(obj)) = v else {
        return None;
    };
    let src = trimmed(obj.get("src"))?;
    let alt = trimmed(obj.get("alt")).unwrap_or_else(fallback_alt);
    Some(Media { src, alt })
}

fn normalize_project(v: &Value, index: usize) -> Option<Project> {
    let Value::Object(obj) = v else {
        return None;
    };
    let title = trimmed(obj.get("title"))?;
    let description = trimmed(obj.get("description"))?;
    let media = normalize_media(obj.get("media"), || title.clone());
    Some(Project {
        id: normalize_id(obj, "project", index),
        title,
        description,
        media,
    })
}

fn normalize_post(v: &Value, index: usize, today: NaiveDate) -> Option<Post> {
    let Value::Object(obj) = v else {
        return None;
    };
    let title = trimmed(obj.get("title"))?;
    let body = trimmed(obj.get("body"))?;
    let image = normalize_media(obj.get("image"), || format!("{} cover", title));
    let published = trimmed(obj.get("published"))
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string();
    Some(Post {
        id: normalize_id(obj, "post", index),
        title,
        body,
        tags: normalize_tags(obj.get("tags")),
        published,
        image,
    })
}

/// Tags arrive either as an array of strings or as one comma-separated string.
pub fn normalize_tags(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|t| t.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => split_tags(s),
        _ => Vec::new(),
    }
}

pub fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[test]
    fn non_objects_yield_defaults() {
        for raw in [json!(null), json!([]), json!("text"), json!(42), json!(true)] {
            assert_eq!(normalize_on(&raw, today()), defaults());
        }
    }

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(normalize_on(&json!({}), today()), defaults());
    }

    #[test]
    fn sections_are_trimmed_or_defaulted() {
        let rec = normalize_on(
            &json!({"about": "  Me.  ", "portfolioIntro": "   "}),
            today(),
        );
        assert_eq!(rec.about, "Me.");
        assert_eq!(rec.portfolio_intro, defaults().portfolio_intro);
    }

    #[test]
    fn contact_keeps_all_four_keys() {
        let rec = normalize_on(
            &json!({"contact": {"instagram": " https://instagram.com/me ", "email": "", "mastodon": "x"}}),
            today(),
        );
        assert_eq!(rec.contact.instagram, "https://instagram.com/me");
        assert_eq!(rec.contact.email, defaults().contact.email);
        assert_eq!(rec.contact.facebook, "");
        assert_eq!(rec.contact.linkedin, "");
    }

    #[test]
    fn invalid_projects_are_dropped_in_order() {
        let rec = normalize_on(
            &json!({"projects": [
                {"title": "A", "description": "d"},
                {"title": "", "description": "d"},
                {"description": "d"},
                {"title": "B", "description": "e"},
            ]}),
            today(),
        );
        let titles: Vec<&str> = rec.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(rec.projects[0].id, "project-1");
        // positional id follows the input index, not the output index
        assert_eq!(rec.projects[1].id, "project-4");
    }

    #[test]
    fn empty_array_means_no_entries() {
        let rec = normalize_on(&json!({"posts": [], "projects": []}), today());
        assert!(rec.posts.is_empty());
        assert!(rec.projects.is_empty());
    }

    #[test]
    fn non_array_sequences_fall_back_wholesale() {
        let rec = normalize_on(&json!({"posts": {"title": "T"}, "projects": "nope"}), today());
        assert_eq!(rec.posts, defaults().posts);
        assert_eq!(rec.projects, defaults().projects);
    }

    #[test]
    fn post_gets_id_and_today() {
        let rec = normalize_on(&json!({"posts": [{"title": "T", "body": "B"}]}), today());
        assert_eq!(rec.posts.len(), 1);
        assert_eq!(rec.posts[0].id, "post-1");
        assert_eq!(rec.posts[0].published, "2025-05-20");
        assert!(rec.posts[0].tags.is_empty());
        assert!(rec.posts[0].image.is_none());
    }

    #[test]
    fn invalid_date_replaced_valid_date_kept() {
        let rec = normalize_on(
            &json!({"posts": [
                {"title": "T", "body": "B", "published": "yesterday"},
                {"title": "U", "body": "B", "published": "2023-02-28"},
                {"title": "V", "body": "B", "published": "2023-02-30"},
            ]}),
            today(),
        );
        let dates: Vec<&str> = rec.posts.iter().map(|p| p.published.as_str()).collect();
        assert_eq!(dates, vec!["2025-05-20", "2023-02-28", "2025-05-20"]);
    }

    #[test]
    fn tags_filter_blanks_and_accept_strings() {
        let rec = normalize_on(
            &json!({"posts": [
                {"title": "T", "body": "B", "tags": ["rust", "", "  ", 7, "rust"]},
                {"title": "U", "body": "B", "tags": "a, b,, c "},
            ]}),
            today(),
        );
        assert_eq!(rec.posts[0].tags, vec!["rust", "rust"]);
        assert_eq!(rec.posts[1].tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn media_requires_src_and_derives_alt() {
        let rec = normalize_on(
            &json!({
                "projects": [
                    {"title": "A", "description": "d", "media": {"src": " a.png "}},
                    {"title": "B", "description": "d", "media": {"src": "  ", "alt": "x"}},
                    {"title": "C", "description": "d", "media": "c.png"},
                ],
                "posts": [{"title": "P", "body": "b", "image": {"src": "p.png", "alt": " Sunset "}}]
            }),
            today(),
        );
        assert_eq!(
            rec.projects[0].media,
            Some(Media { src: "a.png".into(), alt: "A".into() })
        );
        assert!(rec.projects[1].media.is_none());
        assert!(rec.projects[2].media.is_none());
        assert_eq!(rec.posts[0].image.as_ref().unwrap().alt, "Sunset");
    }

    #[test]
    fn ids_are_kept_and_not_deduplicated() {
        let rec = normalize_on(
            &json!({"projects": [
                {"id": "x", "title": "A", "description": "d"},
                {"id": "x", "title": "B", "description": "d"},
                {"id": 9, "title": "C", "description": "d"},
            ]}),
            today(),
        );
        let ids: Vec<&str> = rec.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "x", "9"]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            json!(null),
            json!({"about": " a ", "posts": [{"title": "T", "body": "B", "tags": "x,y", "image": {"src": "i"}}]}),
            json!({"projects": [{"title": "A", "description": "d", "media": {"src": "m"}}], "contact": {"linkedin": "l"}}),
        ];
        for raw in inputs {
            let once = normalize_on(&raw, today());
            let twice = normalize_on(&serde_json::to_value(&once).unwrap(), today());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn json_round_trip_is_stable() {
        let rich = normalize_on(
            &json!({
                "about": "First.\n\nSecond.",
                "contact": {"linkedin": "https://linkedin.com/in/me"},
                "projects": [],
                "posts": [
                    {"id": 42, "title": "Numbered", "body": "b", "tags": "rust, web",
                     "published": "2024-02-29", "image": {"src": "/img/n.png"}},
                    {"title": "Plain", "body": "b", "tags": ["x", "x"],
                     "image": {"src": "https://example.com/p.jpg", "alt": "Custom alt"}},
                ]
            }),
            today(),
        );
        assert!(rich.projects.is_empty());
        assert_eq!(rich.posts[0].id, "42");
        assert_eq!(rich.posts[0].image.as_ref().unwrap().alt, "Numbered cover");

        for rec in [defaults(), rich] {
            let text = serde_json::to_string(&rec).unwrap();
            let parsed: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(normalize_on(&parsed, today()), rec);
        }
    }
}
