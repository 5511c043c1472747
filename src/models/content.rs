use serde::{Deserialize, Serialize};

/// The whole site's editable content. Persisted as one JSON document.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub about: String,
    pub portfolio_intro: String,
    pub contact: Contact,
    pub projects: Vec<Project>,
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub email: String,
    pub instagram: String,
    pub facebook: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKey {
    Email,
    Instagram,
    Facebook,
    Linkedin,
}

impl ContactKey {
    pub const ALL: [ContactKey; 4] = [
        ContactKey::Email,
        ContactKey::Instagram,
        ContactKey::Facebook,
        ContactKey::Linkedin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactKey::Email => "email",
            ContactKey::Instagram => "instagram",
            ContactKey::Facebook => "facebook",
            ContactKey::Linkedin => "linkedin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactKey::Email => "Email",
            ContactKey::Instagram => "Instagram",
            ContactKey::Facebook => "Facebook",
            ContactKey::Linkedin => "LinkedIn",
        }
    }
}

impl Contact {
    pub fn get(&self, key: ContactKey) -> &str {
        match key {
            ContactKey::Email => &self.email,
            ContactKey::Instagram => &self.instagram,
            ContactKey::Facebook => &self.facebook,
            ContactKey::Linkedin => &self.linkedin,
        }
    }

    pub fn set(&mut self, key: ContactKey, value: String) {
        match key {
            ContactKey::Email => self.email = value,
            ContactKey::Instagram => self.instagram = value,
            ContactKey::Facebook => self.facebook = value,
            ContactKey::Linkedin => self.linkedin = value,
        }
    }

    /// Non-empty entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = (ContactKey, &str)> {
        ContactKey::ALL
            .into_iter()
            .map(|k| (k, self.get(k)))
            .filter(|(_, v)| !v.is_empty())
    }
}

/// Image attached to a project or post.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Media {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub media: Option<Media>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    /// `YYYY-MM-DD`
    pub published: String,
    pub image: Option<Media>,
}

impl Post {
    pub fn published_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.published, "%Y-%m-%d").ok()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag))
    }
}

impl Default for ContentRecord {
    fn default() -> Self {
        defaults()
    }
}

/// Compiled-in content used for first launch and for every field the
/// persisted copy is missing.
pub fn defaults() -> ContentRecord {
    ContentRecord {
        about: "Hi, I'm a developer and designer who likes building small, careful things for the web.\n\n\
                This site collects a few projects I'm proud of and the occasional note about how they were made."
            .to_string(),
        portfolio_intro: "A selection of recent work.".to_string(),
        contact: Contact {
            email: "hello@example.com".to_string(),
            ..Contact::default()
        },
        projects: vec![
            Project {
                id: "project-1".to_string(),
                title: "Cursor Trails".to_string(),
                description: "An animated canvas that paints a rainbow trail behind the pointer."
                    .to_string(),
                media: None,
            },
            Project {
                id: "project-2".to_string(),
                title: "Offline Editor".to_string(),
                description: "A same-page editor that keeps this site's content without a server round trip."
                    .to_string(),
                media: None,
            },
        ],
        posts: vec![
            Post {
                id: "post-1".to_string(),
                title: "Hello, world".to_string(),
                body: "Welcome to the journal. Posts are written in **Markdown**.".to_string(),
                tags: vec!["meta".to_string()],
                published: "2024-01-15".to_string(),
                image: None,
            },
            Post {
                id: "post-2".to_string(),
                title: "Designing for one reader".to_string(),
                body: "Small sites can afford to be *personal*.".to_string(),
                tags: vec!["design".to_string(), "notes".to_string()],
                published: "2024-03-02".to_string(),
                image: None,
            },
        ],
    }
}
