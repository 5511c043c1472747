use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::views::{html_escape, markdown_to_html};

/// One entry of `manifest.toml`:
///
/// ```toml
/// [[note]]
/// slug = "hello"
/// title = "Hello"
/// file = "hello.md"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteEntry {
    pub slug: String,
    pub title: String,
    pub file: String,
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    note: Vec<NoteEntry>,
}

/// Static Markdown files listed by a manifest in one directory.
pub struct NotesLibrary {
    dir: PathBuf,
}

pub const UNAVAILABLE: &str = "<p class=\"notes-error\">This note could not be loaded.</p>";

impl NotesLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        NotesLibrary { dir: dir.into() }
    }

    /// Entries from the manifest. A missing or malformed manifest yields none.
    pub fn entries(&self) -> Vec<NoteEntry> {
        let path = self.dir.join("manifest.toml");
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                warn!("Notes manifest {} unreadable: {}", path.display(), e);
                return Vec::new();
            }
        };
        match toml::from_str::<Manifest>(&text) {
            Ok(m) => m
                .note
                .into_iter()
                .filter(|n| is_plain_file(&n.file) && !n.slug.trim().is_empty())
                .collect(),
            Err(e) => {
                warn!("Notes manifest {} invalid: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    pub fn find(&self, slug: &str) -> Option<NoteEntry> {
        self.entries().into_iter().find(|n| n.slug == slug)
    }

    /// Rendered body of `entry`, or a static message when the file is unreadable.
    pub fn render(&self, entry: &NoteEntry) -> String {
        match fs::read_to_string(self.dir.join(&entry.file)) {
            Ok(src) => markdown_to_html(&src),
            Err(e) => {
                warn!("Note {:?} unreadable: {}", entry.file, e);
                UNAVAILABLE.to_string()
            }
        }
    }

    pub fn render_index(&self) -> String {
        let entries = self.entries();
        if entries.is_empty() {
            return "<p class=\"empty-state\" data-empty=\"notes\">No notes yet.</p>".to_string();
        }
        let mut html = String::from("<ul class=\"notes-list\">");
        for n in entries {
            html.push_str(&format!(
                "<li><a href=\"/notes/{}\">{}</a></li>",
                html_escape(&crate::views::urlencode(&n.slug)),
                html_escape(&n.title)
            ));
        }
        html.push_str("</ul>");
        html
    }
}

/// Manifest files must stay inside the notes directory.
fn is_plain_file(file: &str) -> bool {
    let p = Path::new(file);
    !file.is_empty()
        && p.components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-notes-{}-{}", name, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reads_manifest_and_renders() {
        let dir = temp_dir("ok");
        fs::write(
            dir.join("manifest.toml"),
            "[[note]]\nslug = \"hello\"\ntitle = \"Hello\"\nfile = \"hello.md\"\n\n\
             [[note]]\nslug = \"escape\"\ntitle = \"Nope\"\nfile = \"../secret.md\"\n",
        )
        .unwrap();
        fs::write(dir.join("hello.md"), "# Hi\n\n*there*").unwrap();

        let lib = NotesLibrary::new(&dir);
        let entries = lib.entries();
        assert_eq!(entries.len(), 1);
        let html = lib.render(&entries[0]);
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<em>there</em>"));
        assert!(lib.render_index().contains("/notes/hello"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_manifest_and_file_degrade() {
        let dir = temp_dir("missing");
        let lib = NotesLibrary::new(&dir);
        assert!(lib.entries().is_empty());
        assert!(lib.render_index().contains("No notes yet"));
        let entry = NoteEntry {
            slug: "gone".into(),
            title: "Gone".into(),
            file: "gone.md".into(),
        };
        assert_eq!(lib.render(&entry), UNAVAILABLE);
        let _ = fs::remove_dir_all(&dir);
    }
}
