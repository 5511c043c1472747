use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{info, warn};

/// Process-wide settings, read once at launch from `FOLIO_*` environment variables.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_name: String,
    pub db_path: String,
    pub storage_key: String,
    pub notes_dir: String,
    /// Optional path to a custom page layout. Empty means the built-in layout.
    pub layout_path: String,
    pub status_clear: Duration,
}

impl SiteConfig {
    pub fn load() -> Self {
        Self {
            site_name: try_load("FOLIO_SITE_NAME", "folio".to_string()),
            db_path: try_load("FOLIO_DB_PATH", "website/db/folio.db".to_string()),
            storage_key: try_load("FOLIO_STORAGE_KEY", "folio.content".to_string()),
            notes_dir: try_load("FOLIO_NOTES_DIR", "website/notes".to_string()),
            layout_path: try_load("FOLIO_LAYOUT", String::new()),
            status_clear: Duration::from_millis(try_load("FOLIO_STATUS_CLEAR_MS", 2000u64)),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "folio".to_string(),
            db_path: "website/db/folio.db".to_string(),
            storage_key: "folio.content".to_string(),
            notes_dir: "website/notes".to_string(),
            layout_path: String::new(),
            status_clear: Duration::from_millis(2000),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `key` from the environment, falling back to `default` when it is
/// unset or unparseable.
fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
