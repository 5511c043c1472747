use log::{error, info, warn};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;

/// Run the boot checks before Rocket launches: create the data directories
/// and verify the database directory is writable. Nothing here aborts; a
/// storage problem only means content lives in memory for this session.
pub fn run(config: &SiteConfig) {
    info!("folio boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    let db_dir = Path::new(&config.db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    // ── 1. Directories ─────────────────────────────────
    for dir in [db_dir.as_path(), Path::new(&config.notes_dir), Path::new("website/static")] {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ──────────────────
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 3. Optional files ──────────────────────────────
    if !Path::new(&config.notes_dir).join("manifest.toml").exists() {
        warn!("  No notes manifest in {} (notes page will be empty)", config.notes_dir);
        warnings += 1;
    }
    if !config.layout_path.is_empty() && !Path::new(&config.layout_path).exists() {
        warn!("  Layout {} not found (using built-in layout)", config.layout_path);
        warnings += 1;
    }

    if errors > 0 {
        error!(
            "Boot check finished with {} error(s), {} warning(s); content will not persist",
            errors, warnings
        );
    } else {
        info!("Boot check passed ({} warning(s))", warnings);
    }
}
