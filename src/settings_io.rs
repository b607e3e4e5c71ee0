//! Settings persistence
//!
//! User defaults live in a JSON file under the per-platform config
//! directory. Loading is forgiving (missing or malformed files fall back
//! to defaults); writing is explicit and reports failures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::settings::Settings;

const SETTINGS_FILE: &str = "settings.json";

/// Per-platform settings directory (created on first write)
pub fn settings_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("screenreel"))
}

/// Read settings from `dir`, falling back to defaults when the file is
/// missing or unreadable.
pub fn read_settings_json(dir: &Path) -> Settings {
    let path = dir.join(SETTINGS_FILE);
    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(_) => return Settings::default(),
    };
    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("ignoring malformed settings file {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

/// Write settings into `dir`, creating it if needed.
pub fn write_settings_json(dir: &Path, settings: &Settings) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create settings directory {}", dir.display()))?;
    let path = dir.join(SETTINGS_FILE);
    let data = serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(&path, data)
        .with_context(|| format!("failed to write settings file {}", path.display()))
}

/// Load persisted settings from the default location.
pub fn load_settings() -> Settings {
    match settings_dir() {
        Some(dir) => read_settings_json(&dir),
        None => Settings::default(),
    }
}

/// Persist settings to the default location.
pub fn persist_settings_to_disk(settings: &Settings) -> Result<()> {
    let dir = settings_dir().context("no config directory on this platform")?;
    write_settings_json(&dir, settings)
}
