//! User settings stored as settings.json in the config directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

pub const SETTINGS_FILE: &str = "settings.json";

/// Where the catalog's filenames come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// The image list bundled with the gallery
    Static,
    /// Whatever supported files sit in `asset_root`
    Directory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Images
    pub asset_root: PathBuf,
    pub catalog: CatalogKind,
    /// Stand-in images, relative to `asset_root`, tried in order
    pub fallbacks: Vec<String>,

    // Pagination
    /// Tiles shown at startup; `None` shows the whole catalog
    pub initial_page: Option<usize>,
    /// Tiles appended per "view more"; `None` appends everything left
    pub batch_size: Option<usize>,
    pub loader_delay_ms: u64,

    // Layout
    pub thumbnail_size: u32,
    pub tile_size: f32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("images"),
            catalog: CatalogKind::Static,
            fallbacks: vec!["01.png".to_string(), "03.png".to_string()],
            initial_page: Some(6),
            batch_size: None,
            loader_delay_ms: 1000,
            thumbnail_size: 480,
            tile_size: 240.0,
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl Settings {
    /// Directory holding settings.json
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("photo-gallery")
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(s) => match Self::from_json(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(SETTINGS_FILE), json)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fallback paths resolved against the asset root
    pub fn fallback_paths(&self) -> Vec<PathBuf> {
        self.fallbacks
            .iter()
            .map(|name| self.asset_root.join(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{ "batch_size": 3, "catalog": "directory" }"#).unwrap();
        assert_eq!(settings.batch_size, Some(3));
        assert_eq!(settings.catalog, CatalogKind::Directory);
        assert_eq!(settings.asset_root, PathBuf::from("images"));
        assert_eq!(settings.loader_delay_ms, 1000);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn test_unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // Present but not a regular file, so reading fails with something other than NotFound
        std::fs::create_dir(dir.path().join(SETTINGS_FILE)).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.initial_page, Settings::default().initial_page);
        assert_eq!(settings.asset_root, PathBuf::from("images"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            initial_page: None,
            fallbacks: vec!["missing.png".to_string()],
            ..Settings::default()
        };
        settings.save(&dir.path().join("nested")).unwrap();
        assert_eq!(Settings::load(&dir.path().join("nested")), settings);
    }

    #[test]
    fn test_fallbacks_resolve_against_asset_root() {
        let settings = Settings::default();
        assert_eq!(
            settings.fallback_paths(),
            vec![PathBuf::from("images/01.png"), PathBuf::from("images/03.png")]
        );
    }
}
