/// Everything the gallery operations depend on, built once at startup
///
/// Render, pagination and the lightbox take this instead of looking up
/// paths and settings on their own.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, warn};

use super::catalog::{CatalogSource, DirectoryCatalog, StaticCatalog};
use super::data::ImageEntry;
use super::viewport::GridGeometry;
use crate::config::{CatalogKind, Settings};

/// Gap between tiles
pub const TILE_SPACING: f32 = 16.0;

/// Height of the header above the grid inside the scrollable
pub const HEADER_HEIGHT: f32 = 96.0;

#[derive(Debug)]
pub struct GalleryContext {
    /// Directory tile sources are resolved against
    pub asset_root: PathBuf,
    pub fallbacks: Vec<PathBuf>,
    pub source: Box<dyn CatalogSource>,
    pub initial_page: Option<usize>,
    pub batch_size: Option<usize>,
    pub loader_delay: Duration,
    pub thumbnail_size: u32,
    pub grid: GridGeometry,
}

impl GalleryContext {
    pub fn from_settings(settings: &Settings) -> Self {
        let source: Box<dyn CatalogSource> = match settings.catalog {
            CatalogKind::Static => Box::new(StaticCatalog::bundled()),
            CatalogKind::Directory => Box::new(DirectoryCatalog::new(&settings.asset_root)),
        };

        let ctx = Self {
            asset_root: settings.asset_root.clone(),
            fallbacks: settings.fallback_paths(),
            source,
            initial_page: settings.initial_page,
            batch_size: settings.batch_size,
            loader_delay: Duration::from_millis(settings.loader_delay_ms),
            thumbnail_size: settings.thumbnail_size,
            grid: GridGeometry {
                tile_size: settings.tile_size,
                spacing: TILE_SPACING,
                origin_y: HEADER_HEIGHT,
            },
        };

        if !ctx.has_asset_root() {
            warn!(
                path = %ctx.asset_root.display(),
                "Image directory not found, tiles will show placeholders"
            );
        }
        ctx
    }

    /// Point the gallery at a folder picked by the user
    pub fn use_directory(&mut self, dir: &Path, fallbacks: &[String]) {
        self.asset_root = dir.to_path_buf();
        self.fallbacks = fallbacks.iter().map(|name| dir.join(name)).collect();
        self.source = Box::new(DirectoryCatalog::new(dir));
    }

    pub fn has_asset_root(&self) -> bool {
        self.asset_root.is_dir()
    }

    /// The full catalog; enumeration errors leave the gallery empty
    pub fn catalog(&self) -> Vec<ImageEntry> {
        match self.source.list_images() {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Failed to list images");
                Vec::new()
            }
        }
    }

    /// The slice of the catalog shown before any "view more"
    pub fn initial_entries<'a>(&self, catalog: &'a [ImageEntry]) -> &'a [ImageEntry] {
        match self.initial_page {
            Some(n) => &catalog[..n.min(catalog.len())],
            None => catalog,
        }
    }

    #[cfg(test)]
    pub fn for_tests(source: impl CatalogSource + 'static, fallbacks: Vec<PathBuf>) -> Self {
        Self {
            asset_root: PathBuf::from("images"),
            fallbacks,
            source: Box::new(source),
            initial_page: None,
            batch_size: None,
            loader_delay: Duration::from_millis(0),
            thumbnail_size: 64,
            grid: GridGeometry {
                tile_size: 100.0,
                spacing: 10.0,
                origin_y: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_initial_entries_respect_page_size() {
        let settings = Settings {
            initial_page: Some(3),
            ..Settings::default()
        };
        let ctx = GalleryContext::from_settings(&settings);
        let catalog = ctx.catalog();
        assert_eq!(ctx.initial_entries(&catalog).len(), 3);

        let all = GalleryContext {
            initial_page: None,
            ..GalleryContext::from_settings(&settings)
        };
        assert_eq!(all.initial_entries(&catalog).len(), catalog.len());

        let oversized = GalleryContext {
            initial_page: Some(500),
            ..GalleryContext::from_settings(&settings)
        };
        assert_eq!(oversized.initial_entries(&catalog).len(), catalog.len());
    }

    #[test]
    fn test_missing_directory_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            asset_root: dir.path().join("absent"),
            catalog: CatalogKind::Directory,
            ..Settings::default()
        };
        let ctx = GalleryContext::from_settings(&settings);
        assert!(!ctx.has_asset_root());
        assert!(ctx.catalog().is_empty());
    }

    #[test]
    fn test_use_directory_switches_source_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sunset.jpg"), b"").unwrap();

        let mut ctx = GalleryContext::from_settings(&Settings::default());
        ctx.use_directory(dir.path(), &["01.png".to_string()]);

        assert_eq!(ctx.asset_root, dir.path());
        assert_eq!(ctx.fallbacks, vec![dir.path().join("01.png")]);
        let names: Vec<String> = ctx.catalog().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["sunset.jpg".to_string()]);
    }
}
