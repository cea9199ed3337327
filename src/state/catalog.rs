use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::data::ImageEntry;
use crate::error::{GalleryError, Result};

/// Extensions a catalog listing accepts (lowercase, without the dot)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The images shipped with the gallery
///
/// Several pictures exist in more than one format; the catalog collapses
/// them to the first listed one.
pub const BUNDLED_IMAGES: &[&str] = &[
    "01.png", "01.jpg", "01.webp",
    "03.png", "03.jpg", "03.webp",
    "1701301154192.jpg",
    "Gemini_Generated_Image_4ojgst4ojgst4ojg.png",
    "Gemini_Generated_Image_4ojgst4ojgst4ojg.jpg",
    "Gemini_Generated_Image_4ojgst4ojgst4ojg.webp",
    "Gemini_Generated_Image_7uq0647uq0647uq0.png",
    "Gemini_Generated_Image_7uq0647uq0647uq0.jpg",
    "Gemini_Generated_Image_7uq0647uq0647uq0.webp",
    "Gemini_Generated_Image_9buadr9buadr9bua.png",
    "Gemini_Generated_Image_9buadr9buadr9bua.jpg",
    "Gemini_Generated_Image_9buadr9buadr9bua.webp",
    "Gemini_Generated_Image_g2altjg2altjg2al.png",
    "Gemini_Generated_Image_g2altjg2altjg2al.jpg",
    "Gemini_Generated_Image_g2altjg2altjg2al.webp",
    "Gemini_Generated_Image_inoi3iinoi3iinoi.png",
    "Gemini_Generated_Image_inoi3iinoi3iinoi.jpg",
    "Gemini_Generated_Image_inoi3iinoi3iinoi.webp",
    "Gemini_Generated_Image_zboah5zboah5zboa.png",
    "Gemini_Generated_Image_zboah5zboah5zboa.jpg",
    "Gemini_Generated_Image_zboah5zboah5zboa.webp",
    "Swamp_Thing_Vol_5_25_Textless.jpg",
];

/// Whether a filename's final extension is one the catalog lists
pub fn is_supported(name: &str) -> bool {
    // A name without a dot is its own extension, so a bare `png` counts
    let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// Filter candidate filenames down to unique logical images
///
/// Keeps supported extensions only, then deduplicates by base name so that
/// `01.png` and `01.jpg` collapse into one entry. The first listed format
/// wins and the input order is preserved.
pub fn list_images<I, S>(names: I) -> Vec<ImageEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| is_supported(name.as_ref()))
        .map(|name| ImageEntry::from_name(name.as_ref()))
        .filter(|entry| seen.insert(entry.base_name.clone()))
        .collect()
}

/// Something that can enumerate candidate image filenames
pub trait CatalogSource: std::fmt::Debug {
    /// Raw filenames, in the order the source declares them
    fn candidates(&self) -> Result<Vec<String>>;

    /// The deduplicated, filtered catalog
    fn list_images(&self) -> Result<Vec<ImageEntry>> {
        let candidates = self.candidates()?;
        let entries = list_images(&candidates);
        debug!(
            candidates = candidates.len(),
            entries = entries.len(),
            "Catalog listed"
        );
        Ok(entries)
    }
}

/// A fixed, compiled-in list of filenames
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    names: Vec<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The images bundled with the gallery
    pub fn bundled() -> Self {
        Self::new(BUNDLED_IMAGES.iter().copied())
    }
}

impl CatalogSource for StaticCatalog {
    fn candidates(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }
}

/// Files found directly inside a directory, sorted by name
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CatalogSource for DirectoryCatalog {
    fn candidates(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Err(GalleryError::MissingDirectory(self.dir.clone()));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => warn!(path = %entry.path().display(), "Skipping non UTF-8 filename"),
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(entries: &[ImageEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.name.as_str(), e.base_name.as_str()))
            .collect()
    }

    #[test]
    fn test_first_declared_format_wins() {
        let entries = list_images(["a.png", "a.jpg", "b.jpg"]);
        assert_eq!(names(&entries), vec![("a.png", "a"), ("b.jpg", "b")]);
    }

    #[test]
    fn test_webp_alone_is_filtered() {
        assert!(list_images(["x.webp"]).is_empty());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let entries = list_images(["Photo.JPEG", "scan.Png", "notes.txt", "README"]);
        assert_eq!(names(&entries), vec![("Photo.JPEG", "Photo"), ("scan.Png", "scan")]);
    }

    #[test]
    fn test_name_without_dot_is_checked_as_extension() {
        assert!(is_supported("png"));
        assert!(!is_supported("README"));
        assert!(!is_supported("photo.webp"));
    }

    #[test]
    fn test_empty_input_gives_empty_catalog() {
        let empty: [&str; 0] = [];
        assert!(list_images(empty).is_empty());
    }

    #[test]
    fn test_bundled_catalog_is_unique_and_supported() {
        let entries = StaticCatalog::bundled().list_images().unwrap();
        let mut bases = HashSet::new();
        for entry in &entries {
            assert!(bases.insert(entry.base_name.clone()), "duplicate {}", entry.base_name);
            assert!(is_supported(&entry.name));
        }
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].name, "01.png");
        assert_eq!(entries[2].name, "1701301154192.jpg");
    }

    #[test]
    fn test_directory_catalog_lists_direct_children_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.png", "a.jpg", "c.webp", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.png"), b"").unwrap();

        let entries = DirectoryCatalog::new(dir.path()).list_images().unwrap();
        // Sorted by name, so a.jpg precedes a.png and wins the dedup
        assert_eq!(names(&entries), vec![("a.jpg", "a"), ("b.jpg", "b")]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectoryCatalog::new(&missing).list_images().unwrap_err();
        assert!(matches!(err, GalleryError::MissingDirectory(p) if p == missing));
    }
}
