use std::path::{Path, PathBuf};

use crate::state::data::ImageEntry;

/// Formats tried for a tile before its literal filename, best first
pub const NEGOTIATED_FORMATS: [&str; 3] = ["webp", "png", "jpg"];

/// Ordered candidate sources for one tile
///
/// The primary part prefers modern formats of the same picture
/// (`<base>.webp`, `<base>.png`, `<base>.jpg`, then the catalog filename).
/// The fallback part holds stand-in images shown when the picture itself
/// cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceChain {
    primary: Vec<PathBuf>,
    fallbacks: Vec<PathBuf>,
}

impl SourceChain {
    pub fn for_entry(root: &Path, entry: &ImageEntry, fallbacks: &[PathBuf]) -> Self {
        let mut primary: Vec<PathBuf> = Vec::with_capacity(NEGOTIATED_FORMATS.len() + 1);
        let candidates = NEGOTIATED_FORMATS
            .iter()
            .map(|ext| root.join(format!("{}.{}", entry.base_name, ext)))
            .chain(std::iter::once(root.join(&entry.name)));
        for path in candidates {
            if !primary.contains(&path) {
                primary.push(path);
            }
        }

        Self {
            primary,
            fallbacks: fallbacks.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.fallbacks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source at a position of the whole chain
    pub fn get(&self, attempt: usize) -> Option<&Path> {
        self.iter().nth(attempt)
    }

    /// Whether `attempt` indexes into the fallback part
    pub fn is_fallback(&self, attempt: usize) -> bool {
        attempt >= self.primary.len() && attempt < self.len()
    }

    #[cfg(test)]
    pub fn primary(&self) -> &[PathBuf] {
        &self.primary
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.primary
            .iter()
            .chain(self.fallbacks.iter())
            .map(PathBuf::as_path)
    }
}
