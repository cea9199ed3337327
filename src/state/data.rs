/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the catalog, the renderer and the UI layer.

use iced::widget::image::Handle;
use std::path::PathBuf;

use super::reveal::Reveal;
use crate::media::sources::SourceChain;

/// Represents a single logical image in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageEntry {
    /// Filename including extension (e.g., "01.png")
    pub name: String,
    /// Filename without its final extension; dedup key and display title
    pub base_name: String,
}

impl ImageEntry {
    /// Build an entry from a filename, stripping the final `.extension`
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let base_name = match name.rfind('.') {
            Some(dot) => name[..dot].to_string(),
            None => name.clone(),
        };
        Self { name, base_name }
    }
}

/// Identity of a tile within one render generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// What a tile currently shows in place of its image
#[derive(Debug, Clone)]
pub enum TileImage {
    /// Not yet scrolled into view
    Pending,
    /// Decoding `sources[attempt]` in the background
    Loading { attempt: usize },
    /// Decoded thumbnail and the source it came from
    Ready { source: PathBuf, handle: Handle },
    /// Every source in the chain failed
    Placeholder { message: String },
}

/// A rendered gallery tile
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub entry: ImageEntry,
    /// Candidate sources, format-negotiated first then fallbacks
    pub sources: SourceChain,
    pub image: TileImage,
    pub reveal: Reveal,
}

impl Tile {
    /// Title shown in the overlay and used as the lightbox caption
    pub fn title(&self) -> &str {
        &self.entry.base_name
    }
}
