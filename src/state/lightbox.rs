/// The modal image overlay
///
/// Two states only. Opening while already open swaps the content.

use iced::widget::image::Handle;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::data::{Tile, TileId, TileImage};

#[derive(Debug, Clone, Default)]
pub enum Lightbox {
    #[default]
    Closed,
    Open {
        tile: TileId,
        caption: String,
        /// The source the tile rendered, or is still decoding
        source: PathBuf,
        /// Tile thumbnail, then the full-size decode; empty while neither exists
        handle: Option<Handle>,
        full_size: bool,
    },
}

impl Lightbox {
    /// Open on a tile, returning the source to decode at full size
    ///
    /// A tile still decoding opens on the source it is trying. Tiles that
    /// were never on screen or fell through to the placeholder do not open.
    pub fn open(&mut self, tile: &Tile) -> Option<PathBuf> {
        let (source, handle) = match &tile.image {
            TileImage::Ready { source, handle } => (source.clone(), Some(handle.clone())),
            TileImage::Loading { attempt } => (tile.sources.get(*attempt)?.to_path_buf(), None),
            TileImage::Pending | TileImage::Placeholder { .. } => {
                debug!(title = %tile.title(), "Tile has no image to show");
                return None;
            }
        };

        *self = Lightbox::Open {
            tile: tile.id,
            caption: tile.title().to_string(),
            source: source.clone(),
            handle,
            full_size: false,
        };
        Some(source)
    }

    /// Catch up with the tile on screen once its own load settles
    ///
    /// Returns a source to decode at full size when the tile ended up on a
    /// different source than the one the lightbox opened with.
    pub fn follow_tile(&mut self, tile: &Tile) -> Option<PathBuf> {
        let Lightbox::Open {
            tile: shown,
            source,
            handle,
            full_size,
            ..
        } = self
        else {
            return None;
        };
        if *shown != tile.id || *full_size {
            return None;
        }
        let TileImage::Ready {
            source: rendered,
            handle: thumbnail,
        } = &tile.image
        else {
            return None;
        };

        *handle = Some(thumbnail.clone());
        if *source == *rendered {
            return None;
        }
        *source = rendered.clone();
        Some(rendered.clone())
    }

    pub fn close(&mut self) {
        *self = Lightbox::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open { .. })
    }

    /// Swap in the full-size image if it belongs to what is on screen
    pub fn apply_full_size(&mut self, for_tile: TileId, loaded_from: &Path, full: Handle) -> bool {
        match self {
            Lightbox::Open {
                tile,
                source,
                handle,
                full_size,
                ..
            } if *tile == for_tile && source.as_path() == loaded_from => {
                *handle = Some(full);
                *full_size = true;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn caption(&self) -> Option<&str> {
        match self {
            Lightbox::Open { caption, .. } => Some(caption),
            Lightbox::Closed => None,
        }
    }
}
