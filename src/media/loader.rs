/// Image decoding for tiles and the lightbox
///
/// Decoding is CPU-bound, so the async entry points hand the work to
/// tokio's blocking pool and report back with plain data the UI turns
/// into image handles.

use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use crate::error::{GalleryError, Result};

/// Edge length bound for the full-size lightbox image
pub const LIGHTBOX_MAX_SIZE: u32 = 2048;

/// Decoded RGBA pixels ready to become an image handle
#[derive(Clone)]
pub struct Decoded {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for Decoded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoded")
            .field("source", &self.source)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Decoded {
    pub fn into_handle(self) -> iced::widget::image::Handle {
        iced::widget::image::Handle::from_rgba(self.width, self.height, self.pixels)
    }
}

/// Decode one source and fit it inside a `max_size` square
///
/// # Arguments
/// * `path` - Image file to decode
/// * `max_size` - Bound for both edges; smaller images are left as is
pub async fn load_image(path: PathBuf, max_size: u32) -> std::result::Result<Decoded, String> {
    task::spawn_blocking(move || load_image_blocking(&path, max_size).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking implementation of image decoding
pub fn load_image_blocking(path: &Path, max_size: u32) -> Result<Decoded> {
    if !path.is_file() {
        return Err(GalleryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("image not found: {}", path.display()),
        )));
    }

    let img = image::open(path).map_err(|source| GalleryError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let img = if img.width() > max_size || img.height() > max_size {
        img.resize(max_size, max_size, FilterType::Triangle)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(path = %path.display(), width, height, "Decoded image");

    Ok(Decoded {
        source: path.to_path_buf(),
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
