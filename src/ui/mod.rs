/// Widgets for the gallery window
///
/// - Grid tiles with reveal animation (tile.rs)
/// - The lightbox overlay (lightbox.rs)

pub mod lightbox;
pub mod tile;
