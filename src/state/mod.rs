/// State management module
///
/// This module handles all gallery state, including:
/// - The image catalog and its sources (catalog.rs)
/// - Shared data structures (data.rs)
/// - The tile grid and "view more" pagination (gallery.rs)
/// - The lightbox overlay (lightbox.rs)
/// - Tile reveal animation (reveal.rs)
/// - Viewport visibility math (viewport.rs)
/// - The gallery context built from settings (context.rs)

pub mod catalog;
pub mod context;
pub mod data;
pub mod gallery;
pub mod lightbox;
pub mod reveal;
pub mod viewport;
