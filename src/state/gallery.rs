use std::collections::HashSet;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::context::GalleryContext;
use super::data::{ImageEntry, Tile, TileId, TileImage};
use super::reveal::Reveal;
use crate::media::loader::Decoded;
use crate::media::sources::SourceChain;

/// Text shown in a tile once every source has failed
pub const PLACEHOLDER_MESSAGE: &str = "Sorry, this image could not be loaded";

/// Ordered set of catalog filenames already rendered as tiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayedSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl DisplayedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `name` was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.members.contains(&name) {
            return false;
        }
        self.members.insert(name.clone());
        self.order.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in render order
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

/// State of the "view more" affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMore {
    Visible,
    /// A batch was just appended; the loading indicator replaces the button
    Loading,
    Hidden,
}

/// A tile source the caller should decode next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: TileId,
    pub attempt: usize,
    pub path: PathBuf,
}

/// The tile grid and its pagination state
#[derive(Debug)]
pub struct Gallery {
    tiles: Vec<Tile>,
    displayed: DisplayedSet,
    view_more: ViewMore,
    /// Bumped whenever a render changes what a pending settle refers to
    batch: u64,
    next_id: u64,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            displayed: DisplayedSet::new(),
            view_more: ViewMore::Hidden,
            batch: 0,
            next_id: 0,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn displayed(&self) -> &DisplayedSet {
        &self.displayed
    }

    pub fn view_more(&self) -> ViewMore {
        self.view_more
    }

    /// Generation of the latest render, for matching delayed settles
    pub fn batch(&self) -> u64 {
        self.batch
    }

    /// Disable the affordance regardless of remaining entries
    pub fn hide_view_more(&mut self) {
        self.view_more = ViewMore::Hidden;
    }

    /// Replace every tile with one tile per entry, in order
    ///
    /// Tiles start hidden; they reveal and load once they scroll into view.
    /// Call `settle_batch` afterwards to decide whether "view more" shows.
    pub fn render_initial(&mut self, ctx: &GalleryContext, entries: &[ImageEntry]) {
        self.tiles.clear();
        self.displayed.clear();
        self.view_more = ViewMore::Hidden;
        self.batch += 1;

        for entry in entries {
            self.push_tile(ctx, entry.clone());
        }

        info!(tiles = self.tiles.len(), "Gallery rendered");
    }

    /// Catalog entries that have no tile yet, in catalog order
    pub fn remaining<'a>(&self, catalog: &'a [ImageEntry]) -> Vec<&'a ImageEntry> {
        catalog
            .iter()
            .filter(|entry| !self.displayed.contains(&entry.name))
            .collect()
    }

    /// Append tiles for catalog entries not displayed yet
    ///
    /// Appends at most `limit` tiles (all of them when `None`) and returns how
    /// many were added. With nothing left to show the affordance is hidden at
    /// once; otherwise it enters the loading phase until `settle_batch`.
    pub fn render_more(
        &mut self,
        ctx: &GalleryContext,
        catalog: &[ImageEntry],
        limit: Option<usize>,
        now: Instant,
    ) -> usize {
        let batch: Vec<ImageEntry> = self
            .remaining(catalog)
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        if batch.is_empty() {
            debug!("No more images to show");
            self.view_more = ViewMore::Hidden;
            return 0;
        }

        self.view_more = ViewMore::Loading;
        self.batch += 1;
        for entry in batch.iter().cloned() {
            let id = self.push_tile(ctx, entry);
            if let Some(tile) = self.tile_mut(id) {
                tile.reveal.start(now);
            }
        }

        debug!(appended = batch.len(), total = self.tiles.len(), "Appended batch");
        batch.len()
    }

    /// End the loading phase: "view more" stays only while entries remain
    pub fn settle_batch(&mut self, catalog: &[ImageEntry]) {
        self.view_more = if self.remaining(catalog).is_empty() {
            ViewMore::Hidden
        } else {
            ViewMore::Visible
        };
    }

    /// Settle the loading phase started by `batch`
    ///
    /// Returns false and changes nothing when a later render has replaced
    /// that batch or the affordance is no longer loading.
    pub fn finish_batch(&mut self, batch: u64, catalog: &[ImageEntry]) -> bool {
        if batch != self.batch || self.view_more != ViewMore::Loading {
            return false;
        }
        self.settle_batch(catalog);
        true
    }

    /// Reveal tiles in `range` and return the image loads that should start
    pub fn mark_visible(&mut self, range: Range<usize>, now: Instant) -> Vec<LoadRequest> {
        let end = range.end.min(self.tiles.len());
        let start = range.start.min(end);

        let mut requests = Vec::new();
        for tile in &mut self.tiles[start..end] {
            tile.reveal.start(now);
            if let TileImage::Pending = tile.image {
                match tile.sources.get(0) {
                    Some(path) => {
                        tile.image = TileImage::Loading { attempt: 0 };
                        requests.push(LoadRequest {
                            id: tile.id,
                            attempt: 0,
                            path: path.to_path_buf(),
                        });
                    }
                    None => {
                        tile.image = TileImage::Placeholder {
                            message: PLACEHOLDER_MESSAGE.to_string(),
                        };
                    }
                }
            }
        }
        requests
    }

    /// Record a decoded source; stale results are ignored
    pub fn apply_loaded(&mut self, id: TileId, attempt: usize, decoded: Decoded) -> bool {
        let Some(tile) = self.tile_mut(id) else {
            return false;
        };
        if !matches!(tile.image, TileImage::Loading { attempt: a } if a == attempt) {
            return false;
        }

        if tile.sources.is_fallback(attempt) {
            info!(title = %tile.entry.base_name, source = %decoded.source.display(), "Showing fallback image");
        }
        tile.image = TileImage::Ready {
            source: decoded.source.clone(),
            handle: decoded.into_handle(),
        };
        true
    }

    /// Move a tile to its next source after a failed load
    ///
    /// Returns the next load to start, or `None` when the tile is stale or
    /// has fallen through to the placeholder.
    pub fn apply_failed(&mut self, id: TileId, attempt: usize, error: &str) -> Option<LoadRequest> {
        let tile = self.tile_mut(id)?;
        if !matches!(tile.image, TileImage::Loading { attempt: a } if a == attempt) {
            return None;
        }

        debug!(title = %tile.entry.base_name, attempt, error, "Image source failed");

        let next = attempt + 1;
        match tile.sources.get(next).map(|p| p.to_path_buf()) {
            Some(path) => {
                tile.image = TileImage::Loading { attempt: next };
                Some(LoadRequest { id, attempt: next, path })
            }
            None => {
                warn!(title = %tile.entry.base_name, "All image sources failed");
                tile.image = TileImage::Placeholder {
                    message: PLACEHOLDER_MESSAGE.to_string(),
                };
                None
            }
        }
    }

    /// Advance reveal animations, returns true while any is running
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut running = false;
        for tile in &mut self.tiles {
            running |= tile.reveal.tick(now);
        }
        running
    }

    pub fn is_animating(&self) -> bool {
        self.tiles
            .iter()
            .any(|t| matches!(t.reveal, Reveal::Animating { .. }))
    }

    fn push_tile(&mut self, ctx: &GalleryContext, entry: ImageEntry) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;

        let sources = SourceChain::for_entry(&ctx.asset_root, &entry, &ctx.fallbacks);
        self.displayed.insert(entry.name.clone());
        self.tiles.push(Tile {
            id,
            entry,
            sources,
            image: TileImage::Pending,
            reveal: Reveal::Hidden,
        });
        id
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::catalog::{list_images, StaticCatalog};
    use std::path::Path;

    fn context() -> GalleryContext {
        GalleryContext::for_tests(
            StaticCatalog::new(["a.png", "b.jpg", "c.jpeg", "d.png"]),
            vec![PathBuf::from("images/01.png"), PathBuf::from("images/03.png")],
        )
    }

    fn catalog() -> Vec<ImageEntry> {
        list_images(["a.png", "b.jpg", "c.jpeg", "d.png"])
    }

    fn decoded(source: &Path) -> Decoded {
        Decoded {
            source: source.to_path_buf(),
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn test_initial_render_creates_one_titled_tile_per_entry() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries);

        assert_eq!(gallery.tiles().len(), entries.len());
        for (tile, entry) in gallery.tiles().iter().zip(&entries) {
            assert_eq!(tile.title(), entry.base_name);
            assert_eq!(tile.reveal, Reveal::Hidden);
            assert!(matches!(tile.image, TileImage::Pending));
        }
        assert_eq!(gallery.displayed().iter().collect::<Vec<_>>(), vec!["a.png", "b.jpg", "c.jpeg", "d.png"]);
    }

    #[test]
    fn test_initial_render_replaces_previous_tiles() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries);
        gallery.render_initial(&ctx, &entries[..1]);

        assert_eq!(gallery.tiles().len(), 1);
        assert_eq!(gallery.displayed().len(), 1);
    }

    #[test]
    fn test_render_more_on_full_gallery_appends_nothing() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries);

        assert_eq!(gallery.render_more(&ctx, &entries, None, Instant::now()), 0);
        assert_eq!(gallery.tiles().len(), entries.len());
        assert_eq!(gallery.view_more(), ViewMore::Hidden);
    }

    #[test]
    fn test_render_more_appends_complement_then_hides() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries[..1]);
        gallery.settle_batch(&entries);
        assert_eq!(gallery.view_more(), ViewMore::Visible);

        let appended = gallery.render_more(&ctx, &entries, None, Instant::now());
        assert_eq!(appended, entries.len() - 1);
        assert_eq!(gallery.view_more(), ViewMore::Loading);
        assert!(gallery.tiles()[1..].iter().all(|t| t.reveal.has_started()));

        gallery.settle_batch(&entries);
        assert_eq!(gallery.view_more(), ViewMore::Hidden);
        assert!(gallery.remaining(&entries).is_empty());
    }

    #[test]
    fn test_limited_batch_keeps_affordance_while_entries_remain() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries[..1]);

        assert_eq!(gallery.render_more(&ctx, &entries, Some(2), Instant::now()), 2);
        gallery.settle_batch(&entries);
        assert_eq!(gallery.view_more(), ViewMore::Visible);
        assert_eq!(gallery.remaining(&entries)[0].name, "d.png");

        assert_eq!(gallery.render_more(&ctx, &entries, Some(2), Instant::now()), 1);
        gallery.settle_batch(&entries);
        assert_eq!(gallery.view_more(), ViewMore::Hidden);
    }

    #[test]
    fn test_settle_from_a_replaced_batch_is_ignored() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries[..1]);
        gallery.render_more(&ctx, &entries, Some(1), Instant::now());
        let first = gallery.batch();

        // Reload while the first settle is still in flight
        gallery.render_initial(&ctx, &entries[..1]);
        gallery.render_more(&ctx, &entries, Some(1), Instant::now());
        let second = gallery.batch();
        assert_ne!(first, second);

        assert!(!gallery.finish_batch(first, &entries));
        assert_eq!(gallery.view_more(), ViewMore::Loading);

        assert!(gallery.finish_batch(second, &entries));
        assert_eq!(gallery.view_more(), ViewMore::Visible);
        // A repeated settle after the phase ended is a no-op
        assert!(!gallery.finish_batch(second, &entries));
    }

    #[test]
    fn test_mark_visible_requests_first_source_once() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries);

        let now = Instant::now();
        let requests = gallery.mark_visible(0..2, now);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].attempt, 0);
        assert_eq!(requests[0].path, PathBuf::from("images/a.webp"));
        assert!(gallery.tiles()[0].reveal.has_started());
        assert!(!gallery.tiles()[2].reveal.has_started());

        // Tiles 0 and 1 are already loading; the range end is clamped
        let more: Vec<TileId> = gallery.mark_visible(0..10, now).iter().map(|r| r.id).collect();
        assert_eq!(more, vec![gallery.tiles()[2].id, gallery.tiles()[3].id]);
        assert!(gallery.mark_visible(0..10, now).is_empty());
    }

    #[test]
    fn test_failures_walk_fallbacks_then_placeholder() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries[..1]);

        let mut request = gallery.mark_visible(0..1, Instant::now()).remove(0);
        let id = request.id;
        let primary = gallery.tile(id).unwrap().sources.primary().len();

        // Exhaust the picture's own formats
        for _ in 0..primary - 1 {
            request = gallery.apply_failed(id, request.attempt, "missing").unwrap();
        }

        let first = gallery.apply_failed(id, request.attempt, "missing").unwrap();
        assert_eq!(first.path, PathBuf::from("images/01.png"));

        let second = gallery.apply_failed(id, first.attempt, "missing").unwrap();
        assert_eq!(second.path, PathBuf::from("images/03.png"));

        assert!(gallery.apply_failed(id, second.attempt, "missing").is_none());
        match &gallery.tile(id).unwrap().image {
            TileImage::Placeholder { message } => assert_eq!(message, PLACEHOLDER_MESSAGE),
            other => panic!("expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_success_shows_fallback_source() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries[..1]);

        let mut request = gallery.mark_visible(0..1, Instant::now()).remove(0);
        let id = request.id;
        while !gallery.tile(id).unwrap().sources.is_fallback(request.attempt) {
            request = gallery.apply_failed(id, request.attempt, "missing").unwrap();
        }

        assert!(gallery.apply_loaded(id, request.attempt, decoded(&request.path)));
        match &gallery.tile(id).unwrap().image {
            TileImage::Ready { source, .. } => assert_eq!(source, &PathBuf::from("images/01.png")),
            other => panic!("expected ready image, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries);
        let request = gallery.mark_visible(0..1, Instant::now()).remove(0);

        // A re-render drops the tile the request was made for
        gallery.render_initial(&ctx, &entries);
        assert!(!gallery.apply_loaded(request.id, 0, decoded(&request.path)));
        assert!(gallery.apply_failed(request.id, 0, "missing").is_none());

        // Wrong attempt for a live tile
        let live = gallery.mark_visible(0..1, Instant::now()).remove(0);
        assert!(!gallery.apply_loaded(live.id, 3, decoded(&live.path)));
        assert!(gallery.apply_loaded(live.id, 0, decoded(&live.path)));
    }

    #[test]
    fn test_tick_reports_running_animations() {
        let ctx = context();
        let entries = catalog();
        let mut gallery = Gallery::new();
        gallery.render_initial(&ctx, &entries);
        assert!(!gallery.is_animating());

        let start = Instant::now();
        gallery.mark_visible(0..1, start);
        assert!(gallery.is_animating());
        assert!(gallery.tick(start));
        assert!(!gallery.tick(start + crate::state::reveal::REVEAL_DURATION));
        assert!(!gallery.is_animating());
    }

    #[test]
    fn test_displayed_set_keeps_insertion_order_without_duplicates() {
        let mut set = DisplayedSet::new();
        assert!(set.insert("b.jpg"));
        assert!(set.insert("a.png"));
        assert!(!set.insert("b.jpg"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b.jpg", "a.png"]);
        assert!(set.contains("a.png"));
    }
}
