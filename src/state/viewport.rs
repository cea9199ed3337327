/// Which tiles are on screen
///
/// The grid is laid out in fixed-size cells, so visibility is plain
/// arithmetic over rows instead of asking the renderer for bounds.

use std::ops::Range;

/// Fraction of a tile that must be inside the viewport to count as seen
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// The bottom edge of the viewport is pulled up by this much, so tiles
/// only reveal once they are comfortably on screen
pub const ROOT_MARGIN_BOTTOM: f32 = 100.0;

/// Fixed layout of the tile grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Edge length of a square tile
    pub tile_size: f32,
    /// Gap between tiles, both horizontally and vertically
    pub spacing: f32,
    /// Distance from the top of the scrollable content to the first row
    pub origin_y: f32,
}

/// Visible region of the scrollable content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl GridGeometry {
    /// Tiles per row for a given content width, at least one
    pub fn columns(&self, width: f32) -> usize {
        let stride = self.tile_size + self.spacing;
        if stride <= 0.0 {
            return 1;
        }
        (((width + self.spacing) / stride).floor() as usize).max(1)
    }

    fn row_top(&self, row: usize) -> f32 {
        self.origin_y + row as f32 * (self.tile_size + self.spacing)
    }

    /// Index range of tiles intersecting the viewport
    pub fn visible_range(&self, viewport: &ViewportState, tile_count: usize) -> Range<usize> {
        if tile_count == 0 {
            return 0..0;
        }

        let columns = self.columns(viewport.width);
        let rows = (tile_count + columns - 1) / columns;

        let top = viewport.offset_y;
        let bottom = viewport.offset_y + (viewport.height - ROOT_MARGIN_BOTTOM).max(0.0);
        let needed = self.tile_size * VISIBILITY_THRESHOLD;

        let mut first = None;
        let mut last = None;
        for row in 0..rows {
            let row_top = self.row_top(row);
            if row_top > bottom {
                break;
            }
            let overlap = (row_top + self.tile_size).min(bottom) - row_top.max(top);
            if overlap >= needed {
                first.get_or_insert(row);
                last = Some(row);
            }
        }

        match (first, last) {
            (Some(first), Some(last)) => {
                (first * columns)..((last + 1) * columns).min(tile_count)
            }
            _ => 0..0,
        }
    }
}
