//! Two-view scene cache
//!
//! Both gallery views are traced once, row by row, into fixed buffers.
//! Switching the displayed view afterwards is a plain copy of cached
//! tile data, never a re-render.

use super::scene::View;
use super::tile::{RowBuffer, ROW_BUFFER_BYTES};
use super::MAX_RENDER_TILES;

/// Bytes per fully rendered view (144 tiles x 16 bytes).
pub const SCENE_SIZE: usize = MAX_RENDER_TILES * super::TILE_BYTES;

/// Fixed storage for both pre-rendered views.
///
/// Written once per view during pre-render, read-only afterwards.
pub struct SceneCache {
    scenes: [[u8; SCENE_SIZE]; View::COUNT],
}

impl SceneCache {
    pub fn new() -> Self {
        SceneCache {
            scenes: [[0; SCENE_SIZE]; View::COUNT],
        }
    }

    /// Copy a rendered tile row into a view's cache slot.
    pub fn store_row(&mut self, view: View, tile_row: usize, row: &RowBuffer) {
        let start = tile_row * ROW_BUFFER_BYTES;
        self.scenes[view.index()][start..start + ROW_BUFFER_BYTES].copy_from_slice(row);
    }

    /// The complete cached tile data for a view.
    pub fn view(&self, view: View) -> &[u8; SCENE_SIZE] {
        &self.scenes[view.index()]
    }
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new()
    }
}
