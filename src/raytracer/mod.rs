//! Fixed-point raytracer core
//!
//! Renders the gallery scene with integer math only:
//! - 8.8 fixed-point arithmetic, no floating point
//! - analytic sphere and ground-plane intersection
//! - Lambertian shading with a soft directional shadow
//! - 2x2 ordered dithering onto a 4-color palette
//! - packed 2bpp planar tiles, cached per view
//!
//! Per-pixel divisions are replaced by quantized lookup tables built
//! at startup; see `tables`.

mod cache;
mod fixed;
mod scene;
mod tables;
mod tile;
mod trace;

pub use cache::*;
pub use fixed::*;
pub use scene::*;
pub use tables::*;
pub use tile::*;
pub use trace::*;

/// Render window dimensions in pixels (12x12 tiles centered on the
/// 160x144 screen).
pub const RENDER_WIDTH: usize = 96;
pub const RENDER_HEIGHT: usize = 96;

/// Tile edge in pixels.
pub const TILE_SIZE: usize = 8;

pub const RENDER_TILES_X: usize = RENDER_WIDTH / TILE_SIZE;
pub const RENDER_TILES_Y: usize = RENDER_HEIGHT / TILE_SIZE;

/// First tile index owned by the renderer; tile 0 stays the border.
pub const RENDER_TILE_BASE: usize = 1;
pub const MAX_RENDER_TILES: usize = RENDER_TILES_X * RENDER_TILES_Y;
