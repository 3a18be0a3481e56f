//! Display emulation
//!
//! Emulates the target's background layer: a table of 2bpp planar
//! tiles, a tile map with per-tile palette attributes, and two 4-color
//! palettes held in 15-bit color RAM. The visible 160x144 area is
//! decoded into an RGBA buffer and presented through a nearest-filtered
//! macroquad texture.

use macroquad::prelude::*;

use crate::raytracer::{
    RowBuffer, MAX_RENDER_TILES, RENDER_TILES_X, RENDER_TILES_Y, RENDER_TILE_BASE, SCENE_SIZE,
    TILE_BYTES, TILE_SIZE,
};

/// Native screen size in pixels.
pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// Background map dimensions in tiles (only 20x18 are visible).
pub const MAP_WIDTH: usize = 32;
pub const MAP_HEIGHT: usize = 18;
pub const VISIBLE_TILES_X: usize = SCREEN_WIDTH / TILE_SIZE;

/// Tile map position of the centered 12x12 render window.
pub const RENDER_MAP_X: usize = (SCREEN_WIDTH - RENDER_TILES_X * TILE_SIZE) / 2 / TILE_SIZE;
pub const RENDER_MAP_Y: usize = (SCREEN_HEIGHT - RENDER_TILES_Y * TILE_SIZE) / 2 / TILE_SIZE;

/// Tile index layout: border, then the render block, then the
/// progress tile.
pub const BORDER_TILE: usize = 0;
pub const PROGRESS_TILE: usize = RENDER_TILE_BASE + MAX_RENDER_TILES;
const TILE_COUNT: usize = 256;

/// Progress bar geometry (top map row).
pub const PROGRESS_WIDTH: usize = 20;

/// Palette data, stored as 8-bit RGB and quantized through the
/// display's 15-bit color RAM on decode.
pub mod palette {
    /// Render window palette: shadow, sphere, ground, sky.
    pub const RENDER: [(u8, u8, u8); 4] = [
        (24, 16, 32),
        (220, 60, 60),
        (60, 180, 80),
        (135, 206, 235),
    ];

    /// Border palette: background, text, progress bar, border fill.
    pub const BORDER: [(u8, u8, u8); 4] = [
        (8, 8, 16),
        (255, 255, 255),
        (100, 255, 100),
        (40, 40, 80),
    ];
}

/// Quantize an 8-bit channel to the display's 5 bits and expand back:
/// 0..31 maps to 0..255 via (v5 << 3) | (v5 >> 2).
fn quantize_channel(v: u8) -> u8 {
    let v5 = v >> 3;
    (v5 << 3) | (v5 >> 2)
}

/// Emulated background layer plus its decoded RGBA image.
pub struct Display {
    /// Tile data table, 16 bytes per tile.
    tiles: Vec<u8>,
    /// Tile index per map cell.
    map: [[u8; MAP_WIDTH]; MAP_HEIGHT],
    /// Palette attribute per map cell (0 = render, 1 = border).
    attrs: [[u8; MAP_WIDTH]; MAP_HEIGHT],
    /// Decoded RGBA pixels, 4 bytes per pixel.
    pixels: Vec<u8>,
    dirty: bool,
}

impl Display {
    pub fn new() -> Self {
        Display {
            tiles: vec![0; TILE_COUNT * TILE_BYTES],
            map: [[0; MAP_WIDTH]; MAP_HEIGHT],
            attrs: [[0; MAP_WIDTH]; MAP_HEIGHT],
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 4],
            dirty: true,
        }
    }

    /// Set up the tile surface: border tile, cleared render tiles, the
    /// progress tile, and the map with the centered render window.
    pub fn init_vram(&mut self) {
        // Border tile: every pixel color 3.
        self.set_tile_data(BORDER_TILE, &[0xFF; TILE_BYTES]);

        // Clear the render block.
        for i in 0..MAX_RENDER_TILES {
            self.set_tile_data(RENDER_TILE_BASE + i, &[0x00; TILE_BYTES]);
        }

        // Progress tile: every pixel color 2 (low plane 0, high plane 1).
        let mut progress = [0u8; TILE_BYTES];
        for row in 0..TILE_SIZE {
            progress[row * 2] = 0x00;
            progress[row * 2 + 1] = 0xFF;
        }
        self.set_tile_data(PROGRESS_TILE, &progress);

        // Everything is border with the border palette...
        for y in 0..MAP_HEIGHT {
            for x in 0..MAP_WIDTH {
                self.map[y][x] = BORDER_TILE as u8;
                self.attrs[y][x] = 1;
            }
        }

        // ...except the render window, which gets its own tile block
        // and the render palette.
        for ty in 0..RENDER_TILES_Y {
            for tx in 0..RENDER_TILES_X {
                let index = RENDER_TILE_BASE + ty * RENDER_TILES_X + tx;
                self.map[RENDER_MAP_Y + ty][RENDER_MAP_X + tx] = index as u8;
                self.attrs[RENDER_MAP_Y + ty][RENDER_MAP_X + tx] = 0;
            }
        }

        self.dirty = true;
    }

    /// Copy packed tile data into the tile table, first tile at
    /// `first`.
    pub fn set_tile_data(&mut self, first: usize, data: &[u8]) {
        let start = first * TILE_BYTES;
        self.tiles[start..start + data.len()].copy_from_slice(data);
        self.dirty = true;
    }

    /// Upload one rendered tile row into the render block.
    pub fn upload_row(&mut self, tile_row: usize, row: &RowBuffer) {
        let first = RENDER_TILE_BASE + tile_row * RENDER_TILES_X;
        self.set_tile_data(first, row);
    }

    /// Upload a complete cached view. No recomputation, just a copy.
    pub fn load_scene(&mut self, scene: &[u8; SCENE_SIZE]) {
        self.set_tile_data(RENDER_TILE_BASE, scene);
    }

    /// Fill the top map row with progress cells: `current` of `total`
    /// work units done.
    pub fn show_progress(&mut self, current: usize, total: usize) {
        let filled = current * PROGRESS_WIDTH / total;
        for i in 0..PROGRESS_WIDTH {
            self.map[0][i] = if i < filled {
                PROGRESS_TILE as u8
            } else {
                BORDER_TILE as u8
            };
        }
        self.dirty = true;
    }

    pub fn clear_progress(&mut self) {
        for i in 0..PROGRESS_WIDTH {
            self.map[0][i] = BORDER_TILE as u8;
        }
        self.dirty = true;
    }

    /// Decode the visible tile map into the RGBA buffer.
    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }

        for ty in 0..MAP_HEIGHT {
            for tx in 0..VISIBLE_TILES_X {
                self.decode_tile(tx, ty);
            }
        }
        self.dirty = false;
    }

    fn decode_tile(&mut self, tx: usize, ty: usize) {
        let tile = self.map[ty][tx] as usize;
        let pal = match self.attrs[ty][tx] {
            0 => &palette::RENDER,
            _ => &palette::BORDER,
        };
        let data = &self.tiles[tile * TILE_BYTES..(tile + 1) * TILE_BYTES];

        for row in 0..TILE_SIZE {
            let low = data[row * 2];
            let high = data[row * 2 + 1];

            for col in 0..TILE_SIZE {
                let bit = 7 - col as u32;
                let color = (((high >> bit) & 1) << 1) | ((low >> bit) & 1);
                let (r, g, b) = pal[color as usize];

                let px = tx * TILE_SIZE + col;
                let py = ty * TILE_SIZE + row;
                let index = (py * SCREEN_WIDTH + px) * 4;
                self.pixels[index] = quantize_channel(r);
                self.pixels[index + 1] = quantize_channel(g);
                self.pixels[index + 2] = quantize_channel(b);
                self.pixels[index + 3] = 255;
            }
        }
    }

    /// The decoded RGBA image (refreshed if stale).
    pub fn rgba(&mut self) -> &[u8] {
        self.refresh();
        &self.pixels
    }

    /// Decode and draw the screen, scaled to fit the window with
    /// aspect preserved.
    pub fn present(&mut self) {
        self.refresh();

        let texture =
            Texture2D::from_rgba8(SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16, &self.pixels);
        texture.set_filter(FilterMode::Nearest);

        let screen_w = screen_width();
        let screen_h = screen_height();
        let scale = (screen_w / SCREEN_WIDTH as f32).min(screen_h / SCREEN_HEIGHT as f32);
        let draw_w = SCREEN_WIDTH as f32 * scale;
        let draw_h = SCREEN_HEIGHT as f32 * scale;

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            (screen_w - draw_w) / 2.0,
            (screen_h - draw_h) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_w, draw_h)),
                ..Default::default()
            },
        );
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
