//! Sphere Gallery: 2-view raytracer for a 4-color tile display
//!
//! Renders one sphere over a ground plane with integer-only math, the
//! way an 8-bit-era handheld would have to:
//! - 8.8 fixed-point arithmetic, divisions hoisted into lookup tables
//! - Lambertian shading with a soft directional shadow
//! - 2x2 ordered dithering onto a 4-color palette
//! - packed 2bpp planar tiles, rendered progressively row by row
//!
//! Both views are traced once at startup and cached; Up/Down flips
//! between them with a plain tile copy.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod display;
mod raytracer;
mod settings;

use macroquad::prelude::*;

use app::AppState;
use display::{SCREEN_HEIGHT, SCREEN_WIDTH};
use raytracer::{RowBuffer, View, RENDER_TILES_Y, ROW_BUFFER_BYTES};

const WINDOW_SCALE: usize = 4;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Sphere Gallery v{}", VERSION),
        window_width: (SCREEN_WIDTH * WINDOW_SCALE) as i32,
        window_height: (SCREEN_HEIGHT * WINDOW_SCALE) as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Pre-render one view, one tile row per frame. Each row is stored to
/// the cache and only uploaded to the display after the frame
/// boundary, so tile memory is never written mid-scan.
async fn render_view(app: &mut AppState, view: View, row: &mut RowBuffer) {
    app.tracer.set_view(view);

    for tile_row in 0..RENDER_TILES_Y {
        app.tracer.render_row(tile_row, row);
        app.cache.store_row(view, tile_row, row);

        if app.settings.show_progress {
            let current = view.index() * RENDER_TILES_Y + tile_row + 1;
            app.display.show_progress(current, View::COUNT * RENDER_TILES_Y);
        }

        app.display.present();
        next_frame().await;
        app.display.upload_row(tile_row, row);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let settings = settings::load_or_default("assets/settings.ron");

    println!("=== Sphere Gallery ===");
    println!("Trace strategy: {:?}", settings.strategy);

    let mut app = AppState::new(settings);
    let mut row = [0u8; ROW_BUFFER_BYTES];

    // Pre-render both views with the progress bar running.
    for view in View::ALL {
        render_view(&mut app, view, &mut row).await;
    }
    app.display.clear_progress();

    // Start on the front view.
    app.display.load_scene(app.cache.view(app.current_view));
    println!("View: {} (Up/Down to switch)", app.current_view.label());

    loop {
        if is_key_pressed(KeyCode::Down) {
            app.switch_view(View::Front);
        }
        if is_key_pressed(KeyCode::Up) {
            app.switch_view(View::Back);
        }
        #[cfg(not(target_arch = "wasm32"))]
        if is_key_pressed(KeyCode::S) {
            app.save_screenshot();
        }

        app.display.present();
        next_frame().await;
    }
}
