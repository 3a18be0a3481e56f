//! Application state
//!
//! Owns the tracer, the two-view cache and the emulated display.
//! After pre-render the gallery is browse-only: switching views copies
//! cached tiles to the display, nothing is traced again.

use crate::display::Display;
use crate::raytracer::{SceneCache, Tracer, View};
use crate::settings::Settings;

pub struct AppState {
    pub settings: Settings,
    pub tracer: Tracer,
    pub cache: SceneCache,
    pub display: Display,
    pub current_view: View,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let tracer = Tracer::new(settings.strategy);
        let mut display = Display::new();
        display.init_vram();

        Self {
            settings,
            tracer,
            cache: SceneCache::new(),
            display,
            current_view: View::Front,
        }
    }

    /// Switch the displayed view. A no-op when already showing it;
    /// otherwise a cache-to-display copy.
    pub fn switch_view(&mut self, view: View) {
        if view == self.current_view {
            return;
        }
        self.current_view = view;
        self.display.load_scene(self.cache.view(view));
        println!("View: {}", view.label());
    }

    /// Save the current screen as a PNG next to the executable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_screenshot(&mut self) {
        use crate::display::{SCREEN_HEIGHT, SCREEN_WIDTH};

        let path = format!("gallery-{}.png", self.current_view.label());
        let result = image::save_buffer(
            &path,
            self.display.rgba(),
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
            image::ExtendedColorType::Rgba8,
        );

        match result {
            Ok(()) => println!("Saved {}", path),
            Err(e) => eprintln!("Screenshot failed: {}", e),
        }
    }
}
