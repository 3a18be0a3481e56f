//! Settings loading
//!
//! Uses RON (Rusty Object Notation) for a small human-editable
//! settings file. The file is optional; missing settings fall back to
//! defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::raytracer::TraceStrategy;

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// How sphere intersection and shadow falloff are computed. `Lut`
    /// is the canonical table-driven pipeline; `Exact` uses true
    /// division for comparison.
    pub strategy: TraceStrategy,
    /// Show the progress bar while the views pre-render.
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: TraceStrategy::Lut,
            show_progress: true,
        }
    }
}

/// Error type for settings loading
#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(e: ron::error::SpannedError) -> Self {
        SettingsError::ParseError(e)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::IoError(e) => write!(f, "IO error: {}", e),
            SettingsError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

/// Load settings from a RON file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let contents = fs::read_to_string(path)?;
    let settings: Settings = ron::from_str(&contents)?;
    Ok(settings)
}

/// Load settings, falling back to defaults when the file is missing or
/// malformed.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Settings {
    let path = path.as_ref();
    if !path.exists() {
        return Settings::default();
    }

    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let settings: Settings =
            ron::from_str("(strategy: Exact, show_progress: false)").unwrap();
        assert_eq!(settings.strategy, TraceStrategy::Exact);
        assert!(!settings.show_progress);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.strategy, TraceStrategy::Lut);
        assert!(settings.show_progress);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = load_or_default("does/not/exist.ron");
        assert_eq!(settings.strategy, TraceStrategy::Lut);
    }
}
