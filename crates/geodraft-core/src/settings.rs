//! Editor settings persisted as JSON in the user's config directory.

use crate::camera::{ViewRect, ZOOM_STEP};
use crate::geometry::{DEFAULT_CURVE_SAMPLES, MIN_CURVE_SAMPLES};
use crate::history::DEFAULT_MAX_UNDO;
use crate::selection::HIT_THRESHOLD_PX;
use crate::snap::SNAP_THRESHOLD_PX;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable editor behavior. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Undo snapshots kept before the oldest is evicted.
    pub max_undo: usize,
    pub snap_threshold_px: f64,
    pub hit_threshold_px: f64,
    /// Zoom factor per scroll step.
    pub zoom_step: f64,
    /// Samples per curve hit-test.
    pub curve_samples: usize,
    /// View shown by a new document.
    pub default_view: ViewRect,
    /// Initial framebuffer size in pixels.
    pub framebuffer: Size,
    /// Where relative save paths resolve; the platform data dir if unset.
    pub save_dir: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            hit_threshold_px: HIT_THRESHOLD_PX,
            zoom_step: ZOOM_STEP,
            curve_samples: DEFAULT_CURVE_SAMPLES,
            default_view: ViewRect::default(),
            framebuffer: Size::new(1024.0, 720.0),
            save_dir: None,
        }
    }
}

impl EditorSettings {
    /// `<config_dir>/geodraft/settings.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("geodraft")
            .join(SETTINGS_FILE)
    }

    /// Read settings from `path`.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = serde_json::from_str(&content)?;
        Ok(settings.sanitized())
    }

    /// Read settings from `path`, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Replace out-of-range values with usable ones.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.max_undo = self.max_undo.max(1);
        self.curve_samples = self.curve_samples.max(MIN_CURVE_SAMPLES);
        if !(self.snap_threshold_px.is_finite() && self.snap_threshold_px >= 0.0) {
            self.snap_threshold_px = defaults.snap_threshold_px;
        }
        if !(self.hit_threshold_px.is_finite() && self.hit_threshold_px >= 0.0) {
            self.hit_threshold_px = defaults.hit_threshold_px;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.framebuffer.width >= 1.0 && self.framebuffer.height >= 1.0) {
            self.framebuffer = defaults.framebuffer;
        }
        self
    }

    /// Directory relative save paths resolve under.
    pub fn resolved_save_dir(&self) -> PathBuf {
        self.save_dir
            .clone()
            .unwrap_or_else(crate::storage::default_save_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.max_undo, 60);
        assert_eq!(s.snap_threshold_px, 12.0);
        assert_eq!(s.hit_threshold_px, 12.0);
        assert!((s.zoom_step - 1.15).abs() < 1e-12);
        assert_eq!(s.default_view, ViewRect::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let s: EditorSettings = serde_json::from_str(r#"{"max_undo": 5}"#).unwrap();
        assert_eq!(s.max_undo, 5);
        assert_eq!(s.curve_samples, DEFAULT_CURVE_SAMPLES);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg").join(SETTINGS_FILE);
        let settings = EditorSettings {
            max_undo: 10,
            save_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(EditorSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(EditorSettings::load_from(&path), Err(SettingsError::Parse(_))));
        assert_eq!(EditorSettings::load_or_default(&path), EditorSettings::default());
        let missing = dir.path().join("missing.json");
        assert_eq!(EditorSettings::load_or_default(&missing), EditorSettings::default());
    }

    #[test]
    fn test_sanitized() {
        let s = EditorSettings {
            max_undo: 0,
            curve_samples: 3,
            zoom_step: 0.5,
            hit_threshold_px: f64::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.max_undo, 1);
        assert_eq!(s.curve_samples, MIN_CURVE_SAMPLES);
        assert_eq!(s.zoom_step, ZOOM_STEP);
        assert_eq!(s.hit_threshold_px, HIT_THRESHOLD_PX);
    }
}
