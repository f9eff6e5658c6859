//! Game settings and preferences
//!
//! Persisted as JSON, separately from tuning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Seconds for a full calm/combat crossfade
    pub music_fade_time: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            music_fade_time: 2.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = sanitize_volume(vol);
    }

    /// Volume actually applied to music
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Clamp every field into range (hand-edited files may hold anything)
    pub fn sanitized(mut self) -> Self {
        self.master_volume = sanitize_volume(self.master_volume);
        self.sfx_volume = sanitize_volume(self.sfx_volume);
        self.music_volume = sanitize_volume(self.music_volume);
        if !self.music_fade_time.is_finite() || self.music_fade_time < 0.0 {
            self.music_fade_time = Self::default().music_fade_time;
        }
        self
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("No settings at {} ({}), using defaults", path.display(), err);
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(err) => {
                log::warn!("Unreadable settings at {} ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

fn sanitize_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gnome-fjord-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.set_master_volume(0.25);
        settings.save(&path).expect("save settings");
        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = Settings::load(temp_path("missing-never-written"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ master_volume: ").expect("write file");
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let settings: Settings =
            serde_json::from_str(r#"{ "master_volume": 4.0 }"#).expect("parse");
        let settings = settings.sanitized();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.music_volume, Settings::default().music_volume);
    }

    #[test]
    fn test_muted_silences_music() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
    }
}
