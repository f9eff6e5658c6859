//! Background music mixing
//!
//! Two looping tracks, calm and combat, crossfade according to the
//! [`MusicCue`]s the simulation emits. The mixer only computes gains; whatever
//! actually plays the tracks reads [`MusicMixer::gains`] each frame.

use crate::settings::Settings;
use crate::sim::events::{GameEvent, MusicCue};

/// Per-track output gains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGains {
    pub calm: f32,
    pub combat: f32,
}

/// Crossfading music mixer
#[derive(Debug, Clone)]
pub struct MusicMixer {
    active: MusicCue,
    calm: f32,
    combat: f32,
    /// Volume the active track fades toward
    music_volume: f32,
    master_volume: f32,
    /// Gain change per second
    fade_speed: f32,
    muted: bool,
}

impl Default for MusicMixer {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl MusicMixer {
    /// Start on the calm track at full music volume
    pub fn new(settings: &Settings) -> Self {
        let mut mixer = Self {
            active: MusicCue::Calm,
            calm: 0.0,
            combat: 0.0,
            music_volume: 0.0,
            master_volume: 0.0,
            fade_speed: 0.0,
            muted: false,
        };
        mixer.apply_settings(settings);
        mixer.calm = mixer.music_volume;
        mixer
    }

    /// Pick up volume changes. Gains move toward the new levels on the next update.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        self.fade_speed = if settings.music_fade_time > 0.0 {
            self.music_volume.max(f32::EPSILON) / settings.music_fade_time
        } else {
            f32::INFINITY
        };
    }

    pub fn active(&self) -> MusicCue {
        self.active
    }

    /// Switch the track being faded in
    pub fn cue(&mut self, cue: MusicCue) {
        if self.active != cue {
            log::debug!("Music: {:?} -> {:?}", self.active, cue);
            self.active = cue;
        }
    }

    /// Feed a tick's notifications; only music cues matter
    pub fn handle_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if let GameEvent::MusicCue(cue) = event {
                self.cue(*cue);
            }
        }
    }

    /// Move both tracks toward their targets
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let step = self.fade_speed * dt;
        let (calm_target, combat_target) = match self.active {
            MusicCue::Calm => (self.music_volume, 0.0),
            MusicCue::Combat => (0.0, self.music_volume),
        };
        self.calm = approach(self.calm, calm_target, step);
        self.combat = approach(self.combat, combat_target, step);
    }

    /// Output gains with master volume applied
    pub fn gains(&self) -> TrackGains {
        let scale = if self.muted { 0.0 } else { self.master_volume };
        TrackGains {
            calm: self.calm * scale,
            combat: self.combat * scale,
        }
    }
}

fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            master_volume: 1.0,
            music_volume: 1.0,
            music_fade_time: 2.0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_starts_calm() {
        let mixer = MusicMixer::new(&settings());
        assert_eq!(mixer.gains(), TrackGains { calm: 1.0, combat: 0.0 });
    }

    #[test]
    fn test_crossfade_to_combat() {
        let mut mixer = MusicMixer::new(&settings());
        mixer.handle_events(&[
            GameEvent::WaveAnnounced { wave: 1 },
            GameEvent::MusicCue(MusicCue::Combat),
        ]);
        assert_eq!(mixer.active(), MusicCue::Combat);

        mixer.update(1.0);
        let half = mixer.gains();
        assert!((half.calm - 0.5).abs() < 1e-5);
        assert!((half.combat - 0.5).abs() < 1e-5);

        mixer.update(5.0);
        assert_eq!(mixer.gains(), TrackGains { calm: 0.0, combat: 1.0 });
    }

    #[test]
    fn test_master_volume_scales_output() {
        let mut s = settings();
        s.master_volume = 0.5;
        let mixer = MusicMixer::new(&s);
        assert!((mixer.gains().calm - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_fade_time_switches_instantly() {
        let mut s = settings();
        s.music_fade_time = 0.0;
        let mut mixer = MusicMixer::new(&s);
        mixer.cue(MusicCue::Combat);
        mixer.update(0.016);
        assert_eq!(mixer.gains(), TrackGains { calm: 0.0, combat: 1.0 });
    }
}
