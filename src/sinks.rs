/// Boundaries to the host: drawing, sound and HUD text.
///
/// The simulation only talks to these traits.  The terminal host implements
/// them in `display` (surface + HUD) and here (`AudioLog`); tests plug in
/// recording doubles.

use log::debug;

use crate::entities::{ExplosionKind, MissileOwner, Rect};
use crate::meteorite::MeteoriteKind;
use crate::upgrade::{UpgradeStat, UpgradeStatus};

// ── Rendering ────────────────────────────────────────────────────────────────

/// Opaque visual handle for everything the game draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Ship,
    Shield,
    Missile(MissileOwner),
    Meteorite(MeteoriteKind),
    Raider,
    Boss,
    Explosion,
}

/// A 2D drawing surface sized to the viewport.
///
/// `translate` and `rotate` apply to subsequent `draw_sprite` calls until the
/// matching `restore`.
pub trait RenderSurface {
    fn clear(&mut self, area: Rect);
    fn draw_sprite(&mut self, sprite: Sprite, x: f32, y: f32, width: f32, height: f32);
    fn save(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
    fn restore(&mut self);
}

// ── Audio ────────────────────────────────────────────────────────────────────

/// One-shot sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Launch(MissileOwner),
    Explosion(ExplosionKind),
    ShieldUp,
    PlayerDestroyed,
    Warning,
}

/// Looping music tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Background,
    Boss,
}

/// Fire-and-forget audio.  Failing to play is never reported back.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn start_loop(&mut self, track: Track, volume: f32);
    fn stop_loop(&mut self, track: Track);
    fn ramp_volume(&mut self, track: Track, target: f32, duration_ms: u64);
}

/// Audio sink for hosts without a mixer: every cue becomes a debug log line.
#[derive(Debug, Default)]
pub struct AudioLog {
    muted: bool,
}

impl AudioLog {
    pub fn new(enabled: bool) -> Self {
        AudioLog { muted: !enabled }
    }
}

impl AudioSink for AudioLog {
    fn play(&mut self, cue: Cue) {
        if !self.muted {
            debug!("audio: play {:?}", cue);
        }
    }

    fn start_loop(&mut self, track: Track, volume: f32) {
        if !self.muted {
            debug!("audio: loop {:?} at {:.2}", track, volume);
        }
    }

    fn stop_loop(&mut self, track: Track) {
        if !self.muted {
            debug!("audio: stop {:?}", track);
        }
    }

    fn ramp_volume(&mut self, track: Track, target: f32, duration_ms: u64) {
        if !self.muted {
            debug!("audio: ramp {:?} to {:.2} over {}ms", track, target, duration_ms);
        }
    }
}

// ── HUD ──────────────────────────────────────────────────────────────────────

/// Text hooks for the score line, shield gauge and upgrade panel.
pub trait HudSink {
    fn score(&mut self, score: u32);
    fn shield_energy(&mut self, energy: u32);
    fn upgrade(&mut self, stat: UpgradeStat, status: &UpgradeStatus);
}
