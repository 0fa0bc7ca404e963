#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use space_ship_game::clock::Millis;
use space_ship_game::compute::{Frame, Game};
use space_ship_game::config::GameConfig;
use space_ship_game::entities::{Bounds, Rect};
use space_ship_game::input::{InputSnapshot, Keys};
use space_ship_game::sinks::{AudioSink, Cue, HudSink, RenderSurface, Sprite, Track};
use space_ship_game::upgrade::{UpgradeStat, UpgradeStatus};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

pub fn bounds() -> Bounds {
    Bounds::new(WIDTH, HEIGHT)
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Recording sinks ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSurface {
    pub clears: usize,
    pub sprites: Vec<(Sprite, Rect)>,
}

impl RecordingSurface {
    pub fn drew(&self, sprite: Sprite) -> bool {
        self.sprites.iter().any(|(s, _)| *s == sprite)
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self, _area: Rect) {
        self.clears += 1;
        self.sprites.clear();
    }

    fn draw_sprite(&mut self, sprite: Sprite, x: f32, y: f32, width: f32, height: f32) {
        self.sprites.push((sprite, Rect::new(x, y, width, height)));
    }

    fn save(&mut self) {}
    fn translate(&mut self, _dx: f32, _dy: f32) {}
    fn rotate(&mut self, _radians: f32) {}
    fn restore(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Play(Cue),
    Loop(Track, f32),
    Stop(Track),
    Ramp(Track, f32),
}

#[derive(Default)]
pub struct RecordingAudio {
    pub events: Vec<AudioEvent>,
}

impl RecordingAudio {
    pub fn played(&self, cue: Cue) -> usize {
        self.events.iter().filter(|e| **e == AudioEvent::Play(cue)).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.events.push(AudioEvent::Play(cue));
    }

    fn start_loop(&mut self, track: Track, volume: f32) {
        self.events.push(AudioEvent::Loop(track, volume));
    }

    fn stop_loop(&mut self, track: Track) {
        self.events.push(AudioEvent::Stop(track));
    }

    fn ramp_volume(&mut self, track: Track, target: f32, _duration_ms: u64) {
        self.events.push(AudioEvent::Ramp(track, target));
    }
}

#[derive(Default)]
pub struct RecordingHud {
    pub scores: Vec<u32>,
    pub energy: Vec<u32>,
    pub upgrades: Vec<(UpgradeStat, UpgradeStatus)>,
}

impl HudSink for RecordingHud {
    fn score(&mut self, score: u32) {
        self.scores.push(score);
    }

    fn shield_energy(&mut self, energy: u32) {
        self.energy.push(energy);
    }

    fn upgrade(&mut self, stat: UpgradeStat, status: &UpgradeStatus) {
        self.upgrades.push((stat, status.clone()));
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Stand-in for the terminal host: owns the sinks and a seeded RNG.
pub struct Host {
    pub surface: RecordingSurface,
    pub audio: RecordingAudio,
    pub hud: RecordingHud,
    pub rng: StdRng,
}

impl Host {
    pub fn new() -> Self {
        Host {
            surface: RecordingSurface::default(),
            audio: RecordingAudio::default(),
            hud: RecordingHud::default(),
            rng: seeded_rng(),
        }
    }

    pub fn tick(&mut self, game: &mut Game, now: Millis, input: &InputSnapshot) {
        let mut frame = Frame {
            now,
            input,
            surface: &mut self.surface,
            audio: &mut self.audio,
            hud: &mut self.hud,
        };
        game.tick(&mut frame, &mut self.rng);
    }

    pub fn idle(&mut self, game: &mut Game, now: Millis) {
        self.tick(game, now, &InputSnapshot::default());
    }
}

pub fn confirm() -> InputSnapshot {
    InputSnapshot::pressing(Keys { confirm: true, ..Keys::default() })
}

/// A game already started at `t = 0` on an 800×600 field.
pub fn playing_game(config: &GameConfig, host: &mut Host) -> Game {
    let mut game = Game::new(config, bounds(), 0);
    host.tick(&mut game, 0, &confirm());
    game
}
