/// Game orchestrator.
///
/// `Game` owns every entity collection and advances the session one frame at
/// a time.  All host interaction goes through the `Frame` context passed to
/// `tick`: the injected clock, the input snapshot and the three sinks.
/// Randomness comes through an injected `Rng`, so tests can seed it.

use log::{debug, info};
use rand::Rng;

use crate::clock::{Deadline, Millis};
use crate::config::{ControlsConfig, Difficulty, GameConfig, ShieldMode};
use crate::enemy::{Boss, Enemy};
use crate::entities::{Bounds, Entity, Explosion, Missile, MissileOwner, Target};
use crate::input::InputSnapshot;
use crate::meteorite::{Meteorite, MeteoriteKind};
use crate::ship::SpaceShip;
use crate::sinks::{AudioSink, Cue, HudSink, RenderSurface, Track};
use crate::upgrade::{self, UpgradeLevel, UpgradeStat, UpgradeStatus};

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const STREAK_INTERVAL: Millis = 2500;
pub const BOULDER_INTERVAL: Millis = 5000;
pub const RAIDER_INTERVAL: Millis = 10_000;
/// How long the boss warning banner stays up.
pub const WARNING_DURATION: Millis = 5000;
pub const MUSIC_RAMP: Millis = 5000;
/// Shield energy refunded for each raider destroyed.
pub const RAIDER_KILL_RECHARGE: f32 = 10.0;
const MAX_BATCH: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Everything the host hands the game for one frame.
pub struct Frame<'a> {
    pub now: Millis,
    pub input: &'a InputSnapshot,
    pub surface: &'a mut dyn RenderSurface,
    pub audio: &'a mut dyn AudioSink,
    pub hud: &'a mut dyn HudSink,
}

// ── Session state ────────────────────────────────────────────────────────────

pub struct Game {
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub controls: ControlsConfig,
    pub player: SpaceShip,
    /// Player missiles.
    pub missiles: Vec<Missile>,
    /// Raider and boss missiles.
    pub enemy_missiles: Vec<Missile>,
    pub meteorites: Vec<Meteorite>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub boss: Boss,
    pub score: u32,
    /// Highest boss threshold already consumed.
    pub last_boss_score: u32,
    bounds: Bounds,
    boss_score_step: u32,
    music_volume: f32,
    next_streak: Deadline,
    next_boulder: Deadline,
    next_raider: Deadline,
    warning_until: Option<Deadline>,
    shield_toggle_armed: bool,
}

impl Game {
    pub fn new(config: &GameConfig, bounds: Bounds, now: Millis) -> Self {
        Game {
            status: GameStatus::Start,
            difficulty: config.difficulty,
            controls: config.controls.clone(),
            player: SpaceShip::new(now),
            missiles: Vec::new(),
            enemy_missiles: Vec::new(),
            meteorites: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            boss: Boss::new(bounds, now),
            score: 0,
            last_boss_score: 0,
            bounds,
            boss_score_step: config.gameplay.boss_score_step.max(1),
            music_volume: config.audio.music_volume.clamp(0.0, 1.0),
            next_streak: Deadline::at(now),
            next_boulder: Deadline::at(now),
            next_raider: Deadline::at(now),
            warning_until: None,
            shield_toggle_armed: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Adopt a new viewport.  The player is pulled back inside it and a
    /// dormant boss is re-parked.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        let player = &mut self.player;
        player.x = player.x.min(bounds.width - player.width).max(0.0);
        player.y = player.y.min(bounds.height - player.height).max(0.0);
        self.boss.resize(bounds);
    }

    /// Difficulty can only change between sessions.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if matches!(self.status, GameStatus::Playing | GameStatus::Paused) {
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    /// True while the boss warning banner should be shown.
    pub fn warning_active(&self, now: Millis) -> bool {
        self.warning_until.map(|d| !d.is_due(now)).unwrap_or(false)
    }

    /// Meteorites per spawn batch at the current score and difficulty.
    pub fn batch_size(&self) -> usize {
        let base = (self.score / 50 + 2).min(MAX_BATCH);
        (base as f32 * self.difficulty.batch_scale()).round().max(1.0) as usize
    }

    fn scaled(&self, interval: Millis) -> Millis {
        (interval as f32 * self.difficulty.interval_scale()).round() as Millis
    }

    // ── Upgrades ─────────────────────────────────────────────────────────────

    pub fn upgrade_track(&self, stat: UpgradeStat) -> &UpgradeLevel {
        match stat {
            UpgradeStat::FireRate => &self.player.fire_rate,
            UpgradeStat::ShieldEfficiency => &self.player.shield.efficiency,
        }
    }

    pub fn upgrade_status(&self, stat: UpgradeStat) -> UpgradeStatus {
        self.upgrade_track(stat).status()
    }

    /// Spend score on one level of `stat`.  Rejected purchases change nothing.
    pub fn purchase_upgrade(&mut self, stat: UpgradeStat, hud: &mut dyn HudSink) -> bool {
        let track = match stat {
            UpgradeStat::FireRate => &mut self.player.fire_rate,
            UpgradeStat::ShieldEfficiency => &mut self.player.shield.efficiency,
        };
        match upgrade::purchase(track, &mut self.score) {
            Ok(level) => {
                info!("{} upgraded to level {}", stat.label(), level);
                hud.upgrade(stat, &track.status());
                hud.score(self.score);
                true
            }
            Err(err) => {
                debug!("{} upgrade rejected: {}", stat.label(), err);
                false
            }
        }
    }

    // ── Session lifecycle ────────────────────────────────────────────────────

    /// Throw away the current session and start a fresh one.  Upgrades bought
    /// so far are kept.
    pub fn start_new_game(&mut self, now: Millis, audio: &mut dyn AudioSink, hud: &mut dyn HudSink) {
        audio.stop_loop(Track::Background);
        audio.stop_loop(Track::Boss);
        audio.start_loop(Track::Background, self.music_volume);

        self.missiles.clear();
        self.enemy_missiles.clear();
        self.meteorites.clear();
        self.enemies.clear();
        self.explosions.clear();
        self.player.reset(now);
        self.boss.reset(self.bounds, now);

        self.next_streak = Deadline::after(now, 2 * self.scaled(STREAK_INTERVAL));
        self.next_boulder = Deadline::after(now, 2 * self.scaled(BOULDER_INTERVAL));
        self.next_raider = Deadline::after(now, self.scaled(RAIDER_INTERVAL));
        self.warning_until = None;
        self.shield_toggle_armed = false;

        self.last_boss_score = 0;
        self.score = 0;
        hud.score(self.score);
        hud.shield_energy(self.player.shield.energy.floor() as u32);
        for stat in UpgradeStat::ALL {
            hud.upgrade(stat, &self.upgrade_status(stat));
        }

        self.status = GameStatus::Playing;
        info!("new game on {}", self.difficulty.label());
    }

    // ── Frame entry point ────────────────────────────────────────────────────

    pub fn tick<R: Rng>(&mut self, frame: &mut Frame, rng: &mut R) {
        match self.status {
            GameStatus::Start => {
                frame.surface.clear(self.bounds.rect());
                if frame.input.pressed.confirm {
                    self.start_new_game(frame.now, frame.audio, frame.hud);
                }
            }
            GameStatus::Playing => self.play(frame, rng),
            GameStatus::Paused => {
                self.draw(frame.now, frame.surface);
                if frame.input.pressed.pause || frame.input.pressed.confirm {
                    self.status = GameStatus::Playing;
                    info!("resumed");
                }
            }
            GameStatus::GameOver => {
                self.prune_explosions(frame.now, frame.audio);
                self.draw(frame.now, frame.surface);
                if frame.input.pressed.confirm {
                    self.start_new_game(frame.now, frame.audio, frame.hud);
                }
            }
        }
    }

    /// One playing frame.  The order below is what makes same-frame
    /// interactions consistent: move, draw, then resolve hits.
    fn play<R: Rng>(&mut self, frame: &mut Frame, rng: &mut R) {
        let now = frame.now;
        let input = frame.input;

        self.check_boss_trigger(now, frame.audio);
        self.control_shield(input, now, frame.audio);

        self.player.move_by(input, self.controls.mouse_control, self.bounds);
        let trigger = input.held.fire || self.controls.always_fire;
        if let Some(missile) = self.player.fire(trigger, now) {
            self.missiles.push(missile);
            frame.audio.play(Cue::Launch(MissileOwner::Player));
        }
        self.player.tick_shield(now);

        self.update_missiles();
        self.update_meteorites(now, rng);
        self.update_enemies(now, rng, frame.audio);
        self.update_boss(now, rng, frame.audio);
        self.prune_explosions(now, frame.audio);

        frame.hud.shield_energy(self.player.shield.energy.floor() as u32);

        self.draw(now, frame.surface);

        self.resolve_meteorite_hits(now, frame.hud);
        self.resolve_enemy_hits(now, frame.hud);
        self.resolve_boss_hits(now, rng, frame.audio, frame.hud);

        if self.player.check_collisions(
            &self.meteorites,
            &self.enemy_missiles,
            &self.enemies,
            &self.boss,
        ) {
            self.game_over(now, frame.audio);
        } else if input.pressed.pause {
            self.status = GameStatus::Paused;
            info!("paused");
        }
    }

    // ── Controls ─────────────────────────────────────────────────────────────

    fn control_shield(&mut self, input: &InputSnapshot, now: Millis, audio: &mut dyn AudioSink) {
        let held = input.shield_held();
        let shield = &mut self.player.shield;
        match self.controls.shield_mode {
            ShieldMode::Hold => {
                if held && !shield.is_active() {
                    if shield.activate(now) {
                        audio.play(Cue::ShieldUp);
                    }
                } else if !held && shield.is_active() {
                    shield.deactivate();
                }
            }
            ShieldMode::Toggle => {
                if held {
                    self.shield_toggle_armed = true;
                } else if self.shield_toggle_armed {
                    self.shield_toggle_armed = false;
                    if shield.is_active() {
                        shield.deactivate();
                    } else if shield.activate(now) {
                        audio.play(Cue::ShieldUp);
                    }
                }
            }
        }
    }

    // ── Updates ──────────────────────────────────────────────────────────────

    fn update_missiles(&mut self) {
        let bounds = self.bounds;
        self.missiles.retain_mut(|m| !m.advance(bounds));
        self.enemy_missiles.retain_mut(|m| !m.advance(bounds));
    }

    fn update_meteorites<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        let bounds = self.bounds;
        self.meteorites.retain_mut(|m| !m.advance(bounds));

        let batch = self.batch_size();
        if self.next_streak.is_due(now) {
            self.spawn_meteorites(MeteoriteKind::Streak, batch, rng);
            let interval = self.scaled(STREAK_INTERVAL);
            self.next_streak.rearm(now, interval);
        }
        if self.next_boulder.is_due(now) {
            self.spawn_meteorites(MeteoriteKind::Boulder, batch, rng);
            let interval = self.scaled(BOULDER_INTERVAL);
            self.next_boulder.rearm(now, interval);
        }
    }

    fn spawn_meteorites<R: Rng>(&mut self, kind: MeteoriteKind, count: usize, rng: &mut R) {
        let bounds = self.bounds;
        self.meteorites
            .extend((0..count).map(|_| Meteorite::spawn(kind, bounds, rng)));
        debug!("spawned {} {:?} meteorites", count, kind);
    }

    fn update_enemies<R: Rng>(&mut self, now: Millis, rng: &mut R, audio: &mut dyn AudioSink) {
        let bounds = self.bounds;
        let mut fired = 0;
        for enemy in &mut self.enemies {
            enemy.advance(bounds, rng);
            fired += enemy.fire(now, &mut self.enemy_missiles);
        }
        if fired > 0 {
            audio.play(Cue::Launch(MissileOwner::Enemy));
        }

        if self.next_raider.is_due(now) {
            self.enemies.push(Enemy::raider(bounds, now, rng));
            let interval = self.scaled(RAIDER_INTERVAL);
            self.next_raider.rearm(now, interval);
            debug!("raider spawned, {} on screen", self.enemies.len());
        }
    }

    fn update_boss<R: Rng>(&mut self, now: Millis, rng: &mut R, audio: &mut dyn AudioSink) {
        self.boss.settle(self.bounds, now);
        if !self.boss.is_in_fight() {
            return;
        }
        self.boss.advance(self.player.rect(), self.bounds, now, rng);
        if self.boss.fire(now, &mut self.enemy_missiles) > 0 {
            audio.play(Cue::Launch(MissileOwner::Enemy));
        }
    }

    /// Sound every explosion that has started, then drop the finished ones.
    /// A blast that started and ended between two ticks is still heard.
    fn prune_explosions(&mut self, now: Millis, audio: &mut dyn AudioSink) {
        for explosion in &mut self.explosions {
            if let Some(cue) = explosion.announce(now) {
                audio.play(cue);
            }
        }
        self.explosions.retain(|e| !e.is_expired(now));
    }

    fn check_boss_trigger(&mut self, now: Millis, audio: &mut dyn AudioSink) {
        let next = self.last_boss_score.saturating_add(self.boss_score_step);
        if self.score < next {
            return;
        }
        self.last_boss_score = next;
        if !self.boss.start_fight(self.bounds, now) {
            return;
        }
        info!("boss fight at score {}", self.score);
        self.warning_until = Some(Deadline::after(now, WARNING_DURATION));
        audio.ramp_volume(Track::Background, self.music_volume * 3.0 / 8.0, MUSIC_RAMP);
        audio.play(Cue::Warning);
        audio.start_loop(Track::Boss, 0.01);
        audio.ramp_volume(Track::Boss, self.music_volume, MUSIC_RAMP);
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    fn draw(&self, now: Millis, surface: &mut dyn RenderSurface) {
        surface.clear(self.bounds.rect());

        self.player.draw(surface);
        self.player.shield.draw(surface);
        for missile in self.missiles.iter().chain(&self.enemy_missiles) {
            missile.draw(surface);
        }
        for meteorite in &self.meteorites {
            meteorite.draw(surface);
        }
        for explosion in &self.explosions {
            explosion.draw(now, surface);
        }
        for enemy in &self.enemies {
            enemy.draw(surface);
        }
        self.boss.draw(surface);
    }

    // ── Hit resolution ───────────────────────────────────────────────────────

    fn add_score(&mut self, points: u32, hud: &mut dyn HudSink) {
        self.score = self.score.saturating_add(points);
        hud.score(self.score);
    }

    fn resolve_meteorite_hits(&mut self, now: Millis, hud: &mut dyn HudSink) {
        let mut gained = 0;
        for meteorite in &mut self.meteorites {
            while !meteorite.is_destroyed() {
                let Some(missile) = meteorite.register_hit(&mut self.missiles) else {
                    break;
                };
                self.explosions.push(meteorite.explode(&missile, now));
            }
            if meteorite.is_destroyed() {
                gained += meteorite.reward();
            }
        }
        self.meteorites.retain(|m| !m.is_destroyed());
        if gained > 0 {
            self.add_score(gained, hud);
        }
    }

    fn resolve_enemy_hits(&mut self, now: Millis, hud: &mut dyn HudSink) {
        let mut gained = 0;
        let mut kills = 0;
        for enemy in &mut self.enemies {
            while !enemy.is_destroyed() {
                let Some(missile) = enemy.register_hit(&mut self.missiles) else {
                    break;
                };
                self.explosions.push(enemy.explode(&missile, now));
            }
            if enemy.is_destroyed() {
                gained += enemy.reward();
                kills += 1;
            }
        }
        self.enemies.retain(|e| !e.is_destroyed());
        if kills > 0 {
            self.player.shield.recharge(RAIDER_KILL_RECHARGE * kills as f32);
            self.add_score(gained, hud);
        }
    }

    fn resolve_boss_hits<R: Rng>(
        &mut self,
        now: Millis,
        rng: &mut R,
        audio: &mut dyn AudioSink,
        hud: &mut dyn HudSink,
    ) {
        if !self.boss.is_in_fight() {
            return;
        }
        let craft = &mut self.boss.craft;
        while !craft.is_destroyed() {
            let Some(missile) = craft.register_hit(&mut self.missiles) else {
                break;
            };
            self.explosions.push(craft.explode(&missile, now));
        }
        if !craft.is_destroyed() {
            return;
        }

        let reward = craft.reward();
        let burst = self.boss.wreck(now, rng);
        self.explosions.extend(burst);
        audio.ramp_volume(Track::Boss, 0.01, MUSIC_RAMP);
        audio.ramp_volume(Track::Background, self.music_volume, MUSIC_RAMP);
        self.add_score(reward, hud);
        info!("boss destroyed, score {}", self.score);
    }

    fn game_over(&mut self, now: Millis, audio: &mut dyn AudioSink) {
        self.explosions.push(self.player.explode(now));
        audio.play(Cue::PlayerDestroyed);
        audio.stop_loop(Track::Background);
        audio.stop_loop(Track::Boss);
        self.status = GameStatus::GameOver;
        info!("game over with score {}", self.score);
    }
}
