/// Enemy ships: wandering raiders and the boss.
///
/// Both are an `Enemy`; what differs (size, health, speed, volley shape,
/// shield) comes from the `Tactics` strategy.  `Boss` adds the fight phase
/// that gates all of its behaviour.

use std::f32::consts::TAU;

use rand::Rng;

use crate::clock::{Deadline, Millis};
use crate::entities::{Bounds, Entity, Explosion, ExplosionKind, Missile, MissileOwner, Rect, Target};
use crate::shield::Shield;
use crate::sinks::{RenderSurface, Sprite};
use crate::upgrade::UpgradeLevel;

/// Milliseconds between volleys.
pub const VOLLEY_COOLDOWN: Millis = 3000;

/// Missiles in the boss fan, and their vertical spacing.
const BOSS_FAN_SIZE: i32 = 5;
const BOSS_FAN_SPACING: f32 = 50.0;
/// The boss keeps its shield up while health stays above this.
const BOSS_SHIELD_HEALTH: i32 = 5;
const BOSS_SHIELD_LEVEL: u32 = 7;
const BOSS_WRECK_BLASTS: u32 = 20;
const BOSS_WRECK_STAGGER: Millis = 50;
/// Delay between the boss dying and being parked again.
pub const BOSS_RESET_DELAY: Millis = 500;

// ── Strategy ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tactics {
    Raider,
    Boss,
}

impl Tactics {
    pub fn size(&self) -> (f32, f32) {
        match self {
            Tactics::Raider => (90.0, 60.0),
            Tactics::Boss => (300.0, 270.0),
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            Tactics::Raider => 0.5,
            Tactics::Boss => 0.35,
        }
    }

    pub fn health(&self) -> i32 {
        match self {
            Tactics::Raider => 5,
            Tactics::Boss => 30,
        }
    }

    pub fn reward(&self) -> u32 {
        match self {
            Tactics::Raider => 5,
            Tactics::Boss => 30,
        }
    }

    /// Extra hold-off before the first volley after appearing.
    fn opening_delay(&self) -> Millis {
        match self {
            Tactics::Raider => 1500,
            Tactics::Boss => 5000,
        }
    }

    /// Missile spawn points for one volley fired by `enemy`.
    fn volley(&self, enemy: &Enemy) -> Vec<(f32, f32)> {
        match self {
            Tactics::Raider => vec![(enemy.x, enemy.y + enemy.height / 2.0 - 7.0)],
            Tactics::Boss => {
                let x = enemy.x + enemy.width - 50.0;
                let center_y = enemy.y + enemy.height / 2.0 - 8.0;
                let half = BOSS_FAN_SIZE / 2;
                (-half..=half)
                    .map(|i| (x, center_y + i as f32 * BOSS_FAN_SPACING))
                    .collect()
            }
        }
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub tactics: Tactics,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub target_x: f32,
    pub target_y: f32,
    pub shield: Option<Shield>,
    next_volley: Deadline,
}

impl Enemy {
    /// A raider entering from just past the right edge.
    pub fn raider(bounds: Bounds, now: Millis, rng: &mut impl Rng) -> Self {
        let tactics = Tactics::Raider;
        let (width, height) = tactics.size();
        Enemy {
            tactics,
            x: bounds.width + 100.0,
            y: rng.gen::<f32>() * bounds.height,
            width,
            height,
            speed: tactics.speed(),
            health: tactics.health(),
            target_x: bounds.width - 50.0,
            target_y: rng.gen::<f32>() * (bounds.height - height).max(0.0),
            shield: None,
            next_volley: Deadline::after(now, tactics.opening_delay() + VOLLEY_COOLDOWN),
        }
    }

    fn boss(bounds: Bounds, now: Millis) -> Self {
        let tactics = Tactics::Boss;
        let (width, height) = tactics.size();
        let rect = Rect::new(bounds.width + 400.0, 0.5 * bounds.height, width, height);
        let mut shield = Shield::around(rect, now);
        shield.efficiency = UpgradeLevel::at(BOSS_SHIELD_LEVEL, 1, 11);
        Enemy {
            tactics,
            x: rect.x,
            y: rect.y,
            width,
            height,
            speed: tactics.speed(),
            health: tactics.health(),
            target_x: bounds.width - 350.0,
            target_y: 0.5 * bounds.height,
            shield: Some(shield),
            next_volley: Deadline::after(now, tactics.opening_delay() + VOLLEY_COOLDOWN),
        }
    }

    /// Wander: pick a fresh target on any axis already reached, then take one
    /// step toward the target.
    pub fn advance(&mut self, bounds: Bounds, rng: &mut impl Rng) {
        if (self.y - self.target_y).abs() < self.speed {
            self.target_y = rng.gen::<f32>() * (bounds.height - self.height).max(0.0);
        }
        if (self.x - self.target_x).abs() < self.speed {
            let half = bounds.width / 2.0;
            self.target_x = half + rng.gen::<f32>() * (half - self.width).max(0.0);
        }
        self.step_toward_target();
    }

    /// Constant-speed step toward the target; lands exactly on it when closer
    /// than one step.
    fn step_toward_target(&mut self) {
        let dx = self.target_x - self.x;
        let dy = self.target_y - self.y;
        let distance = dx.hypot(dy);
        if distance <= self.speed {
            self.x = self.target_x;
            self.y = self.target_y;
        } else {
            self.x += dx / distance * self.speed;
            self.y += dy / distance * self.speed;
        }
    }

    /// Fire a volley if the cooldown has elapsed.  Returns the number of
    /// missiles pushed.
    pub fn fire(&mut self, now: Millis, missiles: &mut Vec<Missile>) -> usize {
        if !self.next_volley.is_due(now) {
            return 0;
        }
        self.next_volley.rearm(now, VOLLEY_COOLDOWN);
        let volley = self.tactics.volley(self);
        let count = volley.len();
        missiles.extend(
            volley
                .into_iter()
                .map(|(x, y)| Missile::new(MissileOwner::Enemy, x, y)),
        );
        count
    }

    pub fn tick_shield(&mut self, now: Millis) {
        let rect = self.rect();
        if let Some(shield) = self.shield.as_mut() {
            shield.tick(rect, now);
        }
    }

    pub fn is_shielded(&self) -> bool {
        self.shield.as_ref().map(Shield::is_active).unwrap_or(false)
    }

    /// Blast placed where `missile` struck.
    pub fn explode(&self, missile: &Missile, now: Millis) -> Explosion {
        Explosion::new(ExplosionKind::Raider, missile.x, missile.y - 40.0, now)
    }

    pub fn reward(&self) -> u32 {
        self.tactics.reward()
    }
}

impl Entity for Enemy {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        let sprite = match self.tactics {
            Tactics::Raider => Sprite::Raider,
            Tactics::Boss => Sprite::Boss,
        };
        surface.draw_sprite(sprite, self.x, self.y, self.width, self.height);
        if let Some(shield) = &self.shield {
            shield.draw(surface);
        }
    }
}

impl Target for Enemy {
    fn health(&self) -> i32 {
        self.health
    }

    /// An active shield soaks the hit; the missile is still consumed.
    fn take_hit(&mut self) {
        if !self.is_shielded() {
            self.health -= 1;
        }
    }
}

// ── Boss ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    /// Parked off-screen, inert.
    Dormant,
    Fighting,
    /// Destroyed; still drawn under its death burst until `reset_at`.
    Wrecked { reset_at: Deadline },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub craft: Enemy,
    phase: BossPhase,
}

impl Boss {
    pub fn new(bounds: Bounds, now: Millis) -> Self {
        Boss { craft: Enemy::boss(bounds, now), phase: BossPhase::Dormant }
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    /// Fight-active flag: gates update, fire and missile hits.
    pub fn is_in_fight(&self) -> bool {
        self.phase == BossPhase::Fighting
    }

    /// Put a fresh boss on its approach.  Only a dormant boss can start a
    /// fight; a wreck must settle first.
    pub fn start_fight(&mut self, bounds: Bounds, now: Millis) -> bool {
        if self.phase != BossPhase::Dormant {
            return false;
        }
        self.reset(bounds, now);
        if let Some(shield) = self.craft.shield.as_mut() {
            shield.activate(now);
        }
        self.phase = BossPhase::Fighting;
        true
    }

    /// Back to dormant, parked past the right edge at full health.
    pub fn reset(&mut self, bounds: Bounds, now: Millis) {
        let efficiency = self.craft.shield.as_ref().map(|s| s.efficiency);
        self.craft = Enemy::boss(bounds, now);
        if let (Some(shield), Some(level)) = (self.craft.shield.as_mut(), efficiency) {
            shield.efficiency = level;
        }
        self.phase = BossPhase::Dormant;
    }

    /// Re-park a dormant boss after the viewport changed size.
    pub fn resize(&mut self, bounds: Bounds) {
        self.craft.target_x = bounds.width - 350.0;
        if self.phase == BossPhase::Dormant {
            self.craft.x = bounds.width + 400.0;
            self.craft.y = 0.5 * bounds.height;
            self.craft.target_y = 0.5 * bounds.height;
        }
    }

    /// One fight tick: track the player vertically, keep the shield up while
    /// healthy, move, and drain or regenerate the shield.
    pub fn advance(&mut self, player: Rect, bounds: Bounds, now: Millis, rng: &mut impl Rng) {
        if !self.is_in_fight() {
            return;
        }
        let craft = &mut self.craft;
        craft.target_y = player.y - 0.5 * craft.height + 0.5 * player.height;
        if craft.health > BOSS_SHIELD_HEALTH && !craft.is_shielded() {
            if let Some(shield) = craft.shield.as_mut() {
                shield.activate(now);
            }
        }
        craft.advance(bounds, rng);
        craft.tick_shield(now);
    }

    pub fn fire(&mut self, now: Millis, missiles: &mut Vec<Missile>) -> usize {
        if !self.is_in_fight() {
            return 0;
        }
        self.craft.fire(now, missiles)
    }

    /// Mark the boss destroyed and return its death burst: explosions on a
    /// ring around the hull centre, each starting a little after the last.
    pub fn wreck(&mut self, now: Millis, rng: &mut impl Rng) -> Vec<Explosion> {
        self.phase = BossPhase::Wrecked { reset_at: Deadline::after(now, BOSS_RESET_DELAY) };
        if let Some(shield) = self.craft.shield.as_mut() {
            shield.deactivate();
        }

        let (cx, cy) = self.craft.rect().center();
        let max_radius = self.craft.width / 1.5;
        (0..BOSS_WRECK_BLASTS)
            .map(|i| {
                let angle = i as f32 / BOSS_WRECK_BLASTS as f32 * TAU;
                let radius = rng.gen::<f32>() * max_radius;
                Explosion::new(
                    ExplosionKind::Raider,
                    cx + radius * angle.cos(),
                    cy + radius * angle.sin(),
                    now + Millis::from(i) * BOSS_WRECK_STAGGER,
                )
            })
            .collect()
    }

    /// Park a wrecked boss once its reset deadline passes.
    pub fn settle(&mut self, bounds: Bounds, now: Millis) {
        if let BossPhase::Wrecked { reset_at } = self.phase {
            if reset_at.is_due(now) {
                self.reset(bounds, now);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        if self.phase != BossPhase::Dormant {
            self.craft.draw(surface);
        }
    }
}
