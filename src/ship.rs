/// The player's spaceship.

use crate::clock::{elapsed, Millis};
use crate::enemy::{Boss, Enemy};
use crate::entities::{Bounds, Entity, Explosion, ExplosionKind, Missile, MissileOwner, Rect};
use crate::input::InputSnapshot;
use crate::meteorite::Meteorite;
use crate::shield::Shield;
use crate::sinks::{RenderSurface, Sprite};
use crate::upgrade::UpgradeLevel;

pub const SHIP_START: (f32, f32) = (50.0, 50.0);
pub const SHIP_WIDTH: f32 = 90.0;
pub const SHIP_HEIGHT: f32 = 60.0;
pub const SHIP_SPEED: f32 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SpaceShip {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Missiles per second.
    pub fire_rate: UpgradeLevel,
    pub shield: Shield,
    last_fired: Millis,
}

impl SpaceShip {
    pub fn new(now: Millis) -> Self {
        let rect = Rect::new(SHIP_START.0, SHIP_START.1, SHIP_WIDTH, SHIP_HEIGHT);
        SpaceShip {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            speed: SHIP_SPEED,
            fire_rate: UpgradeLevel::new(3, 13),
            shield: Shield::around(rect, now),
            last_fired: now,
        }
    }

    /// Back to the start position with a full shield.  Upgrades are kept.
    pub fn reset(&mut self, now: Millis) {
        self.x = SHIP_START.0;
        self.y = SHIP_START.1;
        self.last_fired = now;
        self.shield.reset(now);
    }

    /// Move one tick, either from the direction keys or toward the pointer.
    ///
    /// Each axis is applied only if the ship stays fully inside the viewport;
    /// an out-of-bounds step is dropped rather than clamped to the edge.
    pub fn move_by(&mut self, input: &InputSnapshot, mouse_control: bool, bounds: Bounds) {
        let mut new_x = self.x;
        let mut new_y = self.y;

        match input.pointer.filter(|_| mouse_control) {
            Some(pointer) => {
                let (cx, cy) = self.rect().center();
                let dx = pointer.x - cx;
                let dy = pointer.y - cy;
                // One step per axis, or straight onto the pointer when closer.
                new_x += if dx.abs() > self.speed { self.speed.copysign(dx) } else { dx };
                new_y += if dy.abs() > self.speed { self.speed.copysign(dy) } else { dy };
            }
            None => {
                let keys = &input.held;
                if keys.up {
                    new_y -= self.speed;
                }
                if keys.down {
                    new_y += self.speed;
                }
                if keys.left {
                    new_x -= self.speed;
                }
                if keys.right {
                    new_x += self.speed;
                }
            }
        }

        if new_x >= 0.0 && new_x + self.width <= bounds.width {
            self.x = new_x;
        }
        if new_y >= 0.0 && new_y + self.height <= bounds.height {
            self.y = new_y;
        }
    }

    /// Minimum milliseconds between two shots.
    pub fn fire_interval(&self) -> f32 {
        1000.0 / self.fire_rate.current.max(1) as f32
    }

    /// Launch a missile from the nose if the trigger is down and the cooldown
    /// has elapsed.
    pub fn fire(&mut self, trigger: bool, now: Millis) -> Option<Missile> {
        if !trigger || (elapsed(now, self.last_fired) as f32) < self.fire_interval() {
            return None;
        }
        self.last_fired = now;
        Some(Missile::new(
            MissileOwner::Player,
            self.x + self.width,
            self.y + self.height / 2.0 - 7.0,
        ))
    }

    pub fn tick_shield(&mut self, now: Millis) {
        let rect = self.rect();
        self.shield.tick(rect, now);
    }

    pub fn explode(&self, now: Millis) -> Explosion {
        Explosion::new(ExplosionKind::Crash, self.x - 20.0, self.y - 20.0, now)
    }

    /// True if the unshielded ship overlaps any hazard.
    pub fn check_collisions(
        &self,
        meteorites: &[Meteorite],
        enemy_missiles: &[Missile],
        enemies: &[Enemy],
        boss: &Boss,
    ) -> bool {
        if self.shield.is_active() {
            return false;
        }
        meteorites.iter().any(|m| self.collides_with(m))
            || enemy_missiles.iter().any(|m| self.collides_with(m))
            || enemies.iter().any(|e| self.collides_with(e))
            || (boss.is_in_fight() && self.collides_with(&boss.craft))
    }
}

impl Entity for SpaceShip {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.draw_sprite(Sprite::Ship, self.x, self.y, self.width, self.height);
    }
}
