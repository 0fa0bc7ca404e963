/// Shield energy model shared by the player ship and the boss.
///
/// The shield never references its owner.  The owner passes its bounding box
/// into `tick`, and the shield re-centres itself on it.

use crate::clock::{elapsed, Millis};
use crate::entities::{Entity, Rect};
use crate::sinks::{RenderSurface, Sprite};
use crate::upgrade::UpgradeLevel;

pub const MAX_ENERGY: f32 = 100.0;
pub const COST_PER_SECOND: f32 = 10.0;
/// Energy must exceed this before the shield can be raised.
pub const ACTIVATION_THRESHOLD: f32 = 3.0;
/// Passive regen cadence while the shield is down.
pub const RECHARGE_INTERVAL: Millis = 1000;

const PADDING: f32 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Shield {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub cost_per_second: f32,
    pub efficiency: UpgradeLevel,
    active: bool,
    last_update: Millis,
    last_recharge: Millis,
}

impl Shield {
    /// A full, inactive shield sized to wrap `owner`.
    pub fn around(owner: Rect, now: Millis) -> Self {
        let size = owner.width.max(owner.height) + PADDING;
        let mut shield = Shield {
            x: 0.0,
            y: 0.0,
            size,
            energy: MAX_ENERGY,
            max_energy: MAX_ENERGY,
            cost_per_second: COST_PER_SECOND,
            efficiency: UpgradeLevel::new(1, 11),
            active: false,
            last_update: now,
            last_recharge: now,
        };
        shield.follow(owner);
        shield
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Raise the shield if there is enough energy.  Returns `true` only when
    /// the shield went from down to up, so the caller can play the cue once.
    pub fn activate(&mut self, now: Millis) -> bool {
        if self.energy <= ACTIVATION_THRESHOLD {
            return false;
        }
        let was_active = self.active;
        self.active = true;
        self.last_update = now;
        !was_active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn recharge(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, self.max_energy);
    }

    /// Energy drained per second at the current efficiency level.
    pub fn drain_rate(&self) -> f32 {
        let discount = (self.efficiency.current.saturating_sub(1)) as f32 / 11.0;
        self.cost_per_second * (1.0 - discount)
    }

    /// Refill and re-time the shield for a new session.
    pub fn reset(&mut self, now: Millis) {
        self.energy = self.max_energy;
        self.active = false;
        self.last_update = now;
        self.last_recharge = now;
    }

    /// Follow the owner, then drain while up or regenerate while down.
    pub fn tick(&mut self, owner: Rect, now: Millis) {
        self.follow(owner);
        let dt = elapsed(now, self.last_update);
        self.last_update = now;

        if self.active {
            let cost = dt as f32 / 1000.0 * self.drain_rate();
            if self.energy >= cost {
                self.energy -= cost;
            } else {
                self.active = false;
            }
        } else if elapsed(now, self.last_recharge) >= RECHARGE_INTERVAL {
            self.recharge(1.0);
            self.last_recharge = now;
        }
    }

    fn follow(&mut self, owner: Rect) {
        self.x = owner.x - 0.5 * (self.size - owner.width);
        self.y = owner.y - 0.5 * (self.size - owner.height);
    }
}

impl Entity for Shield {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        if self.active {
            surface.draw_sprite(Sprite::Shield, self.x, self.y, self.size, self.size);
        }
    }
}
