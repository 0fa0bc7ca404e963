/// Meteorites: the non-weapon hazards.

use rand::Rng;

use crate::clock::Millis;
use crate::entities::{Bounds, Entity, Explosion, ExplosionKind, Missile, Rect, Target};
use crate::sinks::{RenderSurface, Sprite};

/// Radians added to a boulder's spin every tick.
const SPIN_PER_TICK: f32 = 0.005;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeteoriteKind {
    /// Fast horizontal drifter entering from the right edge.  One hit.
    Streak,
    /// Slow vertical drifter entering from the top or bottom, spinning.  Three hits.
    Boulder,
}

impl MeteoriteKind {
    pub fn size(&self) -> (f32, f32) {
        match self {
            MeteoriteKind::Streak => (80.0, 50.0),
            MeteoriteKind::Boulder => (80.0, 80.0),
        }
    }

    pub fn health(&self) -> i32 {
        match self {
            MeteoriteKind::Streak => 1,
            MeteoriteKind::Boulder => 3,
        }
    }

    /// Score awarded when destroyed.
    pub fn reward(&self) -> u32 {
        match self {
            MeteoriteKind::Streak => 1,
            MeteoriteKind::Boulder => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Meteorite {
    pub kind: MeteoriteKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub health: i32,
    pub rotation: f32,
}

impl Meteorite {
    /// Create a meteorite just outside the viewport, on the side its kind enters from.
    pub fn spawn(kind: MeteoriteKind, bounds: Bounds, rng: &mut impl Rng) -> Self {
        let (_, height) = kind.size();
        match kind {
            MeteoriteKind::Streak => Meteorite {
                kind,
                x: bounds.width + 500.0,
                y: rng.gen::<f32>() * (bounds.height - height).max(0.0),
                vx: -3.1 - rng.gen::<f32>() * 3.0,
                vy: -1.5 + rng.gen::<f32>() * 3.0,
                health: kind.health(),
                rotation: 0.0,
            },
            MeteoriteKind::Boulder => {
                let vx = -1.0 + rng.gen::<f32>() * 2.0;
                let falling = rng.gen_bool(0.5);
                let speed = 0.5 + rng.gen::<f32>() * 2.0;
                let (vy, y) = if falling {
                    (speed, -200.0)
                } else {
                    (-speed, bounds.height + 200.0)
                };
                Meteorite {
                    kind,
                    x: rng.gen::<f32>() * bounds.width,
                    y,
                    vx,
                    vy,
                    health: kind.health(),
                    rotation: 0.0,
                }
            }
        }
    }

    /// Move one tick.  Returns `true` once the meteorite has fully left the
    /// viewport on the axis it travels along.
    pub fn advance(&mut self, bounds: Bounds) -> bool {
        self.x += self.vx;
        self.y += self.vy;

        match self.kind {
            MeteoriteKind::Streak => self.x + self.kind.size().0 < 0.0,
            MeteoriteKind::Boulder => {
                self.rotation += SPIN_PER_TICK;
                (self.vy > 0.0 && self.y > bounds.height + 100.0)
                    || (self.vy < 0.0 && self.y < -100.0)
            }
        }
    }

    pub fn reward(&self) -> u32 {
        self.kind.reward()
    }

    /// Blast placed where `missile` struck.
    pub fn explode(&self, missile: &Missile, now: Millis) -> Explosion {
        Explosion::new(ExplosionKind::Rock, missile.x, missile.y - 40.0, now)
    }
}

impl Entity for Meteorite {
    fn rect(&self) -> Rect {
        let (width, height) = self.kind.size();
        Rect::new(self.x, self.y, width, height)
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        let (width, height) = self.kind.size();
        surface.save();
        surface.translate(self.x + width / 2.0, self.y + height / 2.0);
        surface.rotate(self.rotation);
        surface.draw_sprite(
            Sprite::Meteorite(self.kind),
            -width / 2.0,
            -height / 2.0,
            width,
            height,
        );
        surface.restore();
    }
}

impl Target for Meteorite {
    fn health(&self) -> i32 {
        self.health
    }

    fn take_hit(&mut self) {
        self.health -= 1;
    }
}
