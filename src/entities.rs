/// Shared entity contract plus the small entity types: missiles and explosions.

use crate::clock::{elapsed, Millis};
use crate::sinks::{Cue, RenderSurface, Sprite};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Size of the play field in world pixels.  Passed into every update so that
/// a resize takes effect on the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Bounds { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /// Strict overlap on all four sides: touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

/// Anything with a bounding box that can be drawn.
pub trait Entity {
    fn rect(&self) -> Rect;

    /// Render at the current position.  Never mutates state.
    fn draw(&self, surface: &mut dyn RenderSurface);

    fn collides_with(&self, other: &dyn Entity) -> bool {
        self.rect().overlaps(&other.rect())
    }
}

/// An entity that player missiles can damage.
pub trait Target: Entity {
    fn health(&self) -> i32;

    /// Apply one hit.  Implementations may ignore the damage (shields).
    fn take_hit(&mut self);

    fn is_destroyed(&self) -> bool {
        self.health() <= 0
    }

    /// Consume the first missile overlapping this target, apply exactly one
    /// hit for it and hand the missile back to the caller.
    fn register_hit(&mut self, missiles: &mut Vec<Missile>) -> Option<Missile> {
        let own = self.rect();
        let index = missiles.iter().position(|m| m.rect().overlaps(&own))?;
        let missile = missiles.remove(index);
        self.take_hit();
        Some(missile)
    }
}

// ── Missiles ─────────────────────────────────────────────────────────────────

pub const MISSILE_WIDTH: f32 = 40.0;
pub const MISSILE_HEIGHT: f32 = 16.0;
pub const MISSILE_SPEED: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissileOwner {
    /// Fired by the player, flies right.
    Player,
    /// Fired by raiders and the boss, flies left.
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Missile {
    pub x: f32,
    pub y: f32,
    pub owner: MissileOwner,
}

impl Missile {
    pub fn new(owner: MissileOwner, x: f32, y: f32) -> Self {
        Missile { x, y, owner }
    }

    /// Move one step along the owner's direction.  Returns `true` once the
    /// missile has left the viewport and should be dropped.
    pub fn advance(&mut self, bounds: Bounds) -> bool {
        match self.owner {
            MissileOwner::Player => {
                self.x += MISSILE_SPEED;
                self.x > bounds.width
            }
            MissileOwner::Enemy => {
                self.x -= MISSILE_SPEED;
                self.x < 0.0
            }
        }
    }
}

impl Entity for Missile {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, MISSILE_WIDTH, MISSILE_HEIGHT)
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.draw_sprite(
            Sprite::Missile(self.owner),
            self.x,
            self.y,
            MISSILE_WIDTH,
            MISSILE_HEIGHT,
        );
    }
}

// ── Explosions ───────────────────────────────────────────────────────────────

pub const EXPLOSION_TTL: Millis = 250;
pub const EXPLOSION_SIZE: f32 = 100.0;

/// Which blast sound accompanies the explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExplosionKind {
    /// Enemy ships hit or destroyed.
    Raider,
    /// Meteorite hits.
    Rock,
    /// The player's ship.
    Crash,
}

/// Short-lived blast that grows from nothing to full size over its lifetime.
///
/// `created_at` may lie in the future: staged bursts (the boss wreck) are
/// queued up front and only become visible once their start time arrives.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub kind: ExplosionKind,
    pub created_at: Millis,
    announced: bool,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, x: f32, y: f32, created_at: Millis) -> Self {
        Explosion { x, y, kind, created_at, announced: false }
    }

    pub fn is_live(&self, now: Millis) -> bool {
        now >= self.created_at && !self.is_expired(now)
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        now > self.created_at && elapsed(now, self.created_at) > EXPLOSION_TTL
    }

    /// Growth factor in `[0, 1]`.
    pub fn scale(&self, now: Millis) -> f32 {
        (elapsed(now, self.created_at) as f32 / EXPLOSION_TTL as f32).min(1.0)
    }

    /// The sound cue to play the first time the explosion goes live.
    pub fn announce(&mut self, now: Millis) -> Option<Cue> {
        if self.announced || now < self.created_at {
            return None;
        }
        self.announced = true;
        Some(Cue::Explosion(self.kind))
    }

    pub fn draw(&self, now: Millis, surface: &mut dyn RenderSurface) {
        if !self.is_live(now) {
            return;
        }
        let size = EXPLOSION_SIZE * self.scale(now);
        let inset = (EXPLOSION_SIZE - size) / 2.0;
        surface.draw_sprite(Sprite::Explosion, self.x + inset, self.y + inset, size, size);
    }
}
