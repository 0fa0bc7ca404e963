mod support;

use approx::assert_relative_eq;
use space_ship_game::entities::*;
use space_ship_game::meteorite::{Meteorite, MeteoriteKind};
use space_ship_game::sinks::{Cue, Sprite};

use support::{bounds, seeded_rng, RecordingSurface, HEIGHT, WIDTH};

fn still_meteorite(kind: MeteoriteKind, x: f32, y: f32) -> Meteorite {
    Meteorite { kind, x, y, vx: 0.0, vy: 0.0, health: kind.health(), rotation: 0.0 }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn overlapping_rects_collide() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn touching_edges_do_not_collide() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
}

#[test]
fn rect_center() {
    assert_eq!(Rect::new(10.0, 20.0, 90.0, 60.0).center(), (55.0, 50.0));
}

// ── Missile ───────────────────────────────────────────────────────────────────

#[test]
fn player_missile_flies_right_and_exits_past_width() {
    let mut m = Missile::new(MissileOwner::Player, WIDTH - 5.0, 100.0);
    assert!(!m.advance(bounds())); // x == WIDTH, still on the edge
    assert_eq!(m.x, WIDTH);
    assert!(m.advance(bounds()));
}

#[test]
fn enemy_missile_flies_left_and_exits_past_zero() {
    let mut m = Missile::new(MissileOwner::Enemy, 5.0, 100.0);
    assert!(!m.advance(bounds()));
    assert_eq!(m.x, 0.0);
    assert!(m.advance(bounds()));
}

#[test]
fn missile_rect_is_fixed_size() {
    let m = Missile::new(MissileOwner::Player, 1.0, 2.0);
    assert_eq!(m.rect(), Rect::new(1.0, 2.0, MISSILE_WIDTH, MISSILE_HEIGHT));
}

// ── Meteorites ────────────────────────────────────────────────────────────────

#[test]
fn streak_needs_exactly_one_hit() {
    let mut rock = still_meteorite(MeteoriteKind::Streak, 100.0, 100.0);
    let mut missiles = vec![Missile::new(MissileOwner::Player, 90.0, 110.0)];
    assert_eq!(rock.health, 1);
    assert!(rock.register_hit(&mut missiles).is_some());
    assert!(rock.is_destroyed());
    assert!(missiles.is_empty());
}

#[test]
fn boulder_needs_exactly_three_hits() {
    let mut rock = still_meteorite(MeteoriteKind::Boulder, 100.0, 100.0);
    let mut missiles: Vec<Missile> = (0..4)
        .map(|i| Missile::new(MissileOwner::Player, 90.0, 100.0 + i as f32 * 10.0))
        .collect();
    for hit in 1..=3 {
        assert!(!rock.is_destroyed(), "destroyed before hit {}", hit);
        assert!(rock.register_hit(&mut missiles).is_some());
    }
    assert!(rock.is_destroyed());
    assert_eq!(missiles.len(), 1);
}

#[test]
fn register_hit_only_takes_overlapping_missiles() {
    let mut rock = still_meteorite(MeteoriteKind::Boulder, 100.0, 100.0);
    let far = Missile::new(MissileOwner::Player, 500.0, 500.0);
    let near = Missile::new(MissileOwner::Player, 120.0, 120.0);
    let mut missiles = vec![far.clone(), near.clone()];

    assert_eq!(rock.register_hit(&mut missiles), Some(near));
    assert_eq!(missiles, vec![far]);
    assert_eq!(rock.register_hit(&mut missiles), None);
    assert_eq!(rock.health, 2);
}

#[test]
fn streak_is_culled_on_the_tick_it_fully_exits() {
    let mut rock = still_meteorite(MeteoriteKind::Streak, -75.0, 100.0);
    rock.vx = -3.0;
    assert!(!rock.advance(bounds())); // right edge at 2
    assert!(rock.advance(bounds())); // right edge at -1
}

#[test]
fn falling_boulder_is_culled_below_the_field() {
    let mut rock = still_meteorite(MeteoriteKind::Boulder, 100.0, HEIGHT + 99.0);
    rock.vy = 1.0;
    assert!(!rock.advance(bounds()));
    assert!(rock.advance(bounds()));
}

#[test]
fn rising_boulder_is_culled_above_the_field() {
    let mut rock = still_meteorite(MeteoriteKind::Boulder, 100.0, -99.0);
    rock.vy = -1.0;
    assert!(!rock.advance(bounds()));
    assert!(rock.advance(bounds()));
}

#[test]
fn boulder_spins_while_moving() {
    let mut rock = still_meteorite(MeteoriteKind::Boulder, 100.0, 100.0);
    for _ in 0..10 {
        rock.advance(bounds());
    }
    assert_relative_eq!(rock.rotation, 0.05, epsilon = 1e-5);
}

#[test]
fn streak_spawns_beyond_the_right_edge() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let rock = Meteorite::spawn(MeteoriteKind::Streak, bounds(), &mut rng);
        assert_eq!(rock.x, WIDTH + 500.0);
        assert!(rock.vx <= -3.1 && rock.vx >= -6.1);
        assert!(rock.y >= 0.0 && rock.y <= HEIGHT - 50.0);
        assert_eq!(rock.health, 1);
    }
}

#[test]
fn boulder_spawns_above_or_below_heading_inward() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let rock = Meteorite::spawn(MeteoriteKind::Boulder, bounds(), &mut rng);
        if rock.vy > 0.0 {
            assert_eq!(rock.y, -200.0);
        } else {
            assert_eq!(rock.y, HEIGHT + 200.0);
        }
        assert!(rock.vy.abs() >= 0.5 && rock.vy.abs() <= 2.5);
        assert_eq!(rock.health, 3);
    }
}

#[test]
fn meteorite_explodes_where_the_missile_struck() {
    let rock = still_meteorite(MeteoriteKind::Streak, 100.0, 100.0);
    let missile = Missile::new(MissileOwner::Player, 95.0, 120.0);
    let blast = rock.explode(&missile, 7);
    assert_eq!((blast.x, blast.y), (95.0, 80.0));
    assert_eq!(blast.kind, ExplosionKind::Rock);
    assert_eq!(blast.created_at, 7);
}

#[test]
fn rotated_meteorite_draws_centred_on_its_position() {
    let rock = still_meteorite(MeteoriteKind::Boulder, 100.0, 100.0);
    let mut surface = RecordingSurface::default();
    rock.draw(&mut surface);
    assert_eq!(
        surface.sprites,
        vec![(Sprite::Meteorite(MeteoriteKind::Boulder), Rect::new(-40.0, -40.0, 80.0, 80.0))]
    );
}

// ── Explosions ────────────────────────────────────────────────────────────────

#[test]
fn explosion_lives_for_its_ttl() {
    let blast = Explosion::new(ExplosionKind::Rock, 0.0, 0.0, 1000);
    assert!(blast.is_live(1000));
    assert!(blast.is_live(1000 + EXPLOSION_TTL));
    assert!(!blast.is_expired(1000 + EXPLOSION_TTL));
    assert!(blast.is_expired(1001 + EXPLOSION_TTL));
}

#[test]
fn staged_explosion_waits_for_its_start() {
    let blast = Explosion::new(ExplosionKind::Raider, 0.0, 0.0, 500);
    assert!(!blast.is_live(400));
    assert!(!blast.is_expired(400));

    let mut surface = RecordingSurface::default();
    blast.draw(400, &mut surface);
    assert!(surface.sprites.is_empty());
}

#[test]
fn explosion_grows_from_its_centre() {
    let blast = Explosion::new(ExplosionKind::Rock, 0.0, 0.0, 0);
    assert_relative_eq!(blast.scale(125), 0.5);
    assert_relative_eq!(blast.scale(1000), 1.0);

    let mut surface = RecordingSurface::default();
    blast.draw(125, &mut surface);
    assert_eq!(surface.sprites, vec![(Sprite::Explosion, Rect::new(25.0, 25.0, 50.0, 50.0))]);
}

#[test]
fn explosion_cue_is_announced_once_when_started() {
    let mut blast = Explosion::new(ExplosionKind::Crash, 0.0, 0.0, 100);
    assert_eq!(blast.announce(50), None);
    assert_eq!(blast.announce(100), Some(Cue::Explosion(ExplosionKind::Crash)));
    assert_eq!(blast.announce(150), None);
}
