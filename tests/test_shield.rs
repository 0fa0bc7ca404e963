use approx::assert_relative_eq;
use space_ship_game::entities::{Entity, Rect};
use space_ship_game::shield::*;
use space_ship_game::upgrade::UpgradeLevel;

fn owner() -> Rect {
    Rect::new(50.0, 50.0, 90.0, 60.0)
}

fn shield_at_level(level: u32) -> Shield {
    let mut shield = Shield::around(owner(), 0);
    shield.efficiency = UpgradeLevel::at(level, 1, 11);
    shield
}

/// Keep the shield up from `t = 0` to `until`, ticking every `step` ms.
fn sustain(shield: &mut Shield, until: u64, step: u64) {
    assert!(shield.activate(0));
    let mut now = 0;
    while now < until {
        now += step;
        shield.tick(owner(), now);
    }
}

// ── Drain ─────────────────────────────────────────────────────────────────────

#[test]
fn two_seconds_at_level_one_costs_twenty() {
    let mut shield = shield_at_level(1);
    sustain(&mut shield, 2000, 100);
    assert!(shield.is_active());
    assert_relative_eq!(shield.energy, 80.0, epsilon = 1e-3);
}

#[test]
fn two_seconds_at_max_efficiency_costs_under_two() {
    let mut shield = shield_at_level(11);
    sustain(&mut shield, 2000, 16);
    assert_relative_eq!(shield.energy, 100.0 - 20.0 / 11.0, epsilon = 1e-3);
}

#[test]
fn drain_rate_falls_with_efficiency() {
    assert_relative_eq!(shield_at_level(1).drain_rate(), 10.0);
    assert_relative_eq!(shield_at_level(7).drain_rate(), 10.0 * (1.0 - 6.0 / 11.0));
    assert_relative_eq!(shield_at_level(11).drain_rate(), 10.0 / 11.0, epsilon = 1e-6);
}

#[test]
fn shield_drops_instead_of_going_negative() {
    let mut shield = shield_at_level(1);
    shield.energy = 4.0;
    assert!(shield.activate(0));
    for t in 1..=100 {
        shield.tick(owner(), t * 100);
        assert!(shield.energy >= 0.0 && shield.energy <= MAX_ENERGY);
    }
    assert!(!shield.is_active());
}

// ── Activation ────────────────────────────────────────────────────────────────

#[test]
fn activation_needs_energy_above_threshold() {
    let mut shield = shield_at_level(1);
    shield.energy = ACTIVATION_THRESHOLD;
    assert!(!shield.activate(0));
    assert!(!shield.is_active());

    shield.energy = ACTIVATION_THRESHOLD + 0.5;
    assert!(shield.activate(0));
    assert!(shield.is_active());
}

#[test]
fn activate_reports_only_the_transition() {
    let mut shield = shield_at_level(1);
    assert!(shield.activate(0));
    assert!(!shield.activate(10));
    assert!(shield.is_active());
}

#[test]
fn deactivate_twice_is_a_no_op() {
    let mut shield = shield_at_level(1);
    shield.energy = 42.0;
    shield.deactivate();
    let before = shield.clone();
    shield.deactivate();
    assert_eq!(shield, before);
}

// ── Regeneration ──────────────────────────────────────────────────────────────

#[test]
fn idle_shield_regenerates_one_point_per_second() {
    let mut shield = shield_at_level(1);
    shield.energy = 50.0;
    shield.tick(owner(), 999);
    assert_relative_eq!(shield.energy, 50.0);
    shield.tick(owner(), 1000);
    assert_relative_eq!(shield.energy, 51.0);
    shield.tick(owner(), 1500);
    assert_relative_eq!(shield.energy, 51.0);
    shield.tick(owner(), 2000);
    assert_relative_eq!(shield.energy, 52.0);
}

#[test]
fn recharge_is_clamped_to_max() {
    let mut shield = shield_at_level(1);
    shield.energy = 95.0;
    shield.recharge(10.0);
    assert_relative_eq!(shield.energy, MAX_ENERGY);
    shield.recharge(-500.0);
    assert_relative_eq!(shield.energy, 0.0);
}

#[test]
fn reset_refills_and_lowers() {
    let mut shield = shield_at_level(4);
    shield.activate(0);
    shield.energy = 12.0;
    shield.reset(5000);
    assert!(!shield.is_active());
    assert_relative_eq!(shield.energy, MAX_ENERGY);
    assert_eq!(shield.efficiency.current, 4);
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn shield_wraps_and_follows_its_owner() {
    let mut shield = shield_at_level(1);
    assert_eq!(shield.size, 120.0);
    assert_eq!(shield.rect().center(), owner().center());

    let moved = Rect::new(200.0, 300.0, 90.0, 60.0);
    shield.tick(moved, 16);
    assert_eq!(shield.rect().center(), moved.center());
}
