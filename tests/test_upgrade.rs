use approx::assert_relative_eq;
use space_ship_game::upgrade::*;

fn fire_rate() -> UpgradeLevel {
    UpgradeLevel::new(3, 13)
}

#[test]
fn cost_never_decreases_with_level() {
    let track = fire_rate();
    let costs: Vec<u32> = (track.min..track.max).map(|level| track.cost_at(level)).collect();
    assert_eq!(costs.first(), Some(&10));
    assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn purchase_deducts_cost_and_raises_level() {
    let mut track = fire_rate();
    let mut score = 25;
    assert_eq!(purchase(&mut track, &mut score), Ok(4));
    assert_eq!(score, 15);
    assert_eq!(track.cost(), 20);
}

#[test]
fn purchase_rejected_when_score_is_short() {
    let mut track = fire_rate();
    let mut score = 9;
    assert_eq!(
        purchase(&mut track, &mut score),
        Err(UpgradeError::InsufficientScore { cost: 10, score: 9 })
    );
    assert_eq!(score, 9);
    assert_eq!(track, fire_rate());
}

#[test]
fn purchase_rejected_at_max_level() {
    let mut track = UpgradeLevel::at(13, 3, 13);
    let mut score = 1_000;
    assert_eq!(purchase(&mut track, &mut score), Err(UpgradeError::MaxLevel { level: 13 }));
    assert_eq!(score, 1_000);
    assert_eq!(track.current, 13);
}

#[test]
fn climbing_the_whole_ladder() {
    let mut track = fire_rate();
    let mut score = 10_000;
    while purchase(&mut track, &mut score).is_ok() {}
    assert!(track.is_maxed());
    // 10 + 20 + ... + 100
    assert_eq!(score, 10_000 - 550);
}

#[test]
fn level_is_clamped_into_bounds() {
    assert_eq!(UpgradeLevel::at(0, 1, 11).current, 1);
    assert_eq!(UpgradeLevel::at(99, 1, 11).current, 11);
}

#[test]
fn status_shows_cost_until_maxed() {
    let track = UpgradeLevel::at(6, 1, 11);
    let status = track.status();
    assert_eq!(status.level, 6);
    assert_eq!(status.cost_label, "Cost: 60");
    assert_relative_eq!(status.progress, 0.5);

    let maxed = UpgradeLevel::at(11, 1, 11).status();
    assert_eq!(maxed.cost_label, "Max Level");
    assert_relative_eq!(maxed.progress, 1.0);
}
