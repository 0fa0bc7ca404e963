/// Upgrade economy: bounded levels bought with score.
///
/// Every upgradable stat owns one `UpgradeLevel`; a single generic routine
/// (`purchase`) prices and applies upgrades for all of them.

use log::debug;
use thiserror::Error;

/// Score per step of the cost ladder.
const COST_STEP: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpgradeStat {
    /// Player missiles per second.
    FireRate,
    /// Reduces the shield's energy drain.
    ShieldEfficiency,
}

impl UpgradeStat {
    pub const ALL: [UpgradeStat; 2] = [UpgradeStat::FireRate, UpgradeStat::ShieldEfficiency];

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeStat::FireRate => "Fire rate",
            UpgradeStat::ShieldEfficiency => "Shield",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("already at max level {level}")]
    MaxLevel { level: u32 },
    #[error("upgrade costs {cost} but score is {score}")]
    InsufficientScore { cost: u32, score: u32 },
}

/// A level bounded to `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeLevel {
    pub current: u32,
    pub min: u32,
    pub max: u32,
}

impl UpgradeLevel {
    pub fn new(min: u32, max: u32) -> Self {
        UpgradeLevel { current: min, min, max }
    }

    /// Start at `current`, clamped into the bounds.
    pub fn at(current: u32, min: u32, max: u32) -> Self {
        UpgradeLevel { current: current.clamp(min, max), min, max }
    }

    /// Price of the next step when sitting at `level`.
    pub fn cost_at(&self, level: u32) -> u32 {
        COST_STEP * (level.saturating_sub(self.min) + 1)
    }

    pub fn cost(&self) -> u32 {
        self.cost_at(self.current)
    }

    pub fn is_maxed(&self) -> bool {
        self.current >= self.max
    }

    /// Fraction of the ladder climbed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.max <= self.min {
            return 1.0;
        }
        (self.current - self.min) as f32 / (self.max - self.min) as f32
    }

    pub fn status(&self) -> UpgradeStatus {
        UpgradeStatus {
            level: self.current,
            cost_label: if self.is_maxed() {
                "Max Level".to_string()
            } else {
                format!("Cost: {}", self.cost())
            },
            progress: self.progress(),
        }
    }
}

/// What the upgrade panel shows for one stat.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeStatus {
    pub level: u32,
    pub cost_label: String,
    pub progress: f32,
}

/// Buy one level of `track` with `score`.  On success the cost is deducted
/// and the new level returned; on rejection nothing changes.
pub fn purchase(track: &mut UpgradeLevel, score: &mut u32) -> Result<u32, UpgradeError> {
    if track.is_maxed() {
        return Err(UpgradeError::MaxLevel { level: track.current });
    }
    let cost = track.cost();
    if *score < cost {
        return Err(UpgradeError::InsufficientScore { cost, score: *score });
    }
    *score -= cost;
    track.current += 1;
    debug!("upgrade bought for {}: level {}", cost, track.current);
    Ok(track.current)
}
