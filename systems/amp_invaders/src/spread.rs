use serde::{Deserialize, Serialize};

/// Highest spread tier on the default ladder.
pub const MAX_SPREAD_TIER: u8 = 4;

const SPREAD_LADDER: [&[f32]; MAX_SPREAD_TIER as usize] = [
    &[0.0],
    &[-150.0, 150.0],
    &[-170.0, 0.0, 170.0],
    &[-220.0, -80.0, 80.0, 220.0],
];

/// Bounds of the spread ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Tier granted at the start of a life.
    pub base_tier: u8,
    /// Highest reachable tier.
    pub max_tier: u8,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            base_tier: 1,
            max_tier: MAX_SPREAD_TIER,
        }
    }
}

impl SpreadConfig {
    /// Highest tier the ladder can actually reach.
    pub(crate) fn reachable_max_tier(&self) -> u8 {
        self.max_tier.clamp(1, MAX_SPREAD_TIER)
    }

    fn clamp_tier(&self, tier: u8) -> u8 {
        tier.clamp(1, self.reachable_max_tier())
    }
}

/// Tier after one upgrade, capped at the configured maximum.
#[must_use]
pub fn next_spread_tier(tier: u8, config: &SpreadConfig) -> u8 {
    config.clamp_tier(tier.saturating_add(1))
}

/// Tier a retry starts from.
#[must_use]
pub fn reset_spread_tier(config: &SpreadConfig) -> u8 {
    config.clamp_tier(config.base_tier)
}

/// Horizontal velocity offsets of each shot in a volley at `tier`.
#[must_use]
pub fn spread_offsets(tier: u8) -> &'static [f32] {
    let index = usize::from(tier.clamp(1, MAX_SPREAD_TIER) - 1);
    SPREAD_LADDER[index]
}
