use serde::{Deserialize, Serialize};
use tracing::debug;
use triathlon_core::{Event, Stage};

use crate::music::MilestoneTracker;

const ZONE_BONUS_BASE: f64 = 26.0;
const ZONE_BONUS_PER_TILE: f64 = 1.08;

/// Bonus multipliers by number of earlier completions of the same zone.
pub const ZONE_BONUS_DECAY: [f64; 4] = [1.0, 0.72, 0.56, 0.45];

/// Smallest bonus a completion can pay.
pub const ZONE_BONUS_FLOOR: f64 = 24.0;

/// Bonus for completing a zone of `tile_count` tiles that was already
/// completed `prior_completions` times.
#[must_use]
pub fn compute_zone_completion_bonus(tile_count: u32, prior_completions: u32) -> u32 {
    let base = ZONE_BONUS_BASE + f64::from(tile_count) * ZONE_BONUS_PER_TILE;
    let index = usize::try_from(prior_completions)
        .unwrap_or(usize::MAX)
        .min(ZONE_BONUS_DECAY.len() - 1);
    (base * ZONE_BONUS_DECAY[index]).max(ZONE_BONUS_FLOOR).round() as u32
}

/// Zone tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Delay between completing a zone and its tiles coming back.
    pub respawn_delay_ms: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            respawn_delay_ms: 8_000.0,
        }
    }
}

/// Lifecycle of a zone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZoneStatus {
    /// Tiles can be collected.
    Active,
    /// Fully collected; refills at `respawn_at_ms`.
    Cleared {
        /// Stage time at which the zone refills.
        respawn_at_ms: f64,
    },
}

/// Read-only view of a zone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    /// Tiles in the zone.
    pub tile_count: u32,
    /// Tiles collected since the last refill.
    pub collected: u32,
    /// Times the zone was completed.
    pub completions: u32,
    /// Lifecycle state.
    pub status: ZoneStatus,
}

impl ZoneSnapshot {
    fn fresh(tile_count: u32) -> Self {
        Self {
            tile_count,
            collected: 0,
            completions: 0,
            status: ZoneStatus::Active,
        }
    }

    /// Collected share of the zone in `[0, 1]`, `0.0` for an empty zone.
    #[must_use]
    pub fn completion_fraction(&self) -> f64 {
        if self.tile_count == 0 {
            return 0.0;
        }
        (f64::from(self.collected) / f64::from(self.tile_count)).min(1.0)
    }
}

/// Tracks collection, completion and respawn of every zone in the maze.
#[derive(Clone, Debug)]
pub struct ZoneTracker {
    config: ZoneConfig,
    zones: Vec<ZoneSnapshot>,
    milestones: MilestoneTracker,
}

impl ZoneTracker {
    /// Creates a tracker with one zone per entry of `tile_counts`.
    #[must_use]
    pub fn new(tile_counts: &[u32], config: ZoneConfig) -> Self {
        Self {
            config,
            zones: tile_counts.iter().copied().map(ZoneSnapshot::fresh).collect(),
            milestones: MilestoneTracker::new(tile_counts.len()),
        }
    }

    /// Every zone in id order.
    #[must_use]
    pub fn zones(&self) -> &[ZoneSnapshot] {
        &self.zones
    }

    /// Snapshot of one zone.
    #[must_use]
    pub fn zone(&self, zone: u32) -> Option<ZoneSnapshot> {
        self.zones.get(usize::try_from(zone).ok()?).copied()
    }

    /// Completions summed over all zones.
    #[must_use]
    pub fn total_completions(&self) -> u32 {
        self.zones
            .iter()
            .fold(0_u32, |total, zone| total.saturating_add(zone.completions))
    }

    /// Whether every zone was completed at least once.
    #[must_use]
    pub fn all_zones_completed(&self) -> bool {
        !self.zones.is_empty() && self.zones.iter().all(|zone| zone.completions > 0)
    }

    /// Mean completion fraction over all zones, `0.0` without zones.
    #[must_use]
    pub fn average_completion(&self) -> f64 {
        if self.zones.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.zones.iter().map(ZoneSnapshot::completion_fraction).sum();
        sum / self.zones.len() as f64
    }

    /// Collects one tile from `zone` at stage time `now_ms`.
    ///
    /// Returns the completion bonus when this tile finished the zone. Tiles
    /// of unknown or cleared zones are ignored.
    pub fn collect(&mut self, zone: u32, now_ms: f64, out: &mut Vec<Event>) -> Option<u32> {
        let respawn_delay_ms = self.config.respawn_delay_ms.max(0.0);
        let entry = self.zones.get_mut(usize::try_from(zone).ok()?)?;
        if entry.status != ZoneStatus::Active || entry.collected >= entry.tile_count {
            return None;
        }

        entry.collected += 1;
        if entry.collected < entry.tile_count {
            return None;
        }

        let bonus = compute_zone_completion_bonus(entry.tile_count, entry.completions);
        entry.completions = entry.completions.saturating_add(1);
        entry.status = ZoneStatus::Cleared {
            respawn_at_ms: now_ms + respawn_delay_ms,
        };
        debug!(zone, completions = entry.completions, bonus, "zone completed");
        out.push(Event::ZoneCompleted {
            zone,
            completions: entry.completions,
            bonus,
        });
        out.push(Event::ScoreAwarded {
            stage: Stage::Moshpit,
            points: bonus,
        });
        Some(bonus)
    }

    /// Fires milestone stingers for progress made since the previous update,
    /// then refills cleared zones whose timer elapsed.
    ///
    /// Returns the number of stingers fired during this call.
    pub fn update(&mut self, now_ms: f64, out: &mut Vec<Event>) -> u32 {
        let fractions: Vec<f64> = self.zones.iter().map(ZoneSnapshot::completion_fraction).collect();
        let stingers = self.milestones.observe(&fractions, out);

        for (index, entry) in self.zones.iter_mut().enumerate() {
            let ZoneStatus::Cleared { respawn_at_ms } = entry.status else {
                continue;
            };
            if now_ms < respawn_at_ms {
                continue;
            }
            entry.collected = 0;
            entry.status = ZoneStatus::Active;
            self.milestones.rewind(index);
            let zone = u32::try_from(index).unwrap_or(u32::MAX);
            debug!(zone, "zone respawned");
            out.push(Event::ZoneRespawned { zone });
        }

        stingers
    }

    /// Restores every zone to its untouched state for a stage retry.
    pub fn reset(&mut self) {
        for entry in &mut self.zones {
            *entry = ZoneSnapshot::fresh(entry.tile_count);
        }
        self.milestones = MilestoneTracker::new(self.zones.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bonus_decays_with_repeat_completions() {
        let bonuses: Vec<u32> = (0..5).map(|prior| compute_zone_completion_bonus(40, prior)).collect();
        assert_eq!(bonuses, vec![69, 50, 39, 31, 31]);
    }

    #[test]
    fn bonus_never_drops_below_floor() {
        assert_eq!(compute_zone_completion_bonus(0, 0), 26);
        assert_eq!(compute_zone_completion_bonus(0, 1), 24);
        assert_eq!(compute_zone_completion_bonus(0, 9), 24);
    }

    #[test]
    fn completing_a_zone_pays_once_and_blocks_collection() {
        let mut tracker = ZoneTracker::new(&[2, 3], ZoneConfig::default());
        let mut events = Vec::new();

        assert_eq!(tracker.collect(0, 100.0, &mut events), None);
        assert_eq!(tracker.collect(0, 200.0, &mut events), Some(28));
        assert_eq!(tracker.collect(0, 300.0, &mut events), None);
        assert_eq!(tracker.collect(7, 300.0, &mut events), None);

        let zone = tracker.zone(0).expect("zone 0");
        assert_eq!(zone.completions, 1);
        assert_eq!(
            zone.status,
            ZoneStatus::Cleared {
                respawn_at_ms: 8_200.0
            }
        );
        assert!(events.contains(&Event::ZoneCompleted {
            zone: 0,
            completions: 1,
            bonus: 28,
        }));
        assert!(!tracker.all_zones_completed());
    }

    #[test]
    fn cleared_zone_refills_after_delay() {
        let mut tracker = ZoneTracker::new(&[1], ZoneConfig::default());
        let mut events = Vec::new();

        let _ = tracker.collect(0, 1_000.0, &mut events);
        let _ = tracker.update(8_999.0, &mut events);
        assert_eq!(tracker.zone(0).map(|zone| zone.collected), Some(1));

        let _ = tracker.update(9_000.0, &mut events);
        let zone = tracker.zone(0).expect("zone 0");
        assert_eq!(zone.collected, 0);
        assert_eq!(zone.status, ZoneStatus::Active);
        assert_eq!(events.last(), Some(&Event::ZoneRespawned { zone: 0 }));

        assert_eq!(tracker.collect(0, 9_100.0, &mut events), Some(24));
        assert!(tracker.all_zones_completed());
    }

    #[test]
    fn reset_clears_completions() {
        let mut tracker = ZoneTracker::new(&[1, 1], ZoneConfig::default());
        let mut events = Vec::new();
        let _ = tracker.collect(1, 0.0, &mut events);
        assert_eq!(tracker.total_completions(), 1);

        tracker.reset();
        assert_eq!(tracker.total_completions(), 0);
        assert_eq!(tracker.average_completion(), 0.0);
    }
}
