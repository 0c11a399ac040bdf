use serde::{Deserialize, Serialize};
use tracing::debug;
use triathlon_core::{Event, Genre};

use crate::pick_by_index;
use crate::spread::{next_spread_tier, reset_spread_tier, SpreadConfig};

/// Genres cycled by successive waves.
pub const GENRE_PATH: [Genre; 4] = [Genre::Pop, Genre::Edm, Genre::HipHop, Genre::Rock];

/// Formation layout and pacing of a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    /// Formation rows.
    pub rows: u32,
    /// Formation columns.
    pub cols: u32,
    /// Rows of armored enemies, counted from the back.
    pub armored_rows: u32,
    /// Rows of elite enemies, counted from the back.
    pub elite_rows: u32,
    /// Formation march speed multiplier.
    pub speed_scale: f32,
    /// Enemy fire cooldown multiplier; lower fires faster.
    pub fire_cadence_scale: f64,
}

impl WaveSpec {
    /// Total enemies in the formation.
    #[must_use]
    pub fn enemy_count(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }
}

/// Layout of the first wave on the default ladder.
const OPENING_WAVE: WaveSpec = WaveSpec {
    rows: 4,
    cols: 8,
    armored_rows: 0,
    elite_rows: 0,
    speed_scale: 1.0,
    fire_cadence_scale: 1.0,
};

/// Lookup table of wave layouts, cycled forever.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WaveSpec>", into = "Vec<WaveSpec>")]
pub struct WaveTable {
    entries: Vec<WaveSpec>,
}

impl Default for WaveTable {
    fn default() -> Self {
        Self {
            entries: vec![
                OPENING_WAVE,
                WaveSpec {
                    rows: 4,
                    cols: 9,
                    armored_rows: 1,
                    elite_rows: 0,
                    speed_scale: 1.08,
                    fire_cadence_scale: 0.92,
                },
                WaveSpec {
                    rows: 5,
                    cols: 9,
                    armored_rows: 1,
                    elite_rows: 1,
                    speed_scale: 1.16,
                    fire_cadence_scale: 0.85,
                },
                WaveSpec {
                    rows: 5,
                    cols: 10,
                    armored_rows: 2,
                    elite_rows: 1,
                    speed_scale: 1.25,
                    fire_cadence_scale: 0.78,
                },
            ],
        }
    }
}

impl WaveTable {
    /// Creates a table from explicit entries; an empty list falls back to the default table.
    #[must_use]
    pub fn new(entries: Vec<WaveSpec>) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        Self { entries }
    }

    /// Layout for `wave`, indexed by `(wave - 1) mod len`.
    #[must_use]
    pub fn spec_for_wave(&self, wave: u32) -> WaveSpec {
        let index = i64::from(wave.max(1)) - 1;
        pick_by_index(&self.entries, index).unwrap_or(OPENING_WAVE)
    }
}

impl From<Vec<WaveSpec>> for WaveTable {
    fn from(entries: Vec<WaveSpec>) -> Self {
        Self::new(entries)
    }
}

impl From<WaveTable> for Vec<WaveSpec> {
    fn from(table: WaveTable) -> Self {
        table.entries
    }
}

/// Genre played during `wave`.
#[must_use]
pub fn genre_for_wave(wave: u32) -> Genre {
    let index = i64::from(wave.max(1)) - 1;
    pick_by_index(&GENRE_PATH, index).unwrap_or(Genre::Pop)
}

/// Snapshot of the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDirectorState {
    /// Current wave, starting at 1.
    pub wave: u32,
    /// Genre of the current wave.
    pub genre: Genre,
    /// Current spread tier.
    pub spread_tier: u8,
    /// Wave at which the next spread upgrade lands, `None` once maxed.
    pub next_upgrade_wave: Option<u32>,
}

/// Tracks wave progression and the player's spread ladder.
#[derive(Clone, Debug)]
pub struct WaveDirectorV2 {
    spread: SpreadConfig,
    table: WaveTable,
    wave: u32,
    spread_tier: u8,
}

impl Default for WaveDirectorV2 {
    fn default() -> Self {
        Self::new(SpreadConfig::default(), WaveTable::default())
    }
}

impl WaveDirectorV2 {
    /// Creates a director positioned at wave 1.
    #[must_use]
    pub fn new(spread: SpreadConfig, table: WaveTable) -> Self {
        Self {
            spread_tier: reset_spread_tier(&spread),
            spread,
            table,
            wave: 1,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> WaveDirectorState {
        let next_upgrade_wave = if self.spread_tier < self.spread.reachable_max_tier() {
            Some(self.wave + 1)
        } else {
            None
        };
        WaveDirectorState {
            wave: self.wave,
            genre: genre_for_wave(self.wave),
            spread_tier: self.spread_tier,
            next_upgrade_wave,
        }
    }

    /// Layout of the current wave.
    #[must_use]
    pub fn wave_spec(&self) -> WaveSpec {
        self.table.spec_for_wave(self.wave)
    }

    /// Table backing the director.
    #[must_use]
    pub fn table(&self) -> &WaveTable {
        &self.table
    }

    /// Moves to the next wave and upgrades the spread tier by one step.
    pub fn advance_on_wave_clear(&mut self, out: &mut Vec<Event>) {
        let cleared = self.wave;
        self.wave = self.wave.saturating_add(1);
        let genre = genre_for_wave(self.wave);
        debug!(cleared, next = self.wave, genre = genre.as_str(), "wave cleared");
        out.push(Event::WaveCleared {
            wave: cleared,
            next_wave: self.wave,
            genre,
        });

        let upgraded = next_spread_tier(self.spread_tier, &self.spread);
        if upgraded != self.spread_tier {
            self.spread_tier = upgraded;
            debug!(tier = upgraded, "spread tier upgraded");
            out.push(Event::SpreadTierUpgraded { tier: upgraded });
        }
    }

    /// Returns to wave 1 with the base spread tier.
    pub fn reset_on_retry(&mut self) {
        self.wave = 1;
        self.spread_tier = reset_spread_tier(&self.spread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_cycles_with_period_four() {
        let expected = [Genre::Pop, Genre::Edm, Genre::HipHop, Genre::Rock];
        for wave in 1..=24 {
            assert_eq!(genre_for_wave(wave), expected[((wave - 1) % 4) as usize]);
        }
        assert_eq!(genre_for_wave(0), Genre::Pop);
    }

    #[test]
    fn wave_spec_cycles_with_table_length() {
        let table = WaveTable::default();
        for wave in 1..=12 {
            assert_eq!(table.spec_for_wave(wave), table.spec_for_wave(wave + 4));
        }
        assert_eq!(table.spec_for_wave(3).elite_rows, 1);
    }

    #[test]
    fn empty_table_falls_back_to_default() {
        assert_eq!(WaveTable::new(Vec::new()), WaveTable::default());
    }

    #[test]
    fn lookup_without_entries_yields_the_opening_wave() {
        let table = WaveTable {
            entries: Vec::new(),
        };
        assert_eq!(table.spec_for_wave(0), OPENING_WAVE);
        assert_eq!(table.spec_for_wave(7), OPENING_WAVE);
        assert_eq!(WaveTable::default().spec_for_wave(1), OPENING_WAVE);
    }
}
