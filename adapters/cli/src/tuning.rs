use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use triathlon_system_amp_invaders::{
    BossConfig, CollisionConfig, FireDirectorConfig, SpecialsConfig, SpreadConfig, WaveTable,
};
use triathlon_system_moshpit::{MusicConfig, PacingConfig, ZoneConfig};
use triathlon_system_snake_audio::AudioDirectorConfig;

/// Director tuning loaded from a TOML file. Missing sections keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Tuning {
    pub(crate) waves: WaveTable,
    pub(crate) spread: SpreadConfig,
    pub(crate) fire: FireDirectorConfig,
    pub(crate) specials: SpecialsConfig,
    pub(crate) boss: BossConfig,
    pub(crate) collision: CollisionConfig,
    pub(crate) zones: ZoneConfig,
    pub(crate) pacing: PacingConfig,
    pub(crate) music: MusicConfig,
    pub(crate) audio: AudioDirectorConfig,
}

impl Tuning {
    /// Reads and parses a tuning file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse tuning file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use triathlon_system_amp_invaders::AttackSelection;

    #[test]
    fn empty_file_keeps_every_default() {
        assert_eq!(Tuning::parse("").expect("parse"), Tuning::default());
    }

    #[test]
    fn sections_override_individual_fields() {
        let tuning = Tuning::parse(
            r#"
            [boss]
            max_hp = 600
            selection = "Fixed"

            [pacing]
            max_active_moshers = 2

            [[waves]]
            rows = 3
            cols = 6
            armored_rows = 0
            elite_rows = 0
            speed_scale = 0.9
            fire_cadence_scale = 1.1
            "#,
        )
        .expect("parse");

        assert_eq!(tuning.boss.max_hp, 600);
        assert_eq!(tuning.boss.selection, AttackSelection::Fixed);
        assert_eq!(tuning.boss.phase_two_threshold, 0.7);
        assert_eq!(tuning.pacing.max_active_moshers, 2);
        assert_eq!(tuning.waves.spec_for_wave(5).enemy_count(), 18);
        assert_eq!(tuning.fire, FireDirectorConfig::default());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Tuning::parse("[lasers]\nspeed = 3").is_err());
    }
}
