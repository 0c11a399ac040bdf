/// Result of advancing the player's auto-fire timer by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoFireStep {
    /// Shots released during the frame.
    pub shots: u32,
    /// Cooldown carried into the next frame.
    pub cooldown_ms: f64,
}

/// Advances the auto-fire cooldown by `dt_ms`, releasing one shot per
/// interval consumed.
///
/// The returned cooldown is always in `(0, interval_ms]` after a shot and is
/// never negative. Non-finite inputs and non-positive intervals fire nothing
/// and reset the cooldown to zero.
#[must_use]
pub fn step_auto_fire(cooldown_ms: f64, dt_ms: f64, interval_ms: f64) -> AutoFireStep {
    if !cooldown_ms.is_finite() || !dt_ms.is_finite() || !interval_ms.is_finite() || interval_ms <= 0.0 {
        return AutoFireStep {
            shots: 0,
            cooldown_ms: 0.0,
        };
    }

    let remaining = cooldown_ms.max(0.0) - dt_ms.max(0.0);
    if remaining > 0.0 {
        return AutoFireStep {
            shots: 0,
            cooldown_ms: remaining,
        };
    }

    let shots = (-remaining / interval_ms).floor() + 1.0;
    AutoFireStep {
        shots: shots.min(f64::from(u32::MAX)) as u32,
        cooldown_ms: remaining + shots * interval_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carried_cooldown_spaces_shots_by_interval() {
        let first = step_auto_fire(0.0, 90.0, 180.0);
        assert_eq!(first, AutoFireStep { shots: 1, cooldown_ms: 90.0 });

        let second = step_auto_fire(first.cooldown_ms, 90.0, 180.0);
        assert_eq!(second, AutoFireStep { shots: 1, cooldown_ms: 180.0 });

        let third = step_auto_fire(second.cooldown_ms, 90.0, 180.0);
        assert_eq!(third, AutoFireStep { shots: 0, cooldown_ms: 90.0 });
    }

    #[test]
    fn large_frames_release_several_shots() {
        let step = step_auto_fire(20.0, 400.0, 100.0);
        assert_eq!(step.shots, 5);
        assert_eq!(step.cooldown_ms, 120.0);
    }

    #[test]
    fn invalid_input_fires_nothing() {
        assert_eq!(step_auto_fire(0.0, f64::NAN, 180.0).shots, 0);
        assert_eq!(step_auto_fire(0.0, 90.0, 0.0).shots, 0);
        assert_eq!(step_auto_fire(f64::INFINITY, 90.0, 180.0).cooldown_ms, 0.0);
    }
}
