//! Validation of loaded tuning and sound data.

use std::collections::HashSet;

use super::data::SoundClipDef;
use crate::movement::MovementTuning;

/// A tuning value outside its usable range.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningIssue {
    pub field: &'static str,
    pub value: f32,
    pub expected: &'static str,
}

impl std::fmt::Display for TuningIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tuning field '{}' is {} but must be {}",
            self.field, self.value, self.expected
        )
    }
}

/// Helper macro for checking a tuning field against a predicate
macro_rules! check_field {
    ($issues:expr, $tuning:expr, $field:ident, $expected:expr, $ok:expr) => {
        let value = $tuning.$field;
        let ok: fn(f32) -> bool = $ok;
        if !value.is_finite() || !ok(value) {
            $issues.push(TuningIssue {
                field: stringify!($field),
                value,
                expected: $expected,
            });
        }
    };
}

/// Validate every numeric tuning field.
/// Returns a list of issues, empty if the tuning is usable.
pub fn validate_tuning(tuning: &MovementTuning) -> Vec<TuningIssue> {
    let mut issues = Vec::new();

    check_field!(issues, tuning, move_speed, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, jump_strength, "> 0", |v| v > 0.0);
    check_field!(issues, tuning, accel_smooth_time, "> 0", |v| v > 0.0);
    check_field!(issues, tuning, decel_smooth_time, "> 0", |v| v > 0.0);
    check_field!(issues, tuning, max_accel_rate, "> 0", |v| v > 0.0);
    check_field!(issues, tuning, anti_gravity_threshold, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, normal_gravity, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, reduced_gravity, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, jump_cut_factor, "in [0, 1]", |v| {
        (0.0..=1.0).contains(&v)
    });
    check_field!(issues, tuning, coyote_time, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, jump_buffer_time, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, landing_lock_time, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, ledge_check_distance, "> 0", |v| v > 0.0);
    check_field!(issues, tuning, foot_offset, ">= 0", |v| v >= 0.0);
    check_field!(issues, tuning, trail_distance, "> 0", |v| v > 0.0);
    check_field!(issues, tuning, move_epsilon, ">= 0", |v| v >= 0.0);

    issues
}

/// Problems with sound clip definitions, as display strings.
pub fn validate_sound_clips(clips: &[SoundClipDef]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut problems = Vec::new();

    for clip in clips {
        if !seen.insert(clip.id.as_str()) {
            problems.push(format!("Sound '{}' is defined more than once", clip.id));
        }
        if !clip.length.is_finite() || clip.length < 0.0 {
            problems.push(format!(
                "Sound '{}' has invalid length {}",
                clip.id, clip.length
            ));
        }
    }

    problems
}
