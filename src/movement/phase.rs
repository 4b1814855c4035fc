//! Movement domain: jump phase classification and per-phase gravity.

use serde::{Deserialize, Serialize};

use crate::movement::MovementTuning;

/// Vertical speed at or below which a grounded body counts as resting.
const GROUNDED_MAX_VY: f32 = 0.01;
/// Vertical speed above which the body is rising.
const ASCENDING_MIN_VY: f32 = 0.1;
/// Vertical speed at or below which the body is falling.
const FALLING_MAX_VY: f32 = -0.1;

const ASCENDING_RELEASED_GRAVITY: f32 = 1.2;
const FALLING_GRAVITY: f32 = 1.8;
const APEX_GRAVITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    #[default]
    Grounded,
    Ascending,
    Apex,
    Falling,
}

impl JumpPhase {
    /// Next phase from the grounded flag and vertical velocity.
    ///
    /// When no band matches (airborne with `vy` between the apex threshold and
    /// the ascend/fall cutoffs) the current phase is kept.
    pub fn classify(self, grounded: bool, vy: f32, anti_gravity_threshold: f32) -> JumpPhase {
        if grounded && vy <= GROUNDED_MAX_VY {
            JumpPhase::Grounded
        } else if vy > ASCENDING_MIN_VY {
            JumpPhase::Ascending
        } else if vy.abs() <= anti_gravity_threshold {
            JumpPhase::Apex
        } else if vy <= FALLING_MAX_VY {
            JumpPhase::Falling
        } else {
            self
        }
    }

    /// Gravity scale the body should use while in this phase.
    pub fn gravity_scale(self, jump_held: bool, tuning: &MovementTuning) -> f32 {
        match self {
            JumpPhase::Grounded => tuning.normal_gravity,
            JumpPhase::Ascending if jump_held => tuning.reduced_gravity,
            JumpPhase::Ascending => tuning.normal_gravity * ASCENDING_RELEASED_GRAVITY,
            JumpPhase::Falling => tuning.normal_gravity * FALLING_GRAVITY,
            JumpPhase::Apex => tuning.normal_gravity * APEX_GRAVITY,
        }
    }
}
