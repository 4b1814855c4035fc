//! Movement domain: tuning resource.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal speed at full input, units per second.
    pub move_speed: f32,
    /// Upward velocity change applied by a jump.
    pub jump_strength: f32,
    /// Smoothing time while input asks for movement.
    pub accel_smooth_time: f32,
    /// Smoothing time while input is released.
    pub decel_smooth_time: f32,
    /// Cap on horizontal velocity change per second.
    pub max_accel_rate: f32,
    /// |vy| at or below which an airborne body is at the apex.
    pub anti_gravity_threshold: f32,
    pub normal_gravity: f32,
    /// Gravity scale while rising with jump held.
    pub reduced_gravity: f32,
    /// Fraction of upward velocity kept when jump is released early.
    pub jump_cut_factor: f32,
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
    pub landing_lock_enabled: bool,
    pub landing_lock_time: f32,
    /// Length of the downward foot probes used for ledge detection.
    pub ledge_check_distance: f32,
    /// Inset of the foot probes from the collider edges.
    pub foot_offset: f32,
    /// Distance travelled on the ground between trail effects.
    pub trail_distance: f32,
    /// Inputs and speeds below this are treated as zero.
    pub move_epsilon: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            jump_strength: 9.0,
            accel_smooth_time: 0.06,
            decel_smooth_time: 0.04,
            max_accel_rate: 200.0,
            anti_gravity_threshold: 0.15,
            normal_gravity: 1.0,
            reduced_gravity: 0.8,
            jump_cut_factor: 0.5,
            coyote_time: 0.2,
            jump_buffer_time: 0.1,
            landing_lock_enabled: true,
            landing_lock_time: 0.08,
            ledge_check_distance: 0.2,
            foot_offset: 0.01,
            trail_distance: 1.0,
            move_epsilon: 0.01,
        }
    }
}

impl MovementTuning {
    /// Peak height of a held jump under `world_gravity` (units/s², positive).
    /// Uses h = v² / (2g) with the reduced ascending gravity.
    pub fn held_jump_height(&self, world_gravity: f32) -> f32 {
        let g = world_gravity * self.reduced_gravity;
        if g <= 0.0 {
            return f32::INFINITY;
        }
        self.jump_strength * self.jump_strength / (2.0 * g)
    }
}
