//! Platforms domain: moving and pass-through platform components.

use bevy::prelude::*;

use crate::movement::{Countdown, smooth_damp};

/// Seconds a pass-through platform stays open after a drop request.
pub const DROP_THROUGH_TIME: f32 = 0.5;

/// Progress curve between the two waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Slow at both ends, zero slope at the waypoints.
    #[default]
    EaseInOut,
}

impl Easing {
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Bounce `t` back and forth between 0 and `length`.
pub fn ping_pong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let wrapped = t.rem_euclid(length * 2.0);
    length - (wrapped - length).abs()
}

/// Kinematic platform travelling back and forth between two waypoints.
#[derive(Component, Debug, Clone)]
pub struct MovingPlatform {
    pub point_a: Vec2,
    pub point_b: Vec2,
    /// Seconds from A to B at speed factor 1.
    pub seconds_a_to_b: f32,
    /// Designer-facing speed multiplier; 0 stops the platform.
    pub speed_factor: f32,
    /// How quickly the applied speed follows `speed_factor`.
    pub speed_factor_smooth_time: f32,
    pub easing: Easing,
    speed_factor_current: f32,
    speed_factor_rate: f32,
    phase: f32,
    velocity: Vec2,
}

impl MovingPlatform {
    pub fn new(point_a: Vec2, point_b: Vec2, seconds_a_to_b: f32) -> Self {
        Self {
            point_a,
            point_b,
            seconds_a_to_b,
            speed_factor: 1.0,
            speed_factor_smooth_time: 0.25,
            easing: Easing::default(),
            speed_factor_current: 1.0,
            speed_factor_rate: 0.0,
            phase: 0.0,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Start at `factor` without smoothing in.
    pub fn with_speed_factor(mut self, factor: f32) -> Self {
        self.speed_factor = factor.max(0.0);
        self.speed_factor_current = self.speed_factor;
        self
    }

    /// Change speed at runtime; the platform eases into it.
    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = factor;
    }

    pub fn applied_speed_factor(&self) -> f32 {
        self.speed_factor_current
    }

    /// Displacement per second over the last tick.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Advance one tick from `current`. Returns where the platform should be
    /// after the tick, or `None` if it cannot move.
    pub fn advance(&mut self, current: Vec2, dt: f32) -> Option<Vec2> {
        if self.seconds_a_to_b <= 0.0 || dt <= 0.0 {
            self.velocity = Vec2::ZERO;
            return None;
        }

        let target = self.speed_factor.max(0.0);
        self.speed_factor_current = smooth_damp(
            self.speed_factor_current,
            target,
            &mut self.speed_factor_rate,
            self.speed_factor_smooth_time,
            f32::INFINITY,
            dt,
        );

        self.phase += dt * (self.speed_factor_current / self.seconds_a_to_b);
        let t = self.easing.evaluate(ping_pong(self.phase, 1.0));
        let next = self.point_a.lerp(self.point_b, t);

        self.velocity = (next - current) / dt;
        Some(next)
    }
}

/// Extra collider belonging to a moving platform (e.g. a child surface).
#[derive(Component, Debug, Clone, Copy)]
pub struct PlatformCollider {
    pub platform: Entity,
}

/// Semi-solid platform a character can drop through.
#[derive(Component, Debug, Default)]
pub struct PassThroughPlatform {
    reopen: Countdown,
}

impl PassThroughPlatform {
    /// True while the collider is disabled for a drop.
    pub fn is_open(&self) -> bool {
        self.reopen.is_active()
    }

    pub fn open(&mut self, seconds: f32) {
        self.reopen.start(seconds);
    }

    /// Returns true on the tick the platform becomes solid again.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.reopen.tick(dt)
    }
}
