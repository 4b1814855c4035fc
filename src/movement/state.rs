//! Movement domain: per-character movement state and the ordered fixed tick.
//!
//! Everything that changes a character's velocity happens inside
//! [`MovementState::fixed_tick`], in this order:
//!
//! 1. timers started on earlier ticks advance (coyote, jump buffer, landing lock)
//! 2. queued commands apply
//! 3. ground edges apply
//! 4. a buffered jump fires if allowed
//! 5. jump phase and gravity scale update
//! 6. horizontal velocity is smoothed toward its target

use bevy::prelude::*;

use crate::feedback::Feedback;
use crate::movement::smoothing::smooth_damp;
use crate::movement::timers::Countdown;
use crate::movement::{GroundEdge, JumpPhase, LedgeSide, MovementCommand, MovementTuning};

pub const TRAIL_EFFECT: &str = "dust_trail";
pub const LAND_EFFECT: &str = "land_dust";
pub const JUMP_EFFECT: &str = "jump_dust";
pub const JUMP_SOUND: &str = "jump";
pub const LAND_SOUND: &str = "land";
pub const FOOTSTEP_SOUND: &str = "footstep";

/// Observable outcome of a tick, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEvent {
    JumpStarted,
    JumpEnded,
    Landed,
    MoveStarted,
    /// Drop through the semi-solid collider the character stands on.
    DropThrough(Entity),
}

/// Rigid-body quantities the movement core reads and writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub velocity: Vec2,
    pub gravity_scale: f32,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
        }
    }
}

/// Environment sampled for the character before its tick runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickContext {
    pub dt: f32,
    pub position: Vec2,
    /// Velocity of the moving platform under the character, zero if none.
    pub platform_velocity: Vec2,
    pub ledge: LedgeSide,
    pub contact_collider: Option<Entity>,
}

#[derive(Component, Debug, Default)]
pub struct MovementState {
    pub horizontal_input: f32,
    pub jump_held: bool,
    pub crouching: bool,
    pub grounded: bool,
    pub jump_phase: JumpPhase,
    pub coyote: Countdown,
    pub jump_buffer: Countdown,
    pub landing_lock: Countdown,
    pub smoothed_velocity_x: f32,
    pub last_trail_position: Vec2,
    pub current_platform_velocity: Vec2,
    /// Derivative carried by the horizontal smoothing filter.
    smooth_rate: f32,
    /// Set by a jump and cleared on landing. Leaving the ground because of a
    /// jump must not open a coyote window.
    jump_committed: bool,
    enabled: bool,
}

impl MovementState {
    /// Start accepting ticks. Returns false if already enabled.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        true
    }

    /// Stop accepting ticks and drop every in-flight timer.
    pub fn disable(&mut self) {
        self.halt();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cancel timers and held input without touching the enabled flag.
    pub fn halt(&mut self) {
        self.coyote.cancel();
        self.jump_buffer.cancel();
        self.landing_lock.cancel();
        self.smooth_rate = 0.0;
        self.horizontal_input = 0.0;
        self.jump_held = false;
        self.crouching = false;
    }

    pub fn smooth_rate(&self) -> f32 {
        self.smooth_rate
    }

    /// Whether a jump would be accepted right now.
    pub fn can_jump(&self) -> bool {
        (self.grounded && !self.jump_committed) || self.coyote.is_active()
    }

    /// Run one fixed tick. Returns the events raised, in order.
    pub fn fixed_tick(
        &mut self,
        tuning: &MovementTuning,
        commands: &[MovementCommand],
        edges: &[GroundEdge],
        ctx: &TickContext,
        body: &mut BodyState,
        feedback: &mut impl Feedback,
    ) -> Vec<MovementEvent> {
        let mut events = Vec::new();
        if !self.enabled {
            return events;
        }

        self.coyote.tick(ctx.dt);
        if self.jump_buffer.tick(ctx.dt) {
            debug!("Jump buffer expired without a jump");
        }
        self.landing_lock.tick(ctx.dt);

        for command in commands {
            self.apply_command(*command, tuning, ctx, body, &mut events);
        }

        for edge in edges {
            self.apply_ground_edge(*edge, tuning, ctx, body, feedback, &mut events);
        }

        if self.jump_buffer.is_active() && self.can_jump() {
            self.jump_buffer.cancel();
            self.jump(tuning, ctx, body, feedback, &mut events);
        }

        self.jump_phase =
            self.jump_phase
                .classify(self.grounded, body.velocity.y, tuning.anti_gravity_threshold);
        if self.jump_phase == JumpPhase::Grounded {
            self.jump_committed = false;
        }
        body.gravity_scale = self.jump_phase.gravity_scale(self.jump_held, tuning);

        self.step_horizontal(tuning, ctx, body, feedback);

        events
    }

    /// Replace vertical momentum with the jump impulse.
    pub fn jump(
        &mut self,
        tuning: &MovementTuning,
        ctx: &TickContext,
        body: &mut BodyState,
        feedback: &mut impl Feedback,
        events: &mut Vec<MovementEvent>,
    ) {
        // Unit-mass impulse: the old vertical velocity is discarded first
        body.velocity.y = 0.0;
        body.velocity.y += tuning.jump_strength;
        self.coyote.cancel();
        self.jump_committed = true;

        feedback.play_effect(JUMP_EFFECT, ctx.position, 0.0, 1.0);
        feedback.play_sound(JUMP_SOUND);
        events.push(MovementEvent::JumpStarted);
        debug!("Jump: grounded={}, vy={}", self.grounded, body.velocity.y);
    }

    fn apply_command(
        &mut self,
        command: MovementCommand,
        tuning: &MovementTuning,
        ctx: &TickContext,
        body: &mut BodyState,
        events: &mut Vec<MovementEvent>,
    ) {
        match command {
            MovementCommand::MoveAxis(axis) => {
                let axis = if axis.is_finite() {
                    axis.clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                let was_idle = self.horizontal_input.abs() <= tuning.move_epsilon;
                self.horizontal_input = axis;
                if was_idle && axis.abs() > tuning.move_epsilon {
                    events.push(MovementEvent::MoveStarted);
                }
            }
            MovementCommand::JumpPressed => {
                self.jump_held = true;
                self.jump_buffer.start(tuning.jump_buffer_time);
            }
            MovementCommand::JumpReleased => {
                self.jump_held = false;
                if body.velocity.y > 0.0 {
                    body.velocity.y *= tuning.jump_cut_factor;
                    events.push(MovementEvent::JumpEnded);
                }
            }
            MovementCommand::CrouchHeld(held) => {
                self.crouching = held;
            }
            MovementCommand::DropThroughRequested => {
                if !self.grounded {
                    return;
                }
                if let Some(collider) = ctx.contact_collider {
                    events.push(MovementEvent::DropThrough(collider));
                }
            }
        }
    }

    fn apply_ground_edge(
        &mut self,
        edge: GroundEdge,
        tuning: &MovementTuning,
        ctx: &TickContext,
        body: &mut BodyState,
        feedback: &mut impl Feedback,
        events: &mut Vec<MovementEvent>,
    ) {
        match edge {
            GroundEdge::Grounded => {
                self.grounded = true;
                self.coyote.cancel();
                self.jump_committed = false;

                if tuning.landing_lock_enabled && tuning.landing_lock_time > 0.0 {
                    self.smooth_rate = 0.0;
                    body.velocity.x = 0.0;
                    self.landing_lock.start(tuning.landing_lock_time);
                }

                self.last_trail_position = ctx.position;
                feedback.play_effect(LAND_EFFECT, ctx.position, 0.0, 1.0);
                feedback.play_sound(LAND_SOUND);
                events.push(MovementEvent::Landed);
                debug!("Landed at ({:.2}, {:.2})", ctx.position.x, ctx.position.y);
            }
            GroundEdge::LeftGround => {
                self.grounded = false;
                if !self.jump_committed {
                    self.coyote.start(tuning.coyote_time);
                }
                debug!("Left ground: coyote_active={}", self.coyote.is_active());
            }
        }
    }

    fn step_horizontal(
        &mut self,
        tuning: &MovementTuning,
        ctx: &TickContext,
        body: &mut BodyState,
        feedback: &mut impl Feedback,
    ) {
        self.current_platform_velocity = if self.grounded {
            ctx.platform_velocity
        } else {
            Vec2::ZERO
        };
        let carry = self.current_platform_velocity.x;
        let locked = self.landing_lock.is_active();

        let mut input = if locked { 0.0 } else { self.horizontal_input };
        let at_ledge = self.grounded && self.crouching && ctx.ledge != LedgeSide::None;
        if at_ledge && ctx.ledge.blocks(input) {
            input = 0.0;
        }

        let local_target = input * tuning.move_speed;
        let world_target = local_target + carry;

        if locked {
            self.smooth_rate = 0.0;
            body.velocity.x = world_target;
        } else if at_ledge
            && ctx.ledge.blocks(body.velocity.x - carry)
            && !ctx.ledge.blocks(-input)
        {
            // Sliding toward the drop without steering away: stop relative to the ground now
            self.smooth_rate = 0.0;
            body.velocity.x = carry;
        } else {
            let smooth_time = if local_target.abs() > tuning.move_epsilon {
                tuning.accel_smooth_time
            } else {
                tuning.decel_smooth_time
            };
            body.velocity.x = smooth_damp(
                body.velocity.x,
                world_target,
                &mut self.smooth_rate,
                smooth_time,
                tuning.max_accel_rate,
                ctx.dt,
            );
        }
        self.smoothed_velocity_x = body.velocity.x;

        self.emit_trail(tuning, ctx, body, feedback);
    }

    fn emit_trail(
        &mut self,
        tuning: &MovementTuning,
        ctx: &TickContext,
        body: &BodyState,
        feedback: &mut impl Feedback,
    ) {
        let relative_speed = (body.velocity.x - self.current_platform_velocity.x).abs();
        if !self.grounded || relative_speed <= tuning.move_epsilon {
            return;
        }
        if ctx.position.distance(self.last_trail_position) < tuning.trail_distance {
            return;
        }

        self.last_trail_position = ctx.position;
        feedback.play_effect(TRAIL_EFFECT, ctx.position, 0.0, 1.0);
        if !feedback.is_sound_playing(FOOTSTEP_SOUND) {
            feedback.play_sound(FOOTSTEP_SOUND);
        }
    }
}
