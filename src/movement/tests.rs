//! Movement domain: tests for timers, smoothing, jump phases, ground contact
//! and the fixed-tick movement core.

use std::collections::HashSet;

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::systems::collisions::probe_feet;
use super::systems::{
    initialize_characters, queue_character_commands, step_movement, sync_suspension,
    track_ground_contacts,
};
use super::*;
use crate::feedback::{Feedback, PlayEffect, PlaySound, SoundBoard};

const DT: f32 = 0.01;

// -----------------------------------------------------------------------------
// Test harness
// -----------------------------------------------------------------------------

/// Feedback sink that records every request.
#[derive(Default)]
struct Recorder {
    effects: Vec<String>,
    sounds: Vec<String>,
    playing: HashSet<String>,
}

impl Feedback for Recorder {
    fn play_effect(&mut self, name: &str, _position: Vec2, _rotation: f32, _scale: f32) {
        self.effects.push(name.to_string());
    }

    fn play_sound(&mut self, name: &str) {
        self.sounds.push(name.to_string());
        self.playing.insert(name.to_string());
    }

    fn is_sound_playing(&self, name: &str) -> bool {
        self.playing.contains(name)
    }
}

impl Recorder {
    fn count(list: &[String], name: &str) -> usize {
        list.iter().filter(|n| n.as_str() == name).count()
    }
}

/// One character driven tick by tick without an ECS world.
/// Gravity is not integrated, so vertical velocity only changes through the core.
struct Sim {
    state: MovementState,
    body: BodyState,
    tuning: MovementTuning,
    ctx: TickContext,
    feedback: Recorder,
}

impl Sim {
    fn new() -> Self {
        Self::with_tuning(MovementTuning::default())
    }

    fn with_tuning(tuning: MovementTuning) -> Self {
        let mut state = MovementState::default();
        state.enable();
        Self {
            state,
            body: BodyState::default(),
            tuning,
            ctx: TickContext {
                dt: DT,
                ..default()
            },
            feedback: Recorder::default(),
        }
    }

    fn tick(&mut self, commands: &[MovementCommand], edges: &[GroundEdge]) -> Vec<MovementEvent> {
        self.state.fixed_tick(
            &self.tuning,
            commands,
            edges,
            &self.ctx,
            &mut self.body,
            &mut self.feedback,
        )
    }

    fn idle(&mut self, ticks: usize) -> Vec<MovementEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.tick(&[], &[]));
        }
        events
    }

    /// Touch ground and wait out the landing lock.
    fn land(&mut self) {
        self.tick(&[], &[GroundEdge::Grounded]);
        self.idle(10);
    }
}

fn jumps(events: &[MovementEvent]) -> usize {
    events
        .iter()
        .filter(|e| **e == MovementEvent::JumpStarted)
        .count()
}

// -----------------------------------------------------------------------------
// Countdown tests
// -----------------------------------------------------------------------------

#[test]
fn test_countdown_expires_after_duration() {
    let mut timer = Countdown::default();
    assert!(!timer.is_active());

    timer.start(0.2);
    for _ in 0..19 {
        assert!(!timer.tick(DT));
    }
    assert!(timer.is_active());
    assert!(timer.tick(DT));
    assert!(!timer.is_active());
    assert_eq!(timer.remaining(), 0.0);
}

#[test]
fn test_countdown_restart_replaces_pending() {
    let mut timer = Countdown::default();
    timer.start(0.05);
    timer.tick(0.04);
    timer.start(0.05);
    assert!(!timer.tick(0.04));
    assert!(timer.is_active());
}

#[test]
fn test_countdown_zero_duration_lasts_one_tick() {
    let mut timer = Countdown::default();
    timer.start(0.0);
    assert!(timer.is_active());
    assert!(timer.tick(DT));
    assert!(!timer.is_active());

    timer.start(-1.0);
    assert_eq!(timer.remaining(), 0.0);
}

// -----------------------------------------------------------------------------
// Smoothing tests
// -----------------------------------------------------------------------------

#[test]
fn test_smooth_damp_approaches_without_overshoot() {
    let mut rate = 0.0;
    let mut value = 0.0;
    let mut previous = value;

    for _ in 0..50 {
        value = smooth_damp(value, 8.0, &mut rate, 0.06, 200.0, DT);
        assert!(value >= previous, "value went backwards: {value} < {previous}");
        assert!(value <= 8.0);
        previous = value;
    }
    assert!((value - 8.0).abs() < 0.01, "did not settle: {value}");
}

#[test]
fn test_smooth_damp_reversal_never_passes_target() {
    let mut rate = 0.0;
    let mut value = 8.0;
    for _ in 0..100 {
        value = smooth_damp(value, -8.0, &mut rate, 0.04, 200.0, DT);
        assert!(value >= -8.0);
    }
    assert!((value + 8.0).abs() < 0.01);
}

#[test]
fn test_smooth_damp_respects_max_rate() {
    let mut rate = 0.0;
    // Cap of 10 units/s over a 0.1 s smoothing window bounds the step size
    let value = smooth_damp(0.0, 100.0, &mut rate, 0.1, 10.0, DT);
    assert!(value > 0.0);
    assert!(value <= 1.0, "step too large: {value}");
}

#[test]
fn test_smooth_damp_zero_dt_is_noop() {
    let mut rate = 3.0;
    assert_eq!(smooth_damp(1.0, 5.0, &mut rate, 0.1, 100.0, 0.0), 1.0);
    assert_eq!(rate, 3.0);
}

// -----------------------------------------------------------------------------
// Jump phase tests
// -----------------------------------------------------------------------------

#[test]
fn test_phase_classification_bands() {
    let threshold = 0.15;
    let any = JumpPhase::Falling;

    assert_eq!(any.classify(true, 0.0, threshold), JumpPhase::Grounded);
    assert_eq!(any.classify(true, 0.005, threshold), JumpPhase::Grounded);
    assert_eq!(any.classify(true, 5.0, threshold), JumpPhase::Ascending);
    assert_eq!(any.classify(false, 5.0, threshold), JumpPhase::Ascending);
    assert_eq!(any.classify(false, 0.0, threshold), JumpPhase::Apex);
    assert_eq!(any.classify(false, -0.12, threshold), JumpPhase::Apex);
    assert_eq!(any.classify(false, -5.0, threshold), JumpPhase::Falling);
}

#[test]
fn test_phase_dead_zone_keeps_previous() {
    // With a narrow apex band, 0.05 < |vy| <= 0.1 matches nothing
    let threshold = 0.05;
    assert_eq!(
        JumpPhase::Ascending.classify(false, 0.08, threshold),
        JumpPhase::Ascending
    );
    assert_eq!(
        JumpPhase::Apex.classify(false, 0.08, threshold),
        JumpPhase::Apex
    );
    assert_eq!(
        JumpPhase::Falling.classify(false, -0.08, threshold),
        JumpPhase::Falling
    );
}

#[test]
fn test_phase_gravity_scales() {
    let tuning = MovementTuning::default();
    assert_eq!(JumpPhase::Grounded.gravity_scale(false, &tuning), 1.0);
    assert_eq!(JumpPhase::Ascending.gravity_scale(true, &tuning), 0.8);
    assert!((JumpPhase::Ascending.gravity_scale(false, &tuning) - 1.2).abs() < 1e-6);
    assert!((JumpPhase::Falling.gravity_scale(true, &tuning) - 1.8).abs() < 1e-6);
    assert_eq!(JumpPhase::Apex.gravity_scale(true, &tuning), 1.0);
}

#[test]
fn test_phase_sequence_is_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let samples: Vec<(bool, f32)> = (0..500)
        .map(|_| (rng.random_bool(0.3), rng.random_range(-12.0..12.0)))
        .collect();

    let run = |samples: &[(bool, f32)]| {
        let mut phase = JumpPhase::Grounded;
        samples
            .iter()
            .map(|(grounded, vy)| {
                phase = phase.classify(*grounded, *vy, 0.15);
                phase
            })
            .collect::<Vec<_>>()
    };

    let first = run(&samples);
    assert_eq!(first, run(&samples));

    for ((grounded, vy), phase) in samples.iter().zip(&first) {
        if *grounded && *vy <= 0.01 {
            assert_eq!(*phase, JumpPhase::Grounded);
        } else if *vy > 0.1 {
            assert_eq!(*phase, JumpPhase::Ascending);
        } else if *vy <= -0.15 {
            assert_eq!(*phase, JumpPhase::Falling);
        }
    }
}

// -----------------------------------------------------------------------------
// Ground contact tests
// -----------------------------------------------------------------------------

fn colliders(count: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..count).map(|_| world.spawn_empty().id()).collect()
}

#[test]
fn test_ground_contact_counts_overlaps() {
    let ids = colliders(2);
    let mut contact = GroundContact::default();

    assert_eq!(
        contact.contact_begin(ids[0], SurfaceKind::Ground),
        Some(GroundEdge::Grounded)
    );
    assert_eq!(contact.contact_begin(ids[1], SurfaceKind::Ground), None);
    assert_eq!(contact.contact_count(), 2);
    assert_eq!(contact.current_contact_collider(), Some(ids[1]));

    assert_eq!(contact.contact_end(ids[1]), None);
    assert!(contact.is_grounded());
    assert_eq!(contact.current_contact_collider(), Some(ids[0]));

    assert_eq!(contact.contact_end(ids[0]), Some(GroundEdge::LeftGround));
    assert!(!contact.is_grounded());
    assert_eq!(
        contact.drain_edges(),
        vec![GroundEdge::Grounded, GroundEdge::LeftGround]
    );
    assert!(contact.drain_edges().is_empty());
}

#[test]
fn test_ground_contact_end_is_idempotent() {
    let ids = colliders(2);
    let mut contact = GroundContact::default();

    contact.contact_begin(ids[0], SurfaceKind::Ground);
    contact.contact_begin(ids[0], SurfaceKind::Ground);
    assert_eq!(contact.contact_count(), 1);

    contact.contact_end(ids[0]);
    assert_eq!(contact.contact_end(ids[0]), None);
    assert_eq!(contact.contact_end(ids[1]), None);
    assert_eq!(contact.contact_count(), 0);
}

#[test]
fn test_ground_contact_ignores_other_surfaces() {
    let ids = colliders(1);
    let mut contact = GroundContact::default();
    assert_eq!(contact.contact_begin(ids[0], SurfaceKind::Other), None);
    assert!(!contact.is_grounded());
    assert!(contact.drain_edges().is_empty());
}

#[test]
fn test_void_entry_reported_once() {
    let ids = colliders(1);
    let mut contact = GroundContact::default();

    // Nothing pending before the overlap is recorded
    assert!(!contact.take_void_entry());
    contact.contact_begin(ids[0], SurfaceKind::Void);
    assert!(!contact.is_grounded());
    assert!(contact.take_void_entry());
    assert!(!contact.take_void_entry());
}

// -----------------------------------------------------------------------------
// Ledge tests
// -----------------------------------------------------------------------------

#[test]
fn test_foot_rays_cast_from_inset_bottom_corners() {
    let mut origins = Vec::new();
    probe_feet(Vec2::new(-0.4, 0.0), Vec2::new(0.4, 1.6), 0.01, |origin| {
        origins.push(origin);
        true
    });

    assert_eq!(origins.len(), 2);
    assert!((origins[0] - Vec2::new(-0.39, 0.0)).length() < 1e-6);
    assert!((origins[1] - Vec2::new(0.39, 0.0)).length() < 1e-6);
}

#[test]
fn test_foot_rays_detect_ledge_sides() {
    let min = Vec2::new(-0.4, 0.0);
    let max = Vec2::new(0.4, 1.6);
    // Ground spans x <= 0: the right foot hangs over the drop
    let feet = probe_feet(min, max, 0.01, |origin| origin.x <= 0.0);
    assert_eq!(feet.side(), LedgeSide::Right);

    let feet = probe_feet(min, max, 0.01, |origin| origin.x >= 0.0);
    assert_eq!(feet.side(), LedgeSide::Left);

    let feet = probe_feet(min, max, 0.01, |_| true);
    assert_eq!(feet.side(), LedgeSide::None);
}

#[test]
fn test_ledge_side_from_feet() {
    assert_eq!(LedgeSide::from_feet(true, true), LedgeSide::None);
    assert_eq!(LedgeSide::from_feet(false, false), LedgeSide::None);
    assert_eq!(LedgeSide::from_feet(true, false), LedgeSide::Right);
    assert_eq!(LedgeSide::from_feet(false, true), LedgeSide::Left);

    assert!(LedgeSide::Right.blocks(1.0));
    assert!(!LedgeSide::Right.blocks(-1.0));
    assert!(LedgeSide::Left.blocks(-0.5));
    assert!(!LedgeSide::None.blocks(1.0));
}

// -----------------------------------------------------------------------------
// Movement core: jumping
// -----------------------------------------------------------------------------

#[test]
fn test_grounded_jump_replaces_vertical_velocity() {
    let mut sim = Sim::new();
    sim.land();
    sim.body.velocity.y = -3.0;

    let events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    assert_eq!(jumps(&events), 1);
    assert_eq!(sim.body.velocity.y, sim.tuning.jump_strength);
    assert_eq!(sim.state.jump_phase, JumpPhase::Ascending);
    assert_eq!(sim.body.gravity_scale, sim.tuning.reduced_gravity);
    assert_eq!(Recorder::count(&sim.feedback.sounds, JUMP_SOUND), 1);
    assert_eq!(Recorder::count(&sim.feedback.effects, JUMP_EFFECT), 1);
}

#[test]
fn test_airborne_jump_without_coyote_is_buffered_only() {
    let mut sim = Sim::new();
    let events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    assert_eq!(jumps(&events), 0);
    assert!(sim.state.jump_buffer.is_active());
    assert_eq!(sim.body.velocity.y, 0.0);
}

#[test]
fn test_coyote_jump_just_inside_window() {
    let mut sim = Sim::new();
    sim.land();
    sim.tick(&[], &[GroundEdge::LeftGround]);
    assert!(sim.state.coyote.is_active());

    sim.idle(18);
    let events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    assert_eq!(jumps(&events), 1, "jump 0.19 s after leaving ground");
    assert!(!sim.state.coyote.is_active());
}

#[test]
fn test_coyote_jump_after_window_fails() {
    let mut sim = Sim::new();
    sim.land();
    sim.tick(&[], &[GroundEdge::LeftGround]);

    sim.idle(20);
    assert!(!sim.state.coyote.is_active());
    let mut events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    events.extend(sim.idle(20));
    assert_eq!(jumps(&events), 0, "jump 0.21 s after leaving ground");
}

#[test]
fn test_leaving_ground_by_jumping_opens_no_coyote() {
    let mut sim = Sim::new();
    sim.land();

    let events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    assert_eq!(jumps(&events), 1);

    sim.tick(&[], &[GroundEdge::LeftGround]);
    assert!(!sim.state.coyote.is_active());
    assert!(!sim.state.can_jump());

    let events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    assert_eq!(jumps(&events), 0);

    // Landing restores the jump
    sim.body.velocity.y = 0.0;
    sim.idle(15);
    sim.land();
    let events = sim.tick(&[MovementCommand::JumpPressed], &[]);
    assert_eq!(jumps(&events), 1);
}

#[test]
fn test_buffered_jump_fires_on_landing_tick() {
    let mut sim = Sim::new();
    sim.tick(&[MovementCommand::JumpPressed], &[]);
    sim.idle(4);

    let events = sim.tick(&[], &[GroundEdge::Grounded]);
    assert_eq!(
        events,
        vec![MovementEvent::Landed, MovementEvent::JumpStarted]
    );
    assert!(!sim.state.jump_buffer.is_active());
    assert_eq!(sim.body.velocity.y, sim.tuning.jump_strength);

    let later = sim.idle(20);
    assert_eq!(jumps(&later), 0, "buffered jump fires only once");
}

#[test]
fn test_buffered_jump_expires() {
    let mut sim = Sim::new();
    sim.tick(&[MovementCommand::JumpPressed], &[]);
    sim.idle(14);
    assert!(!sim.state.jump_buffer.is_active());

    let events = sim.tick(&[], &[GroundEdge::Grounded]);
    assert_eq!(events, vec![MovementEvent::Landed]);
    assert_eq!(sim.body.velocity.y, 0.0);
}

#[test]
fn test_jump_release_cuts_ascent() {
    let mut sim = Sim::new();
    sim.land();
    sim.tick(&[MovementCommand::JumpPressed], &[]);

    let events = sim.tick(&[MovementCommand::JumpReleased], &[]);
    assert_eq!(events, vec![MovementEvent::JumpEnded]);
    assert_eq!(
        sim.body.velocity.y,
        sim.tuning.jump_strength * sim.tuning.jump_cut_factor
    );
    assert!(!sim.state.jump_held);
    assert!((sim.body.gravity_scale - 1.2).abs() < 1e-6);
}

#[test]
fn test_jump_release_while_falling_keeps_velocity() {
    let mut sim = Sim::new();
    sim.body.velocity.y = -4.0;
    let events = sim.tick(&[MovementCommand::JumpReleased], &[]);
    assert!(events.is_empty());
    assert_eq!(sim.body.velocity.y, -4.0);
    assert_eq!(sim.state.jump_phase, JumpPhase::Falling);
    assert!((sim.body.gravity_scale - 1.8).abs() < 1e-6);
}

// -----------------------------------------------------------------------------
// Movement core: landing and horizontal control
// -----------------------------------------------------------------------------

#[test]
fn test_landing_raises_feedback_once_per_edge() {
    let mut sim = Sim::new();
    let events = sim.tick(&[], &[GroundEdge::Grounded]);
    assert_eq!(events, vec![MovementEvent::Landed]);
    assert_eq!(Recorder::count(&sim.feedback.effects, LAND_EFFECT), 1);
    assert_eq!(Recorder::count(&sim.feedback.sounds, LAND_SOUND), 1);

    let events = sim.idle(5);
    assert!(events.is_empty());
    assert_eq!(sim.state.jump_phase, JumpPhase::Grounded);
}

#[test]
fn test_landing_lock_holds_horizontal_velocity() {
    let mut sim = Sim::new();
    sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]);
    sim.idle(20);
    assert!(sim.body.velocity.x > 7.0);

    sim.tick(&[], &[GroundEdge::Grounded]);
    assert_eq!(sim.body.velocity.x, 0.0);
    assert_eq!(sim.state.smooth_rate(), 0.0);

    for tick in 1..8 {
        sim.tick(&[], &[]);
        assert_eq!(sim.body.velocity.x, 0.0, "tick {tick} inside the lock");
    }

    sim.tick(&[], &[]);
    assert!(!sim.state.landing_lock.is_active());
    assert!(sim.body.velocity.x > 0.0);
}

#[test]
fn test_landing_lock_keeps_platform_carry() {
    let mut sim = Sim::new();
    sim.tick(&[MovementCommand::MoveAxis(-1.0)], &[]);
    sim.ctx.platform_velocity = Vec2::new(3.0, 0.0);

    sim.tick(&[], &[GroundEdge::Grounded]);
    assert_eq!(sim.body.velocity.x, 3.0);
    sim.idle(3);
    assert_eq!(sim.body.velocity.x, 3.0);
    assert_eq!(sim.state.current_platform_velocity, Vec2::new(3.0, 0.0));
}

#[test]
fn test_landing_lock_disabled_keeps_control() {
    let tuning = MovementTuning {
        landing_lock_enabled: false,
        ..default()
    };
    let mut sim = Sim::with_tuning(tuning);
    sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]);
    sim.idle(5);
    let before = sim.body.velocity.x;

    sim.tick(&[], &[GroundEdge::Grounded]);
    assert!(!sim.state.landing_lock.is_active());
    assert!(sim.body.velocity.x >= before);
}

#[test]
fn test_platform_carry_added_to_target() {
    let mut sim = Sim::new();
    sim.land();
    sim.ctx.platform_velocity = Vec2::new(2.0, 0.0);
    sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]);
    sim.idle(100);
    assert!((sim.body.velocity.x - 10.0).abs() < 0.01);

    // Carry is dropped once airborne
    sim.tick(&[], &[GroundEdge::LeftGround]);
    assert_eq!(sim.state.current_platform_velocity, Vec2::ZERO);
}

#[test]
fn test_move_started_only_from_idle() {
    let mut sim = Sim::new();
    assert_eq!(
        sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]),
        vec![MovementEvent::MoveStarted]
    );
    assert!(sim.tick(&[MovementCommand::MoveAxis(0.5)], &[]).is_empty());
    assert!(sim.tick(&[MovementCommand::MoveAxis(0.0)], &[]).is_empty());
    assert_eq!(
        sim.tick(&[MovementCommand::MoveAxis(-1.0)], &[]),
        vec![MovementEvent::MoveStarted]
    );
}

#[test]
fn test_move_axis_is_sanitized() {
    let mut sim = Sim::new();
    sim.tick(&[MovementCommand::MoveAxis(4.0)], &[]);
    assert_eq!(sim.state.horizontal_input, 1.0);
    sim.tick(&[MovementCommand::MoveAxis(f32::NAN)], &[]);
    assert_eq!(sim.state.horizontal_input, 0.0);
}

#[test]
fn test_crouch_at_right_ledge_blocks_walking_off() {
    let mut sim = Sim::new();
    sim.land();
    sim.ctx.ledge = LedgeSide::Right;

    sim.tick(
        &[
            MovementCommand::CrouchHeld(true),
            MovementCommand::MoveAxis(1.0),
        ],
        &[],
    );
    sim.idle(10);
    assert_eq!(sim.body.velocity.x, 0.0);

    // Walking away from the drop is still allowed
    sim.tick(&[MovementCommand::MoveAxis(-1.0)], &[]);
    assert!(sim.body.velocity.x < 0.0);
}

#[test]
fn test_crouch_at_left_ledge_stops_slide() {
    let mut sim = Sim::new();
    sim.land();
    sim.tick(&[MovementCommand::MoveAxis(-1.0)], &[]);
    sim.idle(20);
    assert!(sim.body.velocity.x < -7.0);

    sim.ctx.ledge = LedgeSide::Left;
    sim.tick(
        &[
            MovementCommand::CrouchHeld(true),
            MovementCommand::MoveAxis(0.0),
        ],
        &[],
    );
    assert_eq!(sim.body.velocity.x, 0.0);
    assert_eq!(sim.state.smooth_rate(), 0.0);
}

#[test]
fn test_crouch_at_ledge_steering_away_is_smoothed() {
    let mut sim = Sim::new();
    sim.land();
    sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]);
    sim.idle(20);
    let before = sim.body.velocity.x;
    assert!(before > 7.0);

    // Still sliding toward the right ledge, but steering left
    sim.ctx.ledge = LedgeSide::Right;
    sim.tick(
        &[
            MovementCommand::CrouchHeld(true),
            MovementCommand::MoveAxis(-1.0),
        ],
        &[],
    );
    assert!(sim.body.velocity.x > 0.0, "snapped instead of smoothed");
    assert!(sim.body.velocity.x < before);

    sim.idle(30);
    assert!(sim.body.velocity.x < -7.0);
}

#[test]
fn test_ledge_ignored_without_crouch() {
    let mut sim = Sim::new();
    sim.land();
    sim.ctx.ledge = LedgeSide::Right;
    sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]);
    sim.idle(5);
    assert!(sim.body.velocity.x > 0.0);
}

#[test]
fn test_trail_effects_follow_distance() {
    let mut sim = Sim::new();
    sim.land();
    sim.tick(&[MovementCommand::MoveAxis(1.0)], &[]);
    sim.idle(10);
    assert_eq!(Recorder::count(&sim.feedback.effects, TRAIL_EFFECT), 0);

    for step in 1..=6 {
        sim.ctx.position = Vec2::new(step as f32 * 0.5, 0.0);
        sim.tick(&[], &[]);
    }

    assert_eq!(Recorder::count(&sim.feedback.effects, TRAIL_EFFECT), 3);
    // The footstep is still "playing" in the recorder, so it is not restarted
    assert_eq!(Recorder::count(&sim.feedback.sounds, FOOTSTEP_SOUND), 1);
}

#[test]
fn test_drop_through_requires_ground_contact() {
    let ids = colliders(1);
    let mut sim = Sim::new();
    sim.ctx.contact_collider = Some(ids[0]);

    let events = sim.tick(&[MovementCommand::DropThroughRequested], &[]);
    assert!(events.is_empty());

    sim.land();
    let events = sim.tick(&[MovementCommand::DropThroughRequested], &[]);
    assert_eq!(events, vec![MovementEvent::DropThrough(ids[0])]);
}

#[test]
fn test_disabled_state_ignores_ticks() {
    let mut sim = Sim::new();
    sim.state.disable();
    sim.body.velocity = Vec2::new(1.0, 2.0);

    let events = sim.tick(
        &[MovementCommand::JumpPressed, MovementCommand::MoveAxis(1.0)],
        &[GroundEdge::Grounded],
    );
    assert!(events.is_empty());
    assert_eq!(sim.body.velocity, Vec2::new(1.0, 2.0));
    assert!(!sim.state.grounded);

    assert!(sim.state.enable());
    assert!(!sim.state.enable());
}

#[test]
fn test_held_jump_height() {
    let tuning = MovementTuning::default();
    let height = tuning.held_jump_height(10.0);
    assert!((height - 81.0 / 16.0).abs() < 1e-4);
    assert!(tuning.held_jump_height(0.0).is_infinite());
}

// -----------------------------------------------------------------------------
// App-level tests
// -----------------------------------------------------------------------------

#[derive(Resource, Default)]
struct Counts {
    landed: usize,
    move_started: usize,
}

fn count_events(
    mut landed: MessageReader<Landed>,
    mut move_started: MessageReader<MoveStarted>,
    mut counts: ResMut<Counts>,
) {
    counts.landed += landed.read().count();
    counts.move_started += move_started.read().count();
}

fn movement_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .init_resource::<MovementTuning>()
        .init_resource::<SoundBoard>()
        .init_resource::<Counts>()
        .add_message::<PlayerReady>()
        .add_message::<CharacterCommand>()
        .add_message::<PlayEffect>()
        .add_message::<PlaySound>()
        .add_message::<JumpStarted>()
        .add_message::<JumpEnded>()
        .add_message::<Landed>()
        .add_message::<MoveStarted>()
        .add_message::<DropThroughRequest>()
        .add_systems(
            Update,
            (
                initialize_characters,
                queue_character_commands,
                step_movement,
                count_events,
            )
                .chain(),
        );
    app
}

fn spawn_character(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            BodySize::default(),
            Transform::default(),
            LinearVelocity::default(),
            GravityScale(1.0),
        ))
        .id()
}

/// Edit the character's ground contacts, then run one update.
fn touch(app: &mut App, character: Entity, edit: impl FnOnce(&mut GroundContact)) {
    if let Some(mut contact) = app.world_mut().get_mut::<GroundContact>(character) {
        edit(&mut contact);
    }
    app.update();
}

#[test]
fn test_player_ready_twice_spawns_one_sensor() {
    let mut app = movement_app();
    let character = spawn_character(&mut app);

    app.world_mut().write_message(PlayerReady { character });
    app.world_mut().write_message(PlayerReady { character });
    app.update();
    app.world_mut().write_message(PlayerReady { character });
    app.update();

    let world = app.world_mut();
    let sensors = world
        .query::<&GroundSensor>()
        .iter(world)
        .filter(|sensor| sensor.owner == character)
        .count();
    assert_eq!(sensors, 1);

    let state = world.get::<MovementState>(character).unwrap();
    assert!(state.is_enabled());
    assert!(world.get::<SensorLink>(character).is_some());
}

#[test]
fn test_landed_once_per_grounded_transition() {
    let mut app = movement_app();
    let character = spawn_character(&mut app);
    app.world_mut().write_message(PlayerReady { character });
    app.update();

    let ids = colliders(2);
    touch(&mut app, character, |c| {
        c.contact_begin(ids[0], SurfaceKind::Ground);
    });
    touch(&mut app, character, |c| {
        c.contact_begin(ids[1], SurfaceKind::Ground);
    });
    touch(&mut app, character, |c| {
        c.contact_end(ids[0]);
    });
    assert_eq!(app.world().resource::<Counts>().landed, 1);

    touch(&mut app, character, |c| {
        c.contact_end(ids[1]);
    });
    touch(&mut app, character, |c| {
        c.contact_begin(ids[0], SurfaceKind::Ground);
    });
    assert_eq!(app.world().resource::<Counts>().landed, 2);

    let state = app.world().get::<MovementState>(character).unwrap();
    assert!(state.grounded);
}

#[test]
fn test_commands_reach_character_through_queue() {
    let mut app = movement_app();
    let character = spawn_character(&mut app);
    let stranger = app.world_mut().spawn_empty().id();
    app.world_mut().write_message(PlayerReady { character });
    app.update();

    app.world_mut().write_message(CharacterCommand {
        character,
        command: MovementCommand::MoveAxis(1.0),
    });
    app.world_mut().write_message(CharacterCommand {
        character: stranger,
        command: MovementCommand::JumpPressed,
    });
    app.update();

    assert_eq!(app.world().resource::<Counts>().move_started, 1);
    let world = app.world();
    assert_eq!(
        world.get::<MovementState>(character).unwrap().horizontal_input,
        1.0
    );
    assert!(world.get::<PendingCommands>(character).unwrap().0.is_empty());
}

// -----------------------------------------------------------------------------
// Suspension
// -----------------------------------------------------------------------------

fn suspension_app() -> (App, Entity) {
    let mut app = App::new();
    app.add_systems(FixedUpdate, sync_suspension);

    let mut state = MovementState::default();
    state.enable();
    state.horizontal_input = 1.0;
    state.coyote.start(0.2);
    state.jump_buffer.start(0.1);
    state.landing_lock.start(0.08);

    let character = app
        .world_mut()
        .spawn((
            state,
            GroundContact::default(),
            PendingCommands(vec![MovementCommand::JumpPressed]),
        ))
        .id();
    (app, character)
}

#[test]
fn test_suspension_cancels_timers_and_queued_commands() {
    let (mut app, character) = suspension_app();
    app.world_mut()
        .entity_mut(character)
        .insert(MovementSuspended);
    app.world_mut().run_schedule(FixedUpdate);

    let world = app.world();
    let state = world.get::<MovementState>(character).unwrap();
    assert!(!state.is_enabled());
    assert!(!state.coyote.is_active());
    assert!(!state.jump_buffer.is_active());
    assert!(!state.landing_lock.is_active());
    assert_eq!(state.horizontal_input, 0.0);
    assert!(world.get::<PendingCommands>(character).unwrap().0.is_empty());
}

#[test]
fn test_resume_after_frames_without_fixed_tick() {
    let (mut app, character) = suspension_app();
    app.world_mut()
        .entity_mut(character)
        .insert(MovementSuspended);
    app.world_mut().run_schedule(FixedUpdate);

    // Land while suspended, then lift the suspension
    let ground = app.world_mut().spawn_empty().id();
    app.world_mut()
        .get_mut::<GroundContact>(character)
        .unwrap()
        .contact_begin(ground, SurfaceKind::Ground);
    app.world_mut()
        .entity_mut(character)
        .remove::<MovementSuspended>();

    // Rendered frames run before the next fixed tick
    for _ in 0..3 {
        app.update();
    }
    app.world_mut().run_schedule(FixedUpdate);

    let world = app.world_mut();
    let state = world.get::<MovementState>(character).unwrap();
    assert!(state.is_enabled());
    assert!(state.grounded);
    let mut contact = world.get_mut::<GroundContact>(character).unwrap();
    assert!(contact.drain_edges().is_empty(), "stale edges were kept");
}

// -----------------------------------------------------------------------------
// Sensor collisions
// -----------------------------------------------------------------------------

#[derive(Resource, Default)]
struct VoidCount(usize);

fn count_voids(mut voids: MessageReader<EnteredVoid>, mut count: ResMut<VoidCount>) {
    count.0 += voids.read().count();
}

struct SensorRig {
    app: App,
    character: Entity,
    sensor: Entity,
    ground: Entity,
    void: Entity,
}

impl SensorRig {
    fn new() -> Self {
        let mut app = App::new();
        app.init_resource::<VoidCount>()
            .add_message::<CollisionStart>()
            .add_message::<CollisionEnd>()
            .add_message::<EnteredVoid>()
            .add_systems(FixedUpdate, (track_ground_contacts, count_voids).chain());

        let world = app.world_mut();
        let character = world.spawn(GroundContact::default()).id();
        let sensor = world.spawn(GroundSensor { owner: character }).id();
        let ground = world.spawn(Ground).id();
        let void = world.spawn(VoidZone).id();

        Self {
            app,
            character,
            sensor,
            ground,
            void,
        }
    }

    fn start(&mut self, a: Entity, b: Entity) {
        self.app.world_mut().write_message(CollisionStart {
            collider1: a,
            collider2: b,
            body1: None,
            body2: None,
        });
    }

    fn end(&mut self, a: Entity, b: Entity) {
        self.app.world_mut().write_message(CollisionEnd {
            collider1: a,
            collider2: b,
            body1: None,
            body2: None,
        });
    }

    fn tick(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    fn contact(&mut self) -> Mut<'_, GroundContact> {
        self.app
            .world_mut()
            .get_mut::<GroundContact>(self.character)
            .unwrap()
    }

    fn voids(&self) -> usize {
        self.app.world().resource::<VoidCount>().0
    }
}

#[test]
fn test_sensor_collisions_drive_grounded_edges() {
    let mut rig = SensorRig::new();
    let (sensor, ground) = (rig.sensor, rig.ground);

    rig.start(sensor, ground);
    rig.tick();
    assert!(rig.contact().is_grounded());

    // Either collider order is accepted
    rig.end(ground, sensor);
    rig.tick();
    assert!(!rig.contact().is_grounded());
    assert_eq!(
        rig.contact().drain_edges(),
        vec![GroundEdge::Grounded, GroundEdge::LeftGround]
    );
}

#[test]
fn test_sensor_ignores_collisions_without_a_sensor() {
    let mut rig = SensorRig::new();
    let (ground, void) = (rig.ground, rig.void);

    rig.start(ground, void);
    rig.tick();
    rig.tick();
    assert!(!rig.contact().is_grounded());
    assert_eq!(rig.voids(), 0);
}

#[test]
fn test_void_entry_reported_one_tick_late() {
    let mut rig = SensorRig::new();
    let (sensor, void) = (rig.sensor, rig.void);

    rig.start(void, sensor);
    rig.tick();
    assert_eq!(rig.voids(), 0);
    assert!(!rig.contact().is_grounded());

    rig.tick();
    assert_eq!(rig.voids(), 1);

    rig.tick();
    assert_eq!(rig.voids(), 1, "void reported more than once");
}
