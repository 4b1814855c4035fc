//! Movement domain: the fixed-tick system driving each character's body.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::feedback::FeedbackChannel;
use crate::movement::{
    BodyState, DropThroughRequest, GroundContact, JumpEnded, JumpStarted, Landed, LedgeProbe,
    MoveStarted, MovementEvent, MovementState, MovementSuspended, MovementTuning,
    PendingCommands, Player, TickContext,
};
use crate::platforms::{MovingPlatform, PlatformRegistry};

/// Typed outlets for the events a tick raises.
#[derive(SystemParam)]
pub(crate) struct MovementEventWriters<'w> {
    jump_started: MessageWriter<'w, JumpStarted>,
    jump_ended: MessageWriter<'w, JumpEnded>,
    landed: MessageWriter<'w, Landed>,
    move_started: MessageWriter<'w, MoveStarted>,
    drop_through: MessageWriter<'w, DropThroughRequest>,
}

impl MovementEventWriters<'_> {
    fn dispatch(&mut self, character: Entity, event: MovementEvent) {
        match event {
            MovementEvent::JumpStarted => {
                self.jump_started.write(JumpStarted { character });
            }
            MovementEvent::JumpEnded => {
                self.jump_ended.write(JumpEnded { character });
            }
            MovementEvent::Landed => {
                self.landed.write(Landed { character });
            }
            MovementEvent::MoveStarted => {
                self.move_started.write(MoveStarted { character });
            }
            MovementEvent::DropThrough(collider) => {
                self.drop_through
                    .write(DropThroughRequest { character, collider });
            }
        }
    }
}

pub(crate) fn step_movement(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    registry: Option<Res<PlatformRegistry>>,
    platforms: Query<&MovingPlatform>,
    mut characters: Query<
        (
            Entity,
            &mut MovementState,
            &mut PendingCommands,
            &mut GroundContact,
            &LedgeProbe,
            &Transform,
            &mut LinearVelocity,
            &mut GravityScale,
        ),
        (With<Player>, Without<MovementSuspended>),
    >,
    mut feedback: FeedbackChannel,
    mut writers: MovementEventWriters,
) {
    let dt = time.delta_secs();

    for (
        character,
        mut state,
        mut pending,
        mut contact,
        probe,
        transform,
        mut velocity,
        mut gravity,
    ) in &mut characters
    {
        let commands = std::mem::take(&mut pending.0);
        let edges = contact.drain_edges();
        let contact_collider = contact.current_contact_collider();

        // Carry only applies while standing on a registered moving platform
        let platform_velocity = if contact.is_grounded() {
            contact_collider
                .zip(registry.as_deref())
                .and_then(|(collider, registry)| registry.platform_for(collider))
                .and_then(|platform| platforms.get(platform).ok())
                .map(MovingPlatform::velocity)
                .unwrap_or(Vec2::ZERO)
        } else {
            Vec2::ZERO
        };

        let ctx = TickContext {
            dt,
            position: transform.translation.truncate(),
            platform_velocity,
            ledge: probe.side(),
            contact_collider,
        };
        let mut body = BodyState {
            velocity: velocity.0,
            gravity_scale: gravity.0,
        };

        let events = state.fixed_tick(
            &tuning,
            &commands,
            &edges,
            &ctx,
            &mut body,
            &mut feedback,
        );

        velocity.0 = body.velocity;
        gravity.0 = body.gravity_scale;

        for event in events {
            writers.dispatch(character, event);
        }
    }
}
