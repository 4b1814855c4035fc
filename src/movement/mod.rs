//! Movement domain: ground contact, jump phases, forgiveness timers and
//! horizontal control for platformer characters.

mod components;
mod events;
mod ledge;
mod phase;
mod resources;
mod sensor;
mod smoothing;
mod state;
mod systems;
mod timers;

#[cfg(test)]
mod tests;

pub use components::{
    BodySize, GameLayer, Ground, MovementSuspended, PendingCommands, Player, SensorLink, VoidZone,
};
pub use events::{
    CharacterCommand, DropThroughRequest, EnteredVoid, JumpEnded, JumpStarted, Landed,
    MoveStarted, MovementCommand, PlayerReady,
};
pub use ledge::{LedgeProbe, LedgeSide};
pub use phase::JumpPhase;
pub use resources::MovementTuning;
pub use sensor::{GroundContact, GroundEdge, GroundSensor, SurfaceKind};
pub use smoothing::smooth_damp;
pub use state::{
    BodyState, FOOTSTEP_SOUND, JUMP_EFFECT, JUMP_SOUND, LAND_EFFECT, LAND_SOUND, MovementEvent,
    MovementState, TRAIL_EFFECT, TickContext,
};
pub use timers::{Countdown, TIMER_EPSILON};

use bevy::prelude::*;

use crate::movement::systems::{
    initialize_characters, probe_ledges, queue_character_commands, step_movement,
    sync_suspension, track_ground_contacts,
};

/// Fixed-tick phases of the movement pipeline.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementSet {
    /// Ground contacts and ledge probes are refreshed.
    Sense,
    /// Commands, edges and timers are applied to the body.
    Step,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .add_message::<CharacterCommand>()
            .add_message::<PlayerReady>()
            .add_message::<JumpStarted>()
            .add_message::<JumpEnded>()
            .add_message::<Landed>()
            .add_message::<MoveStarted>()
            .add_message::<EnteredVoid>()
            .add_message::<DropThroughRequest>()
            .configure_sets(FixedUpdate, (MovementSet::Sense, MovementSet::Step).chain())
            .add_systems(
                Update,
                (initialize_characters, queue_character_commands).chain(),
            )
            .add_systems(FixedUpdate, sync_suspension.before(MovementSet::Sense))
            .add_systems(
                FixedUpdate,
                (track_ground_contacts, probe_ledges)
                    .chain()
                    .in_set(MovementSet::Sense),
            )
            .add_systems(FixedUpdate, step_movement.in_set(MovementSet::Step));
    }
}
