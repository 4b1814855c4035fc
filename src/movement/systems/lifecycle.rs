//! Movement domain: attaching movement to characters and suspending it.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use std::collections::HashSet;

use crate::movement::{
    BodySize, GameLayer, GroundContact, GroundSensor, LedgeProbe, MovementState,
    MovementSuspended, PendingCommands, Player, PlayerReady, SensorLink,
};

/// Thickness of the foot sensor strip.
const SENSOR_HEIGHT: f32 = 0.1;
/// Sensor width relative to the body, so walls do not count as ground.
const SENSOR_WIDTH_RATIO: f32 = 0.9;

/// Attach movement state and a foot sensor to each ready player, once.
pub(crate) fn initialize_characters(
    mut commands: Commands,
    mut ready: MessageReader<PlayerReady>,
    characters: Query<(Option<&BodySize>, Has<SensorLink>), With<Player>>,
) {
    let mut initialized = HashSet::new();

    for event in ready.read() {
        let character = event.character;
        let Ok((size, already_linked)) = characters.get(character) else {
            warn!("PlayerReady for {:?}, which is not a player", character);
            continue;
        };

        if already_linked || !initialized.insert(character) {
            debug!("Movement already initialized for {:?}, skipping", character);
            continue;
        }

        let size = size.copied().unwrap_or_default().0;
        let mut state = MovementState::default();
        state.enable();

        let sensor = commands
            .spawn((
                Name::new("Ground Sensor"),
                GroundSensor { owner: character },
                Sensor,
                Collider::rectangle(size.x * SENSOR_WIDTH_RATIO, SENSOR_HEIGHT),
                Transform::from_xyz(0.0, -size.y * 0.5, 0.0),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Ground, GameLayer::SemiSolid, GameLayer::Void],
                ),
                ChildOf(character),
            ))
            .id();

        commands.entity(character).insert((
            state,
            GroundContact::default(),
            LedgeProbe::default(),
            PendingCommands::default(),
            SensorLink(sensor),
        ));

        info!(
            "Movement initialized for {:?}: body={}x{}, sensor={:?}",
            character, size.x, size.y, sensor
        );
    }
}

/// Halt movement when suspended; resume in step with the current contacts.
pub(crate) fn sync_suspension(
    mut suspended: Query<
        (Entity, &mut MovementState, &mut PendingCommands),
        With<MovementSuspended>,
    >,
    mut characters: Query<
        (Entity, &mut MovementState, &mut GroundContact),
        Without<MovementSuspended>,
    >,
) {
    // Polled each tick: removal records can age out between fixed ticks
    for (entity, mut state, mut pending) in &mut suspended {
        if !state.is_enabled() {
            continue;
        }
        state.disable();
        pending.0.clear();
        debug!("Movement suspended for {:?}", entity);
    }

    for (entity, mut state, mut contact) in &mut characters {
        if state.is_enabled() {
            continue;
        }
        // Edges seen while suspended are stale; adopt the present contact state
        contact.drain_edges();
        state.grounded = contact.is_grounded();
        state.enable();
        debug!("Movement resumed for {:?}", entity);
    }
}
