//! Platforms domain: platform motion, registry upkeep and drop-through handling.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::movement::{DropThroughRequest, GroundContact, MovementSuspended};
use crate::platforms::{
    DROP_THROUGH_TIME, MovingPlatform, PassThroughPlatform, PlatformCollider, PlatformRegistry,
};

pub(crate) fn register_platform_colliders(
    mut registry: ResMut<PlatformRegistry>,
    added_platforms: Query<Entity, Added<MovingPlatform>>,
    added_colliders: Query<(Entity, &PlatformCollider), Added<PlatformCollider>>,
) {
    for platform in &added_platforms {
        registry.register(platform, platform);
    }
    for (collider, link) in &added_colliders {
        registry.register(collider, link.platform);
    }
}

/// Removals are observed immediately, independent of the fixed tick rate.
pub(crate) fn unregister_platform(
    remove: On<Remove, MovingPlatform>,
    mut registry: ResMut<PlatformRegistry>,
) {
    registry.unregister_platform(remove.entity);
}

pub(crate) fn unregister_platform_collider(
    remove: On<Remove, PlatformCollider>,
    mut registry: ResMut<PlatformRegistry>,
) {
    registry.unregister_collider(remove.entity);
}

pub(crate) fn advance_platforms(
    time: Res<Time>,
    mut platforms: Query<(
        &mut MovingPlatform,
        &Transform,
        &mut LinearVelocity,
        Has<MovementSuspended>,
    )>,
) {
    let dt = time.delta_secs();

    for (mut platform, transform, mut velocity, suspended) in &mut platforms {
        if suspended {
            platform.halt();
            velocity.0 = Vec2::ZERO;
            continue;
        }

        // The kinematic body reaches the next waypoint position by integrating this velocity
        velocity.0 = match platform.advance(transform.translation.truncate(), dt) {
            Some(_) => platform.velocity(),
            None => Vec2::ZERO,
        };
    }
}

pub(crate) fn handle_drop_through(
    mut commands: Commands,
    mut requests: MessageReader<DropThroughRequest>,
    mut platforms: Query<&mut PassThroughPlatform>,
    mut contacts: Query<&mut GroundContact>,
) {
    for request in requests.read() {
        let Ok(mut platform) = platforms.get_mut(request.collider) else {
            debug!(
                "Drop-through ignored: {:?} is not a pass-through platform",
                request.collider
            );
            continue;
        };
        if platform.is_open() {
            continue;
        }

        platform.open(DROP_THROUGH_TIME);
        commands.entity(request.collider).insert(ColliderDisabled);

        // The disabled collider may never report an end of contact
        if let Ok(mut contact) = contacts.get_mut(request.character) {
            contact.contact_end(request.collider);
        }

        debug!(
            "Drop-through: {:?} falls through {:?}",
            request.character, request.collider
        );
    }
}

pub(crate) fn close_pass_through_platforms(
    time: Res<Time>,
    mut commands: Commands,
    mut platforms: Query<(Entity, &mut PassThroughPlatform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut platform) in &mut platforms {
        if platform.tick(dt) {
            commands.entity(entity).remove::<ColliderDisabled>();
            debug!("Pass-through platform {:?} solid again", entity);
        }
    }
}
