//! Movement domain: ground contact tracking and ledge probes.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::movement::{
    EnteredVoid, GameLayer, Ground, GroundContact, GroundSensor, LedgeProbe, MovementSuspended,
    MovementTuning, Player, SensorLink, SurfaceKind, VoidZone,
};
use crate::platforms::PassThroughPlatform;

/// Resolve which collider of a pair is a foot sensor.
fn sensor_pair(
    sensors: &Query<&GroundSensor>,
    a: Entity,
    b: Entity,
) -> Option<(GroundSensor, Entity)> {
    if let Ok(sensor) = sensors.get(a) {
        Some((*sensor, b))
    } else if let Ok(sensor) = sensors.get(b) {
        Some((*sensor, a))
    } else {
        None
    }
}

pub(crate) fn track_ground_contacts(
    mut collision_starts: MessageReader<CollisionStart>,
    mut collision_ends: MessageReader<CollisionEnd>,
    sensors: Query<&GroundSensor>,
    surfaces: Query<(Has<Ground>, Has<PassThroughPlatform>, Has<VoidZone>)>,
    mut contacts: Query<(Entity, &mut GroundContact)>,
    mut void_events: MessageWriter<EnteredVoid>,
) {
    // Voids entered last tick are reported now
    for (character, mut contact) in &mut contacts {
        if contact.take_void_entry() {
            debug!("Entered void: {:?}", character);
            void_events.write(EnteredVoid { character });
        }
    }

    for event in collision_starts.read() {
        let Some((sensor, other)) = sensor_pair(&sensors, event.collider1, event.collider2) else {
            continue;
        };

        let kind = match surfaces.get(other) {
            Ok((_, _, true)) => SurfaceKind::Void,
            Ok((true, _, _)) | Ok((_, true, _)) => SurfaceKind::Ground,
            _ => SurfaceKind::Other,
        };

        let Ok((_, mut contact)) = contacts.get_mut(sensor.owner) else {
            continue;
        };
        if contact.contact_begin(other, kind).is_some() {
            debug!(
                "Grounded: {:?} on {:?} (contacts={})",
                sensor.owner,
                other,
                contact.contact_count()
            );
        }
    }

    for event in collision_ends.read() {
        let Some((sensor, other)) = sensor_pair(&sensors, event.collider1, event.collider2) else {
            continue;
        };

        let Ok((_, mut contact)) = contacts.get_mut(sensor.owner) else {
            continue;
        };
        if contact.contact_end(other).is_some() {
            debug!("Left ground: {:?} from {:?}", sensor.owner, other);
        }
    }
}

pub(crate) fn probe_ledges(
    spatial_query: SpatialQuery,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            Entity,
            &ColliderAabb,
            &GroundContact,
            &mut LedgeProbe,
            Option<&SensorLink>,
        ),
        (With<Player>, Without<MovementSuspended>),
    >,
) {
    for (entity, aabb, contact, mut probe, sensor) in &mut query {
        if !contact.is_grounded() {
            *probe = LedgeProbe::default();
            continue;
        }

        // Only hit walkable surfaces, never the character itself
        let mut excluded = vec![entity];
        if let Some(link) = sensor {
            excluded.push(link.0);
        }
        let filter = SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::SemiSolid])
            .with_excluded_entities(excluded);

        *probe = probe_feet(aabb.min, aabb.max, tuning.foot_offset, |origin| {
            spatial_query
                .cast_ray(
                    origin,
                    Dir2::NEG_Y,
                    tuning.ledge_check_distance,
                    true,
                    &filter,
                )
                .is_some()
        });
    }
}

/// Cast down from both bottom corners of a body, inset by `foot_offset`.
pub(crate) fn probe_feet(
    min: Vec2,
    max: Vec2,
    foot_offset: f32,
    mut ground_below: impl FnMut(Vec2) -> bool,
) -> LedgeProbe {
    let left_foot = Vec2::new(min.x + foot_offset, min.y);
    let right_foot = Vec2::new(max.x - foot_offset, min.y);

    LedgeProbe {
        left_grounded: ground_below(left_foot),
        right_grounded: ground_below(right_foot),
    }
}
