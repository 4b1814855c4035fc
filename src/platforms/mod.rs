//! Platforms domain: moving platforms that carry characters and semi-solid
//! platforms they can drop through.

mod components;
mod registry;
mod systems;


pub use components::{
    DROP_THROUGH_TIME, Easing, MovingPlatform, PassThroughPlatform, PlatformCollider, ping_pong,
};
pub use registry::PlatformRegistry;

use bevy::prelude::*;

use crate::movement::{DropThroughRequest, MovementSet};
use crate::platforms::systems::{
    advance_platforms, close_pass_through_platforms, handle_drop_through,
    register_platform_colliders, unregister_platform, unregister_platform_collider,
};

pub struct PlatformsPlugin;

impl Plugin for PlatformsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlatformRegistry>()
            .add_message::<DropThroughRequest>()
            .add_observer(unregister_platform)
            .add_observer(unregister_platform_collider)
            .add_systems(
                FixedUpdate,
                (register_platform_colliders, advance_platforms)
                    .chain()
                    .before(MovementSet::Sense),
            )
            .add_systems(
                FixedUpdate,
                (handle_drop_through, close_pass_through_platforms)
                    .chain()
                    .after(MovementSet::Step),
            );
    }
}
