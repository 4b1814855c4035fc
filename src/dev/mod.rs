//! Dev domain: a playable test room with keyboard controls.
//!
//! Only built with the `dev-tools` feature. Binding keys to movement commands
//! and respawning after a fall live here, outside the movement core.

mod input;
mod room;

use bevy::prelude::*;

use crate::dev::input::send_keyboard_commands;
use crate::dev::room::{respawn_on_void, setup_camera, spawn_player, spawn_test_room};

/// Where the player is placed at startup and after falling into a void.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec2);

impl Default for SpawnPoint {
    fn default() -> Self {
        Self(Vec2::new(0.0, 1.0))
    }
}

pub struct DevPlugin;

impl Plugin for DevPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnPoint>()
            .add_systems(Startup, (setup_camera, spawn_test_room, spawn_player))
            .add_systems(Update, (send_keyboard_commands, respawn_on_void));
    }
}
