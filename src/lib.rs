//! Fixed-tick 2D platformer character movement for Bevy and avian2d.
//!
//! Add [`PlatformerCorePlugin`] next to avian's `PhysicsPlugins`, spawn a
//! character with [`movement::Player`] and a dynamic rigid body, then send
//! [`movement::PlayerReady`] for it. Drive it with
//! [`movement::CharacterCommand`] messages.

pub mod content;
#[cfg(feature = "dev-tools")]
pub mod dev;
pub mod feedback;
pub mod movement;
pub mod platforms;

use bevy::prelude::*;

pub struct PlatformerCorePlugin;

impl Plugin for PlatformerCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            feedback::FeedbackPlugin,
            content::ContentPlugin,
            movement::MovementPlugin,
            platforms::PlatformsPlugin,
        ));
    }
}
