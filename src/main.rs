use avian2d::prelude::*;
use bevy::prelude::*;

use platformer_core::PlatformerCorePlugin;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Platformer".to_string(),
            resolution: (1280, 720).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Time::<Fixed>::from_hz(60.0))
    .insert_resource(Gravity(Vec2::NEG_Y * 20.0))
    .add_plugins(PlatformerCorePlugin);

    #[cfg(feature = "dev-tools")]
    app.add_plugins(platformer_core::dev::DevPlugin);

    app.run();
}
