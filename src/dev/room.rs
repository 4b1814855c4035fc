//! Dev domain: test room, player spawn and fall recovery.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::dev::SpawnPoint;
use crate::movement::{
    BodySize, EnteredVoid, GameLayer, Ground, MovementTuning, Player, PlayerReady, VoidZone,
};
use crate::platforms::{Easing, MovingPlatform, PassThroughPlatform};

/// World units per screen pixel.
const CAMERA_SCALE: f32 = 1.0 / 40.0;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, 0.0, 0.0).with_scale(Vec3::splat(CAMERA_SCALE)),
    ));
}

fn solid(commands: &mut Commands, position: Vec2, size: Vec2, color: Color) {
    commands.spawn((
        Ground,
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]),
    ));
}

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    // Floor with a gap over the void on the right
    solid(
        &mut commands,
        Vec2::new(-4.0, -4.0),
        Vec2::new(20.0, 1.0),
        ground_color,
    );
    solid(
        &mut commands,
        Vec2::new(12.0, -4.0),
        Vec2::new(4.0, 1.0),
        ground_color,
    );

    // Walls
    solid(
        &mut commands,
        Vec2::new(-14.5, 2.0),
        Vec2::new(1.0, 13.0),
        wall_color,
    );
    solid(
        &mut commands,
        Vec2::new(14.5, 2.0),
        Vec2::new(1.0, 13.0),
        wall_color,
    );

    // Ledge block for crouch practice
    solid(
        &mut commands,
        Vec2::new(-9.0, -2.5),
        Vec2::new(3.0, 2.0),
        platform_color,
    );

    // Semi-solid platform (S / Down to drop through)
    let size = Vec2::new(4.0, 0.3);
    commands.spawn((
        Name::new("Semi-solid Platform"),
        PassThroughPlatform::default(),
        Sprite {
            color: platform_color.with_alpha(0.7),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(-3.0, -1.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::SemiSolid, [GameLayer::Player]),
    ));

    // Moving platform across the gap
    let size = Vec2::new(3.0, 0.4);
    let start = Vec2::new(4.0, -2.0);
    commands.spawn((
        Name::new("Moving Platform"),
        Ground,
        MovingPlatform::new(start, Vec2::new(9.0, -2.0), 3.0).with_easing(Easing::EaseInOut),
        Sprite {
            color: platform_color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(start.extend(0.0)),
        RigidBody::Kinematic,
        LinearVelocity::default(),
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]),
    ));

    // Fall-death zone below the floor
    commands.spawn((
        Name::new("Void"),
        VoidZone,
        Transform::from_xyz(0.0, -12.0, 0.0),
        Sensor,
        Collider::rectangle(60.0, 2.0),
        CollisionLayers::new(GameLayer::Void, [GameLayer::Player]),
    ));
}

pub(crate) fn spawn_player(
    mut commands: Commands,
    spawn: Res<SpawnPoint>,
    tuning: Res<MovementTuning>,
    gravity: Option<Res<Gravity>>,
    mut ready: MessageWriter<PlayerReady>,
) {
    let size = BodySize::default();

    let character = commands
        .spawn((
            Name::new("Player"),
            Player,
            size,
            Sprite {
                color: Color::srgb(0.9, 0.9, 0.9),
                custom_size: Some(size.0),
                ..default()
            },
            Transform::from_translation(spawn.0.extend(1.0)),
            (
                RigidBody::Dynamic,
                Collider::rectangle(size.0.x, size.0.y),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(1.0),
                Friction::new(0.0),
                CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::SemiSolid]),
            ),
        ))
        .id();

    ready.write(PlayerReady { character });

    if let Some(gravity) = gravity {
        info!(
            "Spawned player {:?}; held jump peaks at {:.2} units",
            character,
            tuning.held_jump_height(gravity.0.length())
        );
    }
}

pub(crate) fn respawn_on_void(
    mut voids: MessageReader<EnteredVoid>,
    spawn: Res<SpawnPoint>,
    mut characters: Query<(&mut Transform, &mut LinearVelocity), With<Player>>,
) {
    for event in voids.read() {
        let Ok((mut transform, mut velocity)) = characters.get_mut(event.character) else {
            continue;
        };
        transform.translation = spawn.0.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;
        info!("Respawned {:?} after falling into the void", event.character);
    }
}
