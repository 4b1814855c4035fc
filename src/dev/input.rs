//! Dev domain: keyboard sampling into movement commands.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::{CharacterCommand, MovementCommand, MovementState, Player};

/// Last held values sent, so axis and crouch are only sent on change.
#[derive(Default)]
pub(crate) struct SentInput {
    axis: f32,
    crouch: bool,
}

pub(crate) fn send_keyboard_commands(
    keyboard: Res<ButtonInput<KeyCode>>,
    players: Query<Entity, (With<Player>, With<MovementState>)>,
    mut sent: Local<SentInput>,
    mut writer: MessageWriter<CharacterCommand>,
) {
    let Some(character) = players.iter().next() else {
        return;
    };
    let mut send = |command| {
        writer.write(CharacterCommand { character, command });
    };

    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }
    if x != sent.axis {
        sent.axis = x;
        send(MovementCommand::MoveAxis(x));
    }

    let crouch = keyboard.pressed(KeyCode::KeyC) || keyboard.pressed(KeyCode::ControlLeft);
    if crouch != sent.crouch {
        sent.crouch = crouch;
        send(MovementCommand::CrouchHeld(crouch));
    }

    if keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyK) {
        send(MovementCommand::JumpPressed);
    }
    if keyboard.just_released(KeyCode::Space) || keyboard.just_released(KeyCode::KeyK) {
        send(MovementCommand::JumpReleased);
    }

    if keyboard.just_pressed(KeyCode::KeyS) || keyboard.just_pressed(KeyCode::ArrowDown) {
        send(MovementCommand::DropThroughRequested);
    }
}
