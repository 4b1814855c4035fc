//! Movement domain: parking decoded commands until the next fixed tick.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::movement::{CharacterCommand, PendingCommands};

pub(crate) fn queue_character_commands(
    mut commands_in: MessageReader<CharacterCommand>,
    mut pending: Query<&mut PendingCommands>,
) {
    for message in commands_in.read() {
        match pending.get_mut(message.character) {
            Ok(mut queue) => queue.0.push(message.command),
            Err(_) => debug!(
                "Dropping {:?} for {:?}: movement not initialized",
                message.command, message.character
            ),
        }
    }
}
