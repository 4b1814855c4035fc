//! Feedback domain: request channel and bookkeeping systems.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::feedback::{Feedback, PlayEffect, PlaySound, SoundBoard};

/// [`Feedback`] backed by messages, usable as a system parameter.
#[derive(SystemParam)]
pub struct FeedbackChannel<'w> {
    effects: MessageWriter<'w, PlayEffect>,
    sounds: MessageWriter<'w, PlaySound>,
    board: ResMut<'w, SoundBoard>,
}

impl Feedback for FeedbackChannel<'_> {
    fn play_effect(&mut self, name: &str, position: Vec2, rotation: f32, scale: f32) {
        self.effects.write(PlayEffect {
            name: name.to_string(),
            position,
            rotation,
            scale,
        });
    }

    fn play_sound(&mut self, name: &str) {
        self.board.start(name);
        self.sounds.write(PlaySound {
            name: name.to_string(),
        });
    }

    fn is_sound_playing(&self, name: &str) -> bool {
        self.board.is_playing(name)
    }
}

pub(crate) fn tick_sound_board(time: Res<Time>, mut board: ResMut<SoundBoard>) {
    board.tick(time.delta_secs());
}

pub(crate) fn log_feedback_requests(
    mut effects: MessageReader<PlayEffect>,
    mut sounds: MessageReader<PlaySound>,
) {
    for effect in effects.read() {
        debug!(
            "[FEEDBACK] effect '{}' at ({:.2}, {:.2}) scale={}",
            effect.name, effect.position.x, effect.position.y, effect.scale
        );
    }
    for sound in sounds.read() {
        debug!("[FEEDBACK] sound '{}'", sound.name);
    }
}
