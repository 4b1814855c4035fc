//! Feedback domain: audio and visual effect requests raised by gameplay.
//!
//! Playback, pooling and mixing belong to whoever consumes [`PlayEffect`] and
//! [`PlaySound`]; this domain only carries the requests and remembers which
//! sounds are still running so callers can avoid stacking them.

mod board;
mod events;
mod systems;


pub use board::SoundBoard;
pub use events::{PlayEffect, PlaySound};
pub use systems::FeedbackChannel;

use bevy::prelude::*;

use crate::feedback::systems::{log_feedback_requests, tick_sound_board};

/// Fire-and-forget collaborator for effects and sounds.
pub trait Feedback {
    fn play_effect(&mut self, name: &str, position: Vec2, rotation: f32, scale: f32);
    fn play_sound(&mut self, name: &str);
    fn is_sound_playing(&self, name: &str) -> bool;
}

pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundBoard>()
            .add_message::<PlayEffect>()
            .add_message::<PlaySound>()
            .add_systems(Update, (tick_sound_board, log_feedback_requests));
    }
}
