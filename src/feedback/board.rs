//! Feedback domain: bookkeeping of sounds that are currently audible.

use bevy::prelude::*;
use std::collections::HashMap;

/// Assumed clip length for sounds without a configured length.
const DEFAULT_CLIP_LENGTH: f32 = 0.25;

#[derive(Resource, Debug)]
pub struct SoundBoard {
    clip_lengths: HashMap<String, f32>,
    default_length: f32,
    /// Sound id -> seconds left.
    playing: HashMap<String, f32>,
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self {
            clip_lengths: HashMap::new(),
            default_length: DEFAULT_CLIP_LENGTH,
            playing: HashMap::new(),
        }
    }
}

impl SoundBoard {
    pub fn set_clip_length(&mut self, id: impl Into<String>, seconds: f32) {
        self.clip_lengths.insert(id.into(), seconds.max(0.0));
    }

    pub fn clip_length(&self, id: &str) -> f32 {
        self.clip_lengths
            .get(id)
            .copied()
            .unwrap_or(self.default_length)
    }

    /// Mark `id` as playing from now. Restarting a running sound rewinds it.
    pub fn start(&mut self, id: &str) {
        let length = self.clip_length(id);
        if length > 0.0 {
            self.playing.insert(id.to_string(), length);
        }
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.playing.contains_key(id)
    }

    pub fn tick(&mut self, dt: f32) {
        self.playing.retain(|_, left| {
            *left -= dt;
            *left > 0.0
        });
    }

    pub fn stop_all(&mut self) {
        self.playing.clear();
    }
}
