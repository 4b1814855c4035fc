//! Movement domain: system modules for locomotion updates.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod lifecycle;
pub(crate) mod movement;

pub(crate) use collisions::{probe_ledges, track_ground_contacts};
pub(crate) use input::queue_character_commands;
pub(crate) use lifecycle::{initialize_characters, sync_suspension};
pub(crate) use movement::step_movement;
