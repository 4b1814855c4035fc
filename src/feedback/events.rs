//! Feedback domain: effect and sound request messages.

use bevy::ecs::message::Message;
use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayEffect {
    pub name: String,
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub scale: f32,
}

impl Message for PlayEffect {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaySound {
    pub name: String,
}

impl Message for PlaySound {}
