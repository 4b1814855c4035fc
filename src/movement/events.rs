//! Movement domain: input commands and observable movement events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Decoded player intent. Device bindings live outside this crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementCommand {
    /// Horizontal axis in [-1, 1].
    MoveAxis(f32),
    JumpPressed,
    JumpReleased,
    CrouchHeld(bool),
    DropThroughRequested,
}

/// A command addressed to one character.
#[derive(Debug, Clone, Copy)]
pub struct CharacterCommand {
    pub character: Entity,
    pub command: MovementCommand,
}

impl Message for CharacterCommand {}

/// Sent when a character entity is ready to have movement attached.
/// Sending it more than once for the same entity has no further effect.
#[derive(Debug, Clone, Copy)]
pub struct PlayerReady {
    pub character: Entity,
}

impl Message for PlayerReady {}

/// A jump impulse was applied.
#[derive(Debug, Clone, Copy)]
pub struct JumpStarted {
    pub character: Entity,
}

impl Message for JumpStarted {}

/// Jump released while rising; the ascent was cut short.
#[derive(Debug, Clone, Copy)]
pub struct JumpEnded {
    pub character: Entity,
}

impl Message for JumpEnded {}

#[derive(Debug, Clone, Copy)]
pub struct Landed {
    pub character: Entity,
}

impl Message for Landed {}

/// Horizontal input went from idle to non-zero.
#[derive(Debug, Clone, Copy)]
pub struct MoveStarted {
    pub character: Entity,
}

impl Message for MoveStarted {}

/// The character's sensor entered a fall-death zone (reported one tick late).
#[derive(Debug, Clone, Copy)]
pub struct EnteredVoid {
    pub character: Entity,
}

impl Message for EnteredVoid {}

/// Request to let a character fall through the semi-solid platform it stands on.
#[derive(Debug, Clone, Copy)]
pub struct DropThroughRequest {
    pub character: Entity,
    pub collider: Entity,
}

impl Message for DropThroughRequest {}
