//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::MovementCommand;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Solid ground, including moving platforms
    Ground,
    /// One-way platforms the player can drop through
    SemiSolid,
    /// Fall-death trigger zones
    Void,
    /// Player body and foot sensor
    Player,
}

/// Marker for a controllable character.
#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for fall-death trigger colliders
#[derive(Component, Debug)]
pub struct VoidZone;

/// Commands waiting for the next fixed tick.
///
/// Several rendered frames can pass without a fixed tick, longer than a
/// message stays readable, so commands are parked on the character.
#[derive(Component, Debug, Default)]
pub struct PendingCommands(pub Vec<MovementCommand>);

/// While present, the character's movement is halted and ignores ticks.
#[derive(Component, Debug, Default)]
pub struct MovementSuspended;

/// Links a character to its foot sensor entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct SensorLink(pub Entity);

/// Character body size, used to place the foot sensor.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodySize(pub Vec2);

impl Default for BodySize {
    fn default() -> Self {
        Self(Vec2::new(0.8, 1.6))
    }
}
