//! Movement domain: ledge detection from two foot probes.

use bevy::prelude::*;

/// Which side of the character hangs over empty space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgeSide {
    #[default]
    None,
    Left,
    Right,
}

impl LedgeSide {
    /// Classify from ground hits under the left and right foot.
    pub fn from_feet(left_grounded: bool, right_grounded: bool) -> LedgeSide {
        match (left_grounded, right_grounded) {
            (true, false) => LedgeSide::Right,
            (false, true) => LedgeSide::Left,
            _ => LedgeSide::None,
        }
    }

    /// True when `input` would carry the character off this ledge.
    pub fn blocks(self, input: f32) -> bool {
        match self {
            LedgeSide::Right => input > 0.0,
            LedgeSide::Left => input < 0.0,
            LedgeSide::None => false,
        }
    }
}

/// Latest foot probe results for a character, written by the ledge probe system.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LedgeProbe {
    pub left_grounded: bool,
    pub right_grounded: bool,
}

impl LedgeProbe {
    pub fn side(&self) -> LedgeSide {
        LedgeSide::from_feet(self.left_grounded, self.right_grounded)
    }
}
