//! Movement domain: overlap-counting ground sensor.

use bevy::prelude::*;

/// Transition of the grounded flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundEdge {
    Grounded,
    LeftGround,
}

/// What a sensor overlap touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Solid ground or a semi-solid platform.
    Ground,
    /// Fall-death trigger.
    Void,
    Other,
}

/// Ground contacts of one character, fed by its foot sensor.
///
/// Grounded exactly while at least one ground collider overlaps the sensor;
/// edges are queued once per transition and drained by the movement tick.
#[derive(Component, Debug, Default)]
pub struct GroundContact {
    /// Overlapping ground colliders, oldest first.
    contacts: Vec<Entity>,
    pending_edges: Vec<GroundEdge>,
    void_pending: bool,
}

impl GroundContact {
    pub fn is_grounded(&self) -> bool {
        !self.contacts.is_empty()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Most recently entered ground collider that is still touching.
    /// Used only as a lookup key; nothing here owns the collider.
    pub fn current_contact_collider(&self) -> Option<Entity> {
        self.contacts.last().copied()
    }

    /// Record an overlap beginning. Returns the edge if this made the character grounded.
    pub fn contact_begin(&mut self, collider: Entity, kind: SurfaceKind) -> Option<GroundEdge> {
        match kind {
            SurfaceKind::Void => {
                self.void_pending = true;
                None
            }
            SurfaceKind::Other => None,
            SurfaceKind::Ground => {
                if self.contacts.contains(&collider) {
                    return None;
                }
                self.contacts.push(collider);
                if self.contacts.len() == 1 {
                    self.pending_edges.push(GroundEdge::Grounded);
                    Some(GroundEdge::Grounded)
                } else {
                    None
                }
            }
        }
    }

    /// Record an overlap ending. Unknown colliders are ignored, so a contact
    /// released twice (e.g. a disabled platform) cannot drive the count negative.
    pub fn contact_end(&mut self, collider: Entity) -> Option<GroundEdge> {
        let index = self.contacts.iter().position(|c| *c == collider)?;
        self.contacts.remove(index);
        if self.contacts.is_empty() {
            self.pending_edges.push(GroundEdge::LeftGround);
            Some(GroundEdge::LeftGround)
        } else {
            None
        }
    }

    /// Take the edges queued since the last movement tick.
    pub fn drain_edges(&mut self) -> Vec<GroundEdge> {
        std::mem::take(&mut self.pending_edges)
    }

    /// Called once per tick before new overlaps are read, so a void entered on
    /// one tick is reported on the next.
    pub fn take_void_entry(&mut self) -> bool {
        std::mem::take(&mut self.void_pending)
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
        self.pending_edges.clear();
        self.void_pending = false;
    }
}

/// Foot sensor collider; points back at the character it reports for.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundSensor {
    pub owner: Entity,
}
