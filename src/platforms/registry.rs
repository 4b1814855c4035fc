//! Platforms domain: lookup from contact colliders to the platform that owns them.

use bevy::prelude::*;
use std::collections::HashMap;

/// Non-owning map from collider entity to moving platform entity.
#[derive(Resource, Debug, Default)]
pub struct PlatformRegistry {
    by_collider: HashMap<Entity, Entity>,
}

impl PlatformRegistry {
    pub fn register(&mut self, collider: Entity, platform: Entity) {
        self.by_collider.insert(collider, platform);
    }

    pub fn unregister_collider(&mut self, collider: Entity) {
        self.by_collider.remove(&collider);
    }

    /// Drop the platform and every collider pointing at it.
    pub fn unregister_platform(&mut self, platform: Entity) {
        self.by_collider.retain(|_, owner| *owner != platform);
    }

    pub fn platform_for(&self, collider: Entity) -> Option<Entity> {
        self.by_collider.get(&collider).copied()
    }

    pub fn len(&self) -> usize {
        self.by_collider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_collider.is_empty()
    }
}
