//! Data definitions for RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization.

use serde::{Deserialize, Serialize};

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Sound clips (sounds.ron)
// ============================================================================

/// Length of a sound clip, used to answer "is this sound still playing".
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SoundClipDef {
    pub id: String,
    /// Seconds.
    pub length: f32,
}
