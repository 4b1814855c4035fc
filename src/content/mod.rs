//! Content domain: data-driven movement tuning and sound clip lengths.
//!
//! Files live under [`ContentPaths::base`] and are read once at startup.
//! Anything missing or invalid falls back to built-in defaults with a warning.

mod data;
mod loader;
mod validation;


pub use data::{DataFile, SoundClipDef};
pub use loader::{
    ContentLoadError, MOVEMENT_FILE, SOUNDS_FILE, load_data_file, load_single_file,
    load_sound_clips, load_tuning, parse_data_file, parse_single,
};
pub use validation::{TuningIssue, validate_sound_clips, validate_tuning};

use bevy::prelude::*;
use std::path::PathBuf;

use crate::feedback::SoundBoard;
use crate::movement::MovementTuning;

/// Where content files are read from.
#[derive(Resource, Debug, Clone)]
pub struct ContentPaths {
    pub base: PathBuf,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            base: PathBuf::from("assets/data"),
        }
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPaths>()
            .init_resource::<MovementTuning>()
            .add_systems(Startup, load_content);
    }
}

/// Load tuning and sound lengths, keeping defaults for anything that fails.
pub(crate) fn load_content(
    paths: Res<ContentPaths>,
    mut tuning: ResMut<MovementTuning>,
    board: Option<ResMut<SoundBoard>>,
) {
    match load_tuning(&paths.base) {
        Ok(loaded) => {
            let issues = validate_tuning(&loaded);
            if issues.is_empty() {
                *tuning = loaded;
                info!("Loaded movement tuning from {:?}", paths.base);
            } else {
                for issue in &issues {
                    warn!("{}", issue);
                }
                warn!(
                    "Movement tuning has {} invalid field(s), using defaults",
                    issues.len()
                );
            }
        }
        Err(e) => warn!("{}, using default movement tuning", e),
    }

    let Some(mut board) = board else {
        debug!("No SoundBoard present, skipping sound clip lengths");
        return;
    };

    match load_sound_clips(&paths.base) {
        Ok(clips) => {
            for problem in validate_sound_clips(&clips) {
                warn!("{}", problem);
            }
            for clip in &clips {
                board.set_clip_length(clip.id.clone(), clip.length);
            }
            info!("Loaded {} sound clip length(s)", clips.len());
        }
        Err(e) => warn!("{}, using default clip lengths", e),
    }
}
