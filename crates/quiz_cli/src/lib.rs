//! Operator console library
//!
//! CSV import, session file handling and text reports used by the `quiz`
//! binary.

pub mod import;
pub mod report;

use anyhow::{Context, Result};
use quiz_core::{SaveError, SaveManager, TournamentState};
use std::path::Path;

pub use import::{read_questions_csv, read_roster_csv, ParseStats};

/// Load the session file, or start empty if it does not exist yet.
pub fn load_session(path: &Path) -> Result<TournamentState> {
    match SaveManager::load_from_path(path) {
        Ok(state) => Ok(state),
        Err(SaveError::FileNotFound { .. }) => {
            log::info!("No session at {}, starting empty", path.display());
            Ok(TournamentState::new())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load session: {}", path.display())),
    }
}

pub fn save_session(path: &Path, state: &TournamentState) -> Result<()> {
    SaveManager::save_to_path(path, state)
        .with_context(|| format!("Failed to save session: {}", path.display()))
}
