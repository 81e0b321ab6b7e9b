use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, CompactSave};
use crate::state::TournamentState;

use chrono::{DateTime, TimeZone};
use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::Path;

/// On-disk encoding, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// Pretty JSON document, readable and editable.
    Json,
    /// MessagePack + LZ4 + SHA-256.
    Compact,
}

impl SaveFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SaveFormat::Json,
            _ => SaveFormat::Compact,
        }
    }
}

pub struct SaveManager;

impl SaveManager {
    /// Write `state` to `path` atomically (temp file, then rename).
    pub fn save_to_path(path: &Path, state: &TournamentState) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = Self::encode(SaveFormat::for_path(path), state)?;
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    /// Read a state from `path`.
    pub fn load_from_path(path: &Path) -> Result<TournamentState, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let state = Self::decode(SaveFormat::for_path(path), &data)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(state)
    }

    /// Restore `path` into `state`. On error `state` is unchanged.
    pub fn restore_into(path: &Path, state: &mut TournamentState) -> Result<(), SaveError> {
        let loaded = Self::load_from_path(path)?;
        *state = loaded;
        log::info!("Tournament restored from {:?}", path);
        Ok(())
    }

    pub fn encode(format: SaveFormat, state: &TournamentState) -> Result<Vec<u8>, SaveError> {
        let snapshot = state.to_snapshot();
        match format {
            SaveFormat::Json => Ok(serde_json::to_vec_pretty(&snapshot)?),
            SaveFormat::Compact => serialize_and_compress(&CompactSave::new(snapshot)),
        }
    }

    pub fn decode(format: SaveFormat, data: &[u8]) -> Result<TournamentState, SaveError> {
        let snapshot = match format {
            SaveFormat::Json => serde_json::from_slice(data)?,
            SaveFormat::Compact => decompress_and_deserialize(data)?.snapshot,
        };
        Ok(snapshot.into_state()?)
    }

    /// Download name for a JSON export, e.g. `tournoi_1903_1745.json`.
    pub fn export_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("tournoi_{}.json", now.format("%d%m_%H%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchId;
    use crate::state::tests::{player, scheduled_state};
    use chrono::Utc;
    use tempfile::TempDir;

    fn played_state() -> TournamentState {
        let mut state = scheduled_state();
        let m5 = MatchId::new(5);
        state.award_current_question(m5, &"Elans".into(), &player("Elans", 1)).unwrap();
        state.advance(m5).unwrap();
        state.close_match(MatchId::new(2)).unwrap();
        state
    }

    #[test]
    fn test_json_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tournoi.json");

        let state = played_state();
        SaveManager::save_to_path(&path, &state).unwrap();
        let loaded = SaveManager::load_from_path(&path).unwrap();
        assert_eq!(loaded, state);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"player_scores\""));
    }

    #[test]
    fn test_compact_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("saves").join("tournoi.qsave");

        let state = played_state();
        SaveManager::save_to_path(&path, &state).unwrap();
        assert_eq!(SaveManager::load_from_path(&path).unwrap(), state);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = SaveManager::load_from_path(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SaveError::FileNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_failed_restore_keeps_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, r#"{"teams": [{"Equipe": "A"}], "questions": [], "matches": {}, "player_scores": {}}"#)
            .unwrap();

        let mut state = played_state();
        let before = state.clone();
        let err = SaveManager::restore_into(&path, &mut state).unwrap_err();
        assert!(matches!(err, SaveError::InvalidSnapshot(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SaveFormat::for_path(Path::new("a/b.JSON")), SaveFormat::Json);
        assert_eq!(SaveFormat::for_path(Path::new("a/b.qsave")), SaveFormat::Compact);
        assert_eq!(SaveFormat::for_path(Path::new("noext")), SaveFormat::Compact);
    }

    #[test]
    fn test_export_filename() {
        let now = Utc.with_ymd_and_hms(2026, 3, 19, 17, 45, 0).unwrap();
        assert_eq!(SaveManager::export_filename(&now), "tournoi_1903_1745.json");
    }
}
