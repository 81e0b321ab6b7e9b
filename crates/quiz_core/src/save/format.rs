use super::error::SaveError;
use super::SNAPSHOT_VERSION;
use crate::error::{Result, TournamentError};
use crate::models::{
    Match, MatchId, MatchStatus, PlayerId, Question, QuestionBank, Roster, RosterRecord, TeamId,
};
use crate::state::TournamentState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};

/// Flat session document, the layout the operator console exports.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TournamentSnapshot {
    /// Roster rows (`Equipe`, `Joueur`)
    pub teams: Vec<RosterRecord>,

    /// Question rows in serving order
    pub questions: Vec<Question>,

    pub matches: BTreeMap<MatchId, MatchEntry>,

    pub player_scores: BTreeMap<PlayerId, u32>,

    /// Absent in documents written before progress tracking existed.
    #[serde(default)]
    pub match_progress: BTreeMap<MatchId, MatchProgress>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    pub teams: Vec<TeamId>,
    pub scores: BTreeMap<TeamId, u32>,
    #[serde(default)]
    pub status: MatchStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchProgress {
    pub q_idx: usize,
}

impl TournamentSnapshot {
    pub fn from_state(state: &TournamentState) -> Self {
        let matches = state
            .matches()
            .map(|m| {
                let entry = MatchEntry {
                    teams: m.teams.to_vec(),
                    scores: m.scores().map(|(t, s)| (t.clone(), s)).collect(),
                    status: m.status(),
                };
                (m.id, entry)
            })
            .collect();

        let match_progress = state
            .matches()
            .map(|m| (m.id, MatchProgress { q_idx: m.next_question_index() }))
            .collect();

        Self {
            teams: state.roster().records(),
            questions: state.questions().questions().to_vec(),
            matches,
            player_scores: state.roster().scores().clone(),
            match_progress,
        }
    }

    /// Build a fresh state from the document, validating everything first.
    pub fn into_state(self) -> Result<TournamentState> {
        let mut roster = Roster::new();
        roster.load(&self.teams)?;
        for (player, score) in &self.player_scores {
            roster.set_score(player, *score);
        }

        let mut questions = QuestionBank::new();
        questions.load(self.questions)?;

        // empty before the draw; otherwise ids stay within the 6 drawn matches
        if let Some(id) = self.matches.keys().find(|id| !id.is_valid()) {
            return Err(TournamentError::validation(format!(
                "match id {} is out of range 1..={}",
                id,
                MatchId::LAST
            )));
        }

        for id in self.match_progress.keys() {
            if !self.matches.contains_key(id) {
                log::warn!("Ignoring progress for unknown match {}", id);
            }
        }

        let mut matches = BTreeMap::new();
        for (id, entry) in self.matches {
            let cursor = self.match_progress.get(&id).map(|p| p.q_idx).unwrap_or(0);
            matches.insert(id, entry.into_match(id, cursor)?);
        }

        Ok(TournamentState { roster, questions, matches })
    }
}

impl MatchEntry {
    fn into_match(self, id: MatchId, cursor: usize) -> Result<Match> {
        let teams: [TeamId; 3] = self.teams.try_into().map_err(|teams: Vec<TeamId>| {
            TournamentError::validation(format!(
                "match {} must have exactly 3 teams, found {}",
                id,
                teams.len()
            ))
        })?;

        let distinct: BTreeSet<&TeamId> = teams.iter().collect();
        if distinct.len() != 3 {
            return Err(TournamentError::validation(format!("match {} lists a team twice", id)));
        }

        if let Some(stray) = self.scores.keys().find(|t| !teams.contains(t)) {
            return Err(TournamentError::validation(format!(
                "match {} has a score for '{}' who does not play in it",
                id, stray
            )));
        }

        let scores = [0, 1, 2].map(|slot| self.scores.get(&teams[slot]).copied().unwrap_or(0));
        Ok(Match::restore(id, teams, scores, self.status, cursor))
    }
}

/// Binary save: MessagePack + LZ4 around the same snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompactSave {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub snapshot: TournamentSnapshot,
}

impl CompactSave {
    pub fn new(snapshot: TournamentSnapshot) -> Self {
        Self { version: SNAPSHOT_VERSION, saved_at: Utc::now(), snapshot }
    }
}

const CHECKSUM_LEN: usize = 32;

/// Serialize, compress and append a SHA-256 checksum.
pub fn serialize_and_compress(save: &CompactSave) -> std::result::Result<Vec<u8>, SaveError> {
    let msgpack = to_vec_named(save)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

/// Verify, decompress and deserialize a compact save.
pub fn decompress_and_deserialize(bytes: &[u8]) -> std::result::Result<CompactSave, SaveError> {
    // size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SaveError::Corrupted);
    }

    let (data, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let mut hasher = Sha256::new();
    hasher.update(data);
    if hasher.finalize().as_slice() != checksum {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(data).map_err(|_| SaveError::Decompression)?;
    let save: CompactSave = from_slice(&msgpack)?;

    if save.version != SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch { found: save.version, expected: SNAPSHOT_VERSION });
    }
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{player, scheduled_state};
    use insta::assert_json_snapshot;

    fn tiny_state() -> TournamentState {
        let mut state = TournamentState::new();
        state.load_roster(&[RosterRecord::new("Lynx", "Alice")]).unwrap();
        state
            .load_questions(vec![Question {
                round: "Manche 1".to_string(),
                category: "Geographie".to_string(),
                text: "Capitale du Canada ?".to_string(),
                points: 10,
                time_limit_secs: 30,
                instruction: None,
            }])
            .unwrap();
        state
    }

    #[test]
    fn test_document_layout() {
        assert_json_snapshot!(TournamentSnapshot::from_state(&tiny_state()), @r###"
        {
          "teams": [
            {
              "Equipe": "Lynx",
              "Joueur": "Alice"
            }
          ],
          "questions": [
            {
              "Manche": "Manche 1",
              "Rubrique": "Geographie",
              "Question": "Capitale du Canada ?",
              "Points": 10,
              "Temps": 30,
              "Consigne": null
            }
          ],
          "matches": {},
          "player_scores": {
            "Alice": 0
          },
          "match_progress": {}
        }
        "###);
    }

    #[test]
    fn test_match_entry_shape() {
        let mut state = scheduled_state();
        state.advance(MatchId::new(2)).unwrap();
        let value = serde_json::to_value(state.to_snapshot()).unwrap();

        assert_eq!(value["matches"]["1"]["teams"][0], "Aigles");
        assert_eq!(value["matches"]["1"]["scores"]["Barracudas"], 0);
        assert_eq!(value["matches"]["1"]["status"], "Prévu");
        assert_eq!(value["match_progress"]["2"]["q_idx"], 1);
    }

    #[test]
    fn test_missing_progress_defaults_to_start() {
        let state = scheduled_state();
        let mut value = serde_json::to_value(state.to_snapshot()).unwrap();
        value.as_object_mut().unwrap().remove("match_progress");

        let snapshot: TournamentSnapshot = serde_json::from_value(value).unwrap();
        let restored = snapshot.into_state().unwrap();
        assert!(restored.matches().all(|m| m.next_question_index() == 0));
        assert_eq!(restored, state);
    }

    #[test]
    fn test_match_with_two_teams_rejected() {
        let state = scheduled_state();
        let mut snapshot = state.to_snapshot();
        snapshot.matches.get_mut(&MatchId::new(1)).unwrap().teams.pop();
        let err = snapshot.into_state().unwrap_err();
        assert!(err.to_string().contains("exactly 3 teams"));
    }

    #[test]
    fn test_match_id_out_of_range_rejected() {
        let state = scheduled_state();
        for bad in [0, 42] {
            let mut snapshot = state.to_snapshot();
            let entry = snapshot.matches.remove(&MatchId::new(1)).unwrap();
            snapshot.matches.insert(MatchId::new(bad), entry);
            assert!(matches!(snapshot.into_state(), Err(TournamentError::Validation(_))));
        }

        let mut restored = state.clone();
        let json = r#"{"teams":[],"questions":[],"player_scores":{},
            "matches":{"0":{"teams":["A","B","C"],"scores":{}},"42":{"teams":["D","E","F"],"scores":{}}}}"#;
        assert!(restored.import_json(json).is_err());
        assert_eq!(restored, state);
    }

    #[test]
    fn test_empty_matches_allowed() {
        let mut snapshot = scheduled_state().to_snapshot();
        snapshot.matches.clear();
        snapshot.match_progress.clear();
        let state = snapshot.into_state().unwrap();
        assert_eq!(state.matches().count(), 0);
    }

    #[test]
    fn test_stray_score_rejected() {
        let state = scheduled_state();
        let mut snapshot = state.to_snapshot();
        snapshot
            .matches
            .get_mut(&MatchId::new(1))
            .unwrap()
            .scores
            .insert(TeamId::from("Ibis"), 5);
        assert!(matches!(snapshot.into_state(), Err(TournamentError::Validation(_))));
    }

    #[test]
    fn test_english_status_accepted() {
        let json = r#"{"teams":[{"Equipe":"A","Joueur":"a"},{"Equipe":"B","Joueur":"b"},{"Equipe":"C","Joueur":"c"}],
            "questions":[],
            "matches":{"1":{"teams":["A","B","C"],"scores":{"A":4,"B":0,"C":2},"status":"Finished"}},
            "player_scores":{"a":4,"c":2}}"#;
        let snapshot: TournamentSnapshot = serde_json::from_str(json).unwrap();
        let state = snapshot.into_state().unwrap();
        let m = state.get_match(MatchId::new(1)).unwrap();
        assert!(m.is_finished());
        assert_eq!(m.score_of(&"A".into()), Some(4));
        assert_eq!(state.roster().score_of(&"b".into()), 0);
    }

    #[test]
    fn test_compact_round_trip() {
        let mut state = scheduled_state();
        state
            .award_points(MatchId::new(6), &"Castors".into(), &player("Castors", 2), 12)
            .unwrap();
        let save = CompactSave::new(state.to_snapshot());

        let bytes = serialize_and_compress(&save).unwrap();
        let loaded = decompress_and_deserialize(&bytes).unwrap();
        assert_eq!(loaded.snapshot.into_state().unwrap(), state);
    }

    #[test]
    fn test_compact_detects_tampering() {
        let save = CompactSave::new(tiny_state().to_snapshot());
        let mut bytes = serialize_and_compress(&save).unwrap();
        bytes[5] ^= 0xff;
        assert!(matches!(decompress_and_deserialize(&bytes), Err(SaveError::ChecksumMismatch)));
        assert!(matches!(decompress_and_deserialize(&[0u8; 8]), Err(SaveError::Corrupted)));
    }
}
