use super::ids::{MatchId, TeamId};
use serde::{Deserialize, Serialize};

/// Persisted match status. "In progress" is not a status: it is a
/// Scheduled match whose cursor is still inside the question sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MatchStatus {
    #[default]
    #[serde(rename = "Prévu", alias = "Scheduled")]
    Scheduled,
    #[serde(rename = "Terminé", alias = "Finished")]
    Finished,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "Scheduled"),
            MatchStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// One three-team match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub teams: [TeamId; 3],
    /// Parallel to `teams`.
    pub(crate) scores: [u32; 3],
    pub(crate) status: MatchStatus,
    pub(crate) next_question_index: usize,
}

impl Match {
    pub fn new(id: MatchId, teams: [TeamId; 3]) -> Self {
        Self { id, teams, scores: [0; 3], status: MatchStatus::Scheduled, next_question_index: 0 }
    }

    pub(crate) fn restore(
        id: MatchId,
        teams: [TeamId; 3],
        scores: [u32; 3],
        status: MatchStatus,
        next_question_index: usize,
    ) -> Self {
        Self { id, teams, scores, status, next_question_index }
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn next_question_index(&self) -> usize {
        self.next_question_index
    }

    pub fn slot_of(&self, team: &TeamId) -> Option<usize> {
        self.teams.iter().position(|t| t == team)
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        self.slot_of(team).is_some()
    }

    pub fn score_of(&self, team: &TeamId) -> Option<u32> {
        self.slot_of(team).map(|slot| self.scores[slot])
    }

    /// (team, score) in fixture order.
    pub fn scores(&self) -> impl Iterator<Item = (&TeamId, u32)> {
        self.teams.iter().zip(self.scores.iter().copied())
    }

    /// "A vs B vs C"
    pub fn label(&self) -> String {
        self.teams.iter().map(TeamId::as_str).collect::<Vec<_>>().join(" vs ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_starts_clean() {
        let m = Match::new(MatchId::new(1), ["A".into(), "B".into(), "C".into()]);
        assert_eq!(m.status(), MatchStatus::Scheduled);
        assert_eq!(m.next_question_index(), 0);
        assert!(m.scores().all(|(_, s)| s == 0));
        assert_eq!(m.label(), "A vs B vs C");
        assert_eq!(m.score_of(&"D".into()), None);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(serde_json::to_string(&MatchStatus::Scheduled).unwrap(), "\"Prévu\"");
        assert_eq!(serde_json::to_string(&MatchStatus::Finished).unwrap(), "\"Terminé\"");
        let s: MatchStatus = serde_json::from_str("\"Finished\"").unwrap();
        assert_eq!(s, MatchStatus::Finished);
    }
}
