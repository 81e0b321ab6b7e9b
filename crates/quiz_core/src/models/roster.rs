//! Roster store: teams, their players and every player's cumulative score.

use super::ids::{PlayerId, TeamId};
use crate::error::{EntityKind, Result, TournamentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the roster file (`Equipe`, `Joueur`).
///
/// Both fields are optional on the wire so that a missing value is reported
/// as a validation error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    #[serde(rename = "Equipe", default)]
    pub team: Option<String>,
    #[serde(rename = "Joueur", default)]
    pub player: Option<String>,
}

impl RosterRecord {
    pub fn new(team: impl Into<String>, player: impl Into<String>) -> Self {
        Self { team: Some(team.into()), player: Some(player.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Import order; membership is what matters.
    pub players: Vec<PlayerId>,
}

/// Read-only projection of a rostered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player<'a> {
    pub id: &'a PlayerId,
    pub team: &'a TeamId,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterLoadSummary {
    pub teams: usize,
    pub players: usize,
    pub new_players: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    teams: BTreeMap<TeamId, Team>,
    player_team: BTreeMap<PlayerId, TeamId>,
    /// (team, player) rows in import order, duplicates collapsed.
    rows: Vec<(TeamId, PlayerId)>,
    /// Cumulative scores; survives re-imports.
    scores: BTreeMap<PlayerId, u32>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster with `records`.
    ///
    /// Either every record is accepted or the roster is left untouched.
    /// Players seen for the first time start at 0; a player who was already
    /// scored keeps the score.
    pub fn load(&mut self, records: &[RosterRecord]) -> Result<RosterLoadSummary> {
        let mut teams: BTreeMap<TeamId, Team> = BTreeMap::new();
        let mut player_team: BTreeMap<PlayerId, TeamId> = BTreeMap::new();
        let mut rows = Vec::with_capacity(records.len());

        for (line, record) in records.iter().enumerate() {
            let team = required_field(record.team.as_deref(), "Equipe", line)?;
            let player = required_field(record.player.as_deref(), "Joueur", line)?;
            let team = TeamId::new(team);
            let player = PlayerId::new(player);

            if let Some(existing) = player_team.get(&player) {
                if *existing == team {
                    continue;
                }
                return Err(TournamentError::validation(format!(
                    "record {}: player '{}' already belongs to team '{}', cannot join '{}'",
                    line + 1,
                    player,
                    existing,
                    team
                )));
            }

            teams
                .entry(team.clone())
                .or_insert_with(|| Team { id: team.clone(), players: Vec::new() })
                .players
                .push(player.clone());
            player_team.insert(player.clone(), team.clone());
            rows.push((team, player));
        }

        let mut new_players = 0;
        for player in player_team.keys() {
            if !self.scores.contains_key(player) {
                self.scores.insert(player.clone(), 0);
                new_players += 1;
            }
        }

        let summary = RosterLoadSummary { teams: teams.len(), players: player_team.len(), new_players };
        self.teams = teams;
        self.player_team = player_team;
        self.rows = rows;

        log::info!(
            "Roster loaded: {} teams, {} players ({} new)",
            summary.teams,
            summary.players,
            summary.new_players
        );
        Ok(summary)
    }

    pub fn players_of(&self, team: &TeamId) -> Result<&[PlayerId]> {
        self.teams
            .get(team)
            .map(|t| t.players.as_slice())
            .ok_or_else(|| TournamentError::not_found(EntityKind::Team, team))
    }

    pub fn team_of(&self, player: &PlayerId) -> Option<&TeamId> {
        self.player_team.get(player)
    }

    pub fn contains_team(&self, team: &TeamId) -> bool {
        self.teams.contains_key(team)
    }

    /// Distinct team ids, ascending.
    pub fn teams(&self) -> Vec<TeamId> {
        self.teams.keys().cloned().collect()
    }

    pub fn team(&self, team: &TeamId) -> Option<&Team> {
        self.teams.get(team)
    }

    pub fn players(&self) -> impl Iterator<Item = Player<'_>> {
        self.player_team.iter().map(|(id, team)| Player { id, team, score: self.score_of(id) })
    }

    pub fn score_of(&self, player: &PlayerId) -> u32 {
        self.scores.get(player).copied().unwrap_or(0)
    }

    pub fn scores(&self) -> &BTreeMap<PlayerId, u32> {
        &self.scores
    }

    /// Score the player would have after `points`, without applying it.
    pub(crate) fn checked_credit(&self, player: &PlayerId, points: u32) -> Result<u32> {
        self.score_of(player).checked_add(points).ok_or_else(|| {
            TournamentError::validation(format!("score overflow for player '{}'", player))
        })
    }

    pub(crate) fn set_score(&mut self, player: &PlayerId, score: u32) {
        self.scores.insert(player.clone(), score);
    }

    pub fn records(&self) -> Vec<RosterRecord> {
        self.rows.iter().map(|(team, player)| RosterRecord::new(team.as_str(), player.as_str())).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

fn required_field<'a>(value: Option<&'a str>, column: &str, line: usize) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(TournamentError::validation(format!(
            "record {}: missing value for '{}'",
            line + 1,
            column
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<RosterRecord> {
        vec![
            RosterRecord::new("Lynx", "Alice"),
            RosterRecord::new("Lynx", "Bruno"),
            RosterRecord::new("Ours", "Chloe"),
        ]
    }

    #[test]
    fn test_load_and_lookup() {
        let mut roster = Roster::new();
        let summary = roster.load(&records()).unwrap();
        assert_eq!(summary, RosterLoadSummary { teams: 2, players: 3, new_players: 3 });

        let lynx = roster.players_of(&TeamId::from("Lynx")).unwrap();
        assert_eq!(lynx, &[PlayerId::from("Alice"), PlayerId::from("Bruno")]);
        assert_eq!(roster.team_of(&PlayerId::from("Chloe")), Some(&TeamId::from("Ours")));
        assert_eq!(roster.teams(), vec![TeamId::from("Lynx"), TeamId::from("Ours")]);
    }

    #[test]
    fn test_unknown_team_is_not_found() {
        let mut roster = Roster::new();
        roster.load(&records()).unwrap();
        let err = roster.players_of(&TeamId::from("Aigles")).unwrap_err();
        assert!(matches!(err, TournamentError::NotFound { kind: EntityKind::Team, .. }));
    }

    #[test]
    fn test_missing_field_rejects_whole_import() {
        let mut roster = Roster::new();
        roster.load(&records()).unwrap();

        let bad = vec![
            RosterRecord::new("Aigles", "Denis"),
            RosterRecord { team: Some("Aigles".to_string()), player: None },
        ];
        let err = roster.load(&bad).unwrap_err();
        assert!(matches!(err, TournamentError::Validation(_)));

        // previous roster untouched
        assert!(roster.contains_team(&TeamId::from("Lynx")));
        assert!(!roster.contains_team(&TeamId::from("Aigles")));
    }

    #[test]
    fn test_blank_team_is_missing() {
        let mut roster = Roster::new();
        let err = roster.load(&[RosterRecord::new("  ", "Alice")]).unwrap_err();
        assert!(err.to_string().contains("Equipe"));
    }

    #[test]
    fn test_player_on_two_teams_rejected() {
        let mut roster = Roster::new();
        let err = roster
            .load(&[RosterRecord::new("Lynx", "Alice"), RosterRecord::new("Ours", "Alice")])
            .unwrap_err();
        assert!(matches!(err, TournamentError::Validation(_)));
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let mut roster = Roster::new();
        roster
            .load(&[RosterRecord::new("Lynx", "Alice"), RosterRecord::new("Lynx", "Alice")])
            .unwrap();
        assert_eq!(roster.records().len(), 1);
        assert_eq!(roster.players_of(&TeamId::from("Lynx")).unwrap().len(), 1);
    }

    #[test]
    fn test_reimport_keeps_scores() {
        let mut roster = Roster::new();
        roster.load(&records()).unwrap();
        roster.set_score(&PlayerId::from("Alice"), 30);

        let summary = roster
            .load(&[RosterRecord::new("Lynx", "Alice"), RosterRecord::new("Lynx", "Emile")])
            .unwrap();
        assert_eq!(summary.new_players, 1);
        assert_eq!(roster.score_of(&PlayerId::from("Alice")), 30);
        assert_eq!(roster.score_of(&PlayerId::from("Emile")), 0);
    }
}
