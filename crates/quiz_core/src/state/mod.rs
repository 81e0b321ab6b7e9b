//! Tournament session state.
//!
//! `TournamentState` is the aggregate root: roster (with player scores),
//! question bank and the six matches. It is owned by the session and passed
//! by reference to every command; there is no global instance. It converts
//! to and from `TournamentSnapshot` for persistence.

use std::collections::BTreeMap;

use crate::config::PointsScheme;
use crate::engine::{
    self, compute_leaderboard, compute_standings, Award, LeaderboardRow, MatchEngine,
    QuestionCursor, StandingRow,
};
use crate::error::{EntityKind, Result, TournamentError};
use crate::models::{
    Match, MatchId, PlayerId, Question, QuestionBank, Roster, RosterLoadSummary, RosterRecord,
    TeamId,
};
use crate::save::TournamentSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentState {
    pub(crate) roster: Roster,
    pub(crate) questions: QuestionBank,
    pub(crate) matches: BTreeMap<MatchId, Match>,
}

impl TournamentState {
    /// Create a new empty tournament
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Matches in id order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }

    pub fn get_match(&self, id: MatchId) -> Result<&Match> {
        self.matches.get(&id).ok_or_else(|| TournamentError::not_found(EntityKind::Match, id))
    }

    /// Matches still open for play, in id order.
    pub fn active_matches(&self) -> Vec<&Match> {
        self.matches.values().filter(|m| !m.is_finished()).collect()
    }

    // ========================
    // Setup
    // ========================

    pub fn load_roster(&mut self, records: &[RosterRecord]) -> Result<RosterLoadSummary> {
        self.roster.load(records)
    }

    pub fn players_of(&self, team: &TeamId) -> Result<&[PlayerId]> {
        self.roster.players_of(team)
    }

    pub fn load_questions(&mut self, questions: Vec<Question>) -> Result<usize> {
        self.questions.load(questions)
    }

    /// Draw the six matches from the roster's teams, sorted by id.
    pub fn generate_fixtures(&mut self) -> Result<Vec<&Match>> {
        let teams = self.roster.teams();
        self.generate_fixtures_from(&teams)
    }

    /// Draw the six matches from `teams` in the given order. Replaces every
    /// existing match, progress included.
    pub fn generate_fixtures_from(&mut self, teams: &[TeamId]) -> Result<Vec<&Match>> {
        let generated = engine::generate_fixtures(teams)?;
        if !self.matches.is_empty() {
            log::warn!("Replacing {} existing matches", self.matches.len());
        }
        self.matches = generated.into_iter().map(|m| (m.id, m)).collect();
        log::info!("Fixtures generated: {} matches", self.matches.len());
        Ok(self.matches.values().collect())
    }

    // ========================
    // Match commands
    // ========================

    pub fn match_engine(&mut self, id: MatchId) -> Result<MatchEngine<'_>> {
        let fixture = self
            .matches
            .get_mut(&id)
            .ok_or_else(|| TournamentError::not_found(EntityKind::Match, id))?;
        Ok(MatchEngine::new(fixture, &mut self.roster, &self.questions))
    }

    pub fn current_question(&self, id: MatchId) -> Result<QuestionCursor<'_>> {
        let index = self.get_match(id)?.next_question_index();
        Ok(match self.questions.get(index) {
            Some(question) => QuestionCursor::Current { index, question },
            None => QuestionCursor::Exhausted { index },
        })
    }

    pub fn award_points(
        &mut self,
        id: MatchId,
        team: &TeamId,
        player: &PlayerId,
        points: u32,
    ) -> Result<Award> {
        self.match_engine(id)?.award_points(team, player, points)
    }

    pub fn award_current_question(
        &mut self,
        id: MatchId,
        team: &TeamId,
        player: &PlayerId,
    ) -> Result<Award> {
        self.match_engine(id)?.award_current_question(team, player)
    }

    pub fn advance(&mut self, id: MatchId) -> Result<usize> {
        Ok(self.match_engine(id)?.advance())
    }

    pub fn close_match(&mut self, id: MatchId) -> Result<()> {
        self.match_engine(id)?.close()
    }

    // ========================
    // Rankings
    // ========================

    pub fn standings(&self, scheme: &PointsScheme) -> Vec<StandingRow> {
        compute_standings(&self.roster, self.matches.values(), scheme)
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        compute_leaderboard(&self.roster)
    }

    // ========================
    // Persistence
    // ========================

    pub fn to_snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot::from_state(self)
    }

    /// Replace the whole state with `snapshot`. On error nothing changes.
    pub fn restore(&mut self, snapshot: TournamentSnapshot) -> Result<()> {
        let restored = snapshot.into_state()?;
        *self = restored;
        log::info!(
            "State restored: {} teams, {} questions, {} matches",
            self.roster.team_count(),
            self.questions.len(),
            self.matches.len()
        );
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Parse and restore a JSON snapshot. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let snapshot: TournamentSnapshot = serde_json::from_str(json)?;
        self.restore(snapshot)
    }

    /// Back to an empty tournament.
    pub fn reset(&mut self) {
        *self = Self::new();
        log::info!("State reset");
    }
}
