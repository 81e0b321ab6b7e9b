//! Per-match question progression and scoring.

use crate::error::{Result, TournamentError};
use crate::models::{Match, MatchStatus, PlayerId, Question, QuestionBank, Roster, TeamId};
use serde::Serialize;

/// Where a match's cursor points in the shared question sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCursor<'q> {
    Current { index: usize, question: &'q Question },
    /// Cursor at or past the end of the sequence. A signal, not a fault.
    Exhausted { index: usize },
}

impl<'q> QuestionCursor<'q> {
    pub fn question(&self) -> Option<&'q Question> {
        match self {
            QuestionCursor::Current { question, .. } => Some(question),
            QuestionCursor::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, QuestionCursor::Exhausted { .. })
    }
}

/// Result of a successful award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub team: TeamId,
    pub player: PlayerId,
    pub points: u32,
    pub team_score: u32,
    pub player_score: u32,
}

/// Drives one match. Borrows the match record mutably together with the
/// roster (for player scores) and the question bank (read-only).
pub struct MatchEngine<'a> {
    fixture: &'a mut Match,
    roster: &'a mut Roster,
    questions: &'a QuestionBank,
}

impl<'a> MatchEngine<'a> {
    pub fn new(fixture: &'a mut Match, roster: &'a mut Roster, questions: &'a QuestionBank) -> Self {
        Self { fixture, roster, questions }
    }

    pub fn fixture(&self) -> &Match {
        self.fixture
    }

    pub fn current_question(&self) -> QuestionCursor<'a> {
        let index = self.fixture.next_question_index;
        match self.questions.get(index) {
            Some(question) => QuestionCursor::Current { index, question },
            None => QuestionCursor::Exhausted { index },
        }
    }

    /// Credit `points` to `team` in this match and to `player`'s cumulative
    /// score. Every check runs before either score moves.
    pub fn award_points(&mut self, team: &TeamId, player: &PlayerId, points: u32) -> Result<Award> {
        if self.fixture.is_finished() {
            return Err(TournamentError::InvalidState(format!(
                "match {} is finished, no more points can be awarded",
                self.fixture.id
            )));
        }
        if points == 0 {
            return Err(TournamentError::validation("awarded points must be positive"));
        }

        let slot = self.fixture.slot_of(team).ok_or_else(|| {
            TournamentError::validation(format!(
                "team '{}' does not play in match {}",
                team, self.fixture.id
            ))
        })?;

        match self.roster.team_of(player) {
            Some(owner) if owner == team => {}
            Some(owner) => {
                return Err(TournamentError::validation(format!(
                    "player '{}' plays for '{}', not '{}'",
                    player, owner, team
                )))
            }
            None => {
                return Err(TournamentError::validation(format!(
                    "player '{}' is not on the roster",
                    player
                )))
            }
        }

        let team_score = self.fixture.scores[slot].checked_add(points).ok_or_else(|| {
            TournamentError::validation(format!("score overflow for team '{}'", team))
        })?;
        let player_score = self.roster.checked_credit(player, points)?;

        self.fixture.scores[slot] = team_score;
        self.roster.set_score(player, player_score);

        log::info!(
            "Match {}: +{} to {} ({}), team score {}",
            self.fixture.id,
            points,
            player,
            team,
            team_score
        );
        Ok(Award { team: team.clone(), player: player.clone(), points, team_score, player_score })
    }

    /// Award the current question's point value.
    pub fn award_current_question(&mut self, team: &TeamId, player: &PlayerId) -> Result<Award> {
        let points = match self.current_question() {
            QuestionCursor::Current { question, .. } => question.points,
            QuestionCursor::Exhausted { index } => {
                return Err(TournamentError::Exhausted {
                    match_id: self.fixture.id.to_string(),
                    cursor: index,
                })
            }
        };
        self.award_points(team, player, points)
    }

    /// Move to the next question. No bound check: past the end the cursor
    /// simply reports `Exhausted`.
    pub fn advance(&mut self) -> usize {
        self.fixture.next_question_index = self.fixture.next_question_index.saturating_add(1);
        log::debug!(
            "Match {}: cursor -> {}",
            self.fixture.id,
            self.fixture.next_question_index
        );
        self.fixture.next_question_index
    }

    /// Scheduled -> Finished. Closing twice is rejected.
    pub fn close(&mut self) -> Result<()> {
        if self.fixture.is_finished() {
            return Err(TournamentError::InvalidState(format!(
                "match {} is already finished",
                self.fixture.id
            )));
        }
        self.fixture.status = MatchStatus::Finished;
        log::info!("Match {} closed: {}", self.fixture.id, self.fixture.label());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::sample_question;
    use crate::models::{MatchId, RosterRecord};

    struct Fixture {
        fixture: Match,
        roster: Roster,
        questions: QuestionBank,
    }

    fn setup() -> Fixture {
        let mut roster = Roster::new();
        roster
            .load(&[
                RosterRecord::new("A", "a1"),
                RosterRecord::new("A", "a2"),
                RosterRecord::new("B", "b1"),
                RosterRecord::new("C", "c1"),
                RosterRecord::new("D", "d1"),
            ])
            .unwrap();
        let mut questions = QuestionBank::new();
        questions
            .load(vec![sample_question("M1", "Geo", 10), sample_question("M1", "Art", 20)])
            .unwrap();
        Fixture {
            fixture: Match::new(MatchId::new(1), ["A".into(), "B".into(), "C".into()]),
            roster,
            questions,
        }
    }

    #[test]
    fn test_award_updates_team_and_player() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);

        let award = engine.award_points(&"A".into(), &"a1".into(), 7).unwrap();
        assert_eq!(award.team_score, 7);
        assert_eq!(award.player_score, 7);
        engine.award_points(&"A".into(), &"a2".into(), 3).unwrap();

        assert_eq!(f.fixture.score_of(&"A".into()), Some(10));
        assert_eq!(f.roster.score_of(&"a1".into()), 7);
        assert_eq!(f.roster.score_of(&"a2".into()), 3);
    }

    #[test]
    fn test_award_rejects_team_outside_match() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);
        let err = engine.award_points(&"D".into(), &"d1".into(), 5).unwrap_err();
        assert!(matches!(err, TournamentError::Validation(_)));
        assert_eq!(f.roster.score_of(&"d1".into()), 0);
    }

    #[test]
    fn test_award_rejects_player_of_other_team() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);
        assert!(engine.award_points(&"A".into(), &"b1".into(), 5).is_err());
        assert!(engine.award_points(&"A".into(), &"ghost".into(), 5).is_err());
        assert_eq!(f.fixture.score_of(&"A".into()), Some(0));
        assert_eq!(f.roster.score_of(&"b1".into()), 0);
    }

    #[test]
    fn test_award_zero_rejected() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);
        assert!(matches!(
            engine.award_points(&"A".into(), &"a1".into(), 0),
            Err(TournamentError::Validation(_))
        ));
    }

    #[test]
    fn test_finished_match_refuses_awards() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);
        engine.award_points(&"B".into(), &"b1".into(), 4).unwrap();
        engine.close().unwrap();

        let err = engine.award_points(&"B".into(), &"b1".into(), 4).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidState(_)));
        assert!(matches!(engine.close(), Err(TournamentError::InvalidState(_))));

        assert_eq!(f.fixture.score_of(&"B".into()), Some(4));
        assert_eq!(f.roster.score_of(&"b1".into()), 4);
        assert_eq!(f.fixture.status(), MatchStatus::Finished);
    }

    #[test]
    fn test_cursor_exhausts_without_fault() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);

        assert_eq!(engine.current_question().question().map(|q| q.points), Some(10));
        engine.advance();
        assert_eq!(engine.current_question().question().map(|q| q.points), Some(20));
        engine.advance();
        assert_eq!(engine.current_question(), QuestionCursor::Exhausted { index: 2 });
        for _ in 0..5 {
            engine.advance();
            assert!(engine.current_question().is_exhausted());
        }
        assert_eq!(engine.fixture().next_question_index(), 7);
    }

    #[test]
    fn test_award_current_question_uses_question_points() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);
        engine.advance();
        let award = engine.award_current_question(&"C".into(), &"c1".into()).unwrap();
        assert_eq!(award.points, 20);

        engine.advance();
        let err = engine.award_current_question(&"C".into(), &"c1".into()).unwrap_err();
        assert!(matches!(err, TournamentError::Exhausted { cursor: 2, .. }));
        assert_eq!(f.roster.score_of(&"c1".into()), 20);
    }

    #[test]
    fn test_skip_question_and_multiple_awards() {
        let mut f = setup();
        let mut engine = MatchEngine::new(&mut f.fixture, &mut f.roster, &f.questions);
        engine.advance(); // nobody scored on question 1
        engine.award_current_question(&"A".into(), &"a1".into()).unwrap();
        engine.award_current_question(&"B".into(), &"b1".into()).unwrap();
        assert_eq!(f.fixture.score_of(&"A".into()), Some(20));
        assert_eq!(f.fixture.score_of(&"B".into()), Some(20));
    }
}
