use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::TournamentConfig;
use crate::engine::{match_placements, Placement, QuestionCursor};
use crate::error::{error_codes, Result};
use crate::models::{Match, MatchId, MatchStatus, PlayerId, Question, RosterRecord, TeamId};
use crate::save::TournamentSnapshot;
use crate::state::TournamentState;

/// Commands accepted from the display layer.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    LoadRoster {
        records: Vec<RosterRecord>,
    },
    LoadQuestions {
        questions: Vec<Question>,
    },
    /// Without `teams`, the roster's teams sorted by id.
    GenerateFixtures {
        #[serde(default)]
        teams: Option<Vec<TeamId>>,
    },
    AwardPoints {
        match_id: MatchId,
        team: TeamId,
        player: PlayerId,
        points: u32,
    },
    AwardCurrentQuestion {
        match_id: MatchId,
        team: TeamId,
        player: PlayerId,
    },
    Advance {
        match_id: MatchId,
    },
    CloseMatch {
        match_id: MatchId,
    },
    CurrentQuestion {
        match_id: MatchId,
    },
    MatchView {
        match_id: MatchId,
    },
    ActiveMatches,
    Fixtures,
    Standings,
    Leaderboard,
    ExportState,
    ImportState {
        snapshot: TournamentSnapshot,
    },
    Reset,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    fn success(data: Value) -> Self {
        Self { ok: true, data: Some(data), code: None, message: None }
    }

    fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self { ok: false, data: None, code: Some(code), message: Some(message.into()) }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentQuestionView<'a> {
    pub match_id: MatchId,
    pub index: usize,
    /// 1-based, for display
    pub number: usize,
    pub total: usize,
    pub exhausted: bool,
    pub question: Option<&'a Question>,
}

#[derive(Debug, Serialize)]
pub struct TeamScoreView<'a> {
    pub team: &'a TeamId,
    pub score: u32,
    pub players: &'a [PlayerId],
}

#[derive(Debug, Serialize)]
pub struct MatchView<'a> {
    pub id: MatchId,
    pub label: String,
    pub status: MatchStatus,
    pub next_question_index: usize,
    pub teams: Vec<TeamScoreView<'a>>,
    /// Provisional until the match is finished.
    pub placements: Vec<Placement>,
}

fn current_question_view(state: &TournamentState, match_id: MatchId) -> Result<CurrentQuestionView<'_>> {
    let cursor = state.current_question(match_id)?;
    let index = match cursor {
        QuestionCursor::Current { index, .. } | QuestionCursor::Exhausted { index } => index,
    };
    Ok(CurrentQuestionView {
        match_id,
        index,
        number: index + 1,
        total: state.questions().len(),
        exhausted: cursor.is_exhausted(),
        question: cursor.question(),
    })
}

fn match_view<'a>(state: &'a TournamentState, fixture: &'a Match, config: &TournamentConfig) -> MatchView<'a> {
    let teams = fixture
        .scores()
        .map(|(team, score)| TeamScoreView {
            team,
            score,
            players: state.roster().players_of(team).unwrap_or(&[]),
        })
        .collect();

    MatchView {
        id: fixture.id,
        label: fixture.label(),
        status: fixture.status(),
        next_question_index: fixture.next_question_index(),
        teams,
        placements: match_placements(fixture, &config.points),
    }
}

/// Apply one command to `state` and return its JSON payload.
pub fn execute_command(
    state: &mut TournamentState,
    config: &TournamentConfig,
    command: Command,
) -> Result<Value> {
    let data = match command {
        Command::LoadRoster { records } => serde_json::to_value(state.load_roster(&records)?)?,
        Command::LoadQuestions { questions } => {
            let count = state.load_questions(questions)?;
            json!({ "questions": count, "rounds": state.questions().rounds() })
        }
        Command::GenerateFixtures { teams } => {
            let matches = match teams {
                Some(teams) => state.generate_fixtures_from(&teams)?,
                None => state.generate_fixtures()?,
            };
            let ids: Vec<MatchId> = matches.iter().map(|m| m.id).collect();
            json!({ "matches": ids })
        }
        Command::AwardPoints { match_id, team, player, points } => {
            serde_json::to_value(state.award_points(match_id, &team, &player, points)?)?
        }
        Command::AwardCurrentQuestion { match_id, team, player } => {
            serde_json::to_value(state.award_current_question(match_id, &team, &player)?)?
        }
        Command::Advance { match_id } => {
            state.advance(match_id)?;
            serde_json::to_value(current_question_view(state, match_id)?)?
        }
        Command::CloseMatch { match_id } => {
            state.close_match(match_id)?;
            let fixture = state.get_match(match_id)?;
            serde_json::to_value(match_view(state, fixture, config))?
        }
        Command::CurrentQuestion { match_id } => {
            serde_json::to_value(current_question_view(state, match_id)?)?
        }
        Command::MatchView { match_id } => {
            let fixture = state.get_match(match_id)?;
            serde_json::to_value(match_view(state, fixture, config))?
        }
        Command::ActiveMatches => {
            let state = &*state;
            let views: Vec<_> =
                state.active_matches().into_iter().map(|m| match_view(state, m, config)).collect();
            serde_json::to_value(views)?
        }
        Command::Fixtures => {
            let state = &*state;
            let views: Vec<_> = state.matches().map(|m| match_view(state, m, config)).collect();
            serde_json::to_value(views)?
        }
        Command::Standings => serde_json::to_value(state.standings(&config.points))?,
        Command::Leaderboard => serde_json::to_value(state.leaderboard())?,
        Command::ExportState => serde_json::to_value(state.to_snapshot())?,
        Command::ImportState { snapshot } => {
            state.restore(snapshot)?;
            json!({ "matches": state.matches().count(), "teams": state.roster().team_count() })
        }
        Command::Reset => {
            state.reset();
            Value::Null
        }
    };
    Ok(data)
}

/// JSON in, JSON out. Never fails: errors come back as
/// `{"ok": false, "code": ..., "message": ...}`.
pub fn execute_command_json(
    state: &mut TournamentState,
    config: &TournamentConfig,
    request: &str,
) -> String {
    let response = match serde_json::from_str::<Command>(request) {
        Ok(command) => {
            debug!(?command, "executing command");
            match execute_command(state, config, command) {
                Ok(data) => CommandResponse::success(data),
                Err(e) => {
                    warn!(code = e.code(), "command rejected: {}", e);
                    CommandResponse::failure(e.code(), e.to_string())
                }
            }
        }
        Err(e) => {
            warn!("malformed command: {}", e);
            CommandResponse::failure(error_codes::MALFORMED_REQUEST, e.to_string())
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"ok":false,"code":"{}","message":"{}"}}"#,
            error_codes::SERIALIZATION,
            e.to_string().replace('"', "'")
        )
    })
}
