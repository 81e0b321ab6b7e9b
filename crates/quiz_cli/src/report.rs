//! Plain-text tables for the console.

use quiz_core::engine::{match_placements, LeaderboardRow, StandingRow};
use quiz_core::{Match, PointsScheme, QuestionCursor, TournamentState};
use std::fmt::Write;

pub fn fixtures(state: &TournamentState) -> String {
    let mut out = String::new();
    for m in state.matches() {
        let _ = writeln!(
            out,
            "MATCH {}  {}  [{}]  question {}",
            m.id,
            m.label(),
            m.status(),
            m.next_question_index() + 1
        );
    }
    if out.is_empty() {
        out.push_str("No fixtures yet. Run `quiz schedule` first.\n");
    }
    out
}

pub fn question(state: &TournamentState, fixture: &Match, cursor: &QuestionCursor<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MATCH {} : {}", fixture.id, fixture.label());
    match cursor {
        QuestionCursor::Current { index, question } => {
            let _ = writeln!(out, "{} / {}", question.round, question.category);
            if let Some(instruction) = question.instruction() {
                let _ = writeln!(out, "Rules: {}", instruction);
            }
            let _ = writeln!(
                out,
                "Question {} of {}: {}",
                index + 1,
                state.questions().len(),
                question.text
            );
            let _ = writeln!(
                out,
                "Points: {} | Time: {}s",
                question.points, question.time_limit_secs
            );
        }
        QuestionCursor::Exhausted { .. } => {
            out.push_str("All questions have been asked for this match.\n");
        }
    }
    out
}

pub fn scoreboard(fixture: &Match, scheme: &PointsScheme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MATCH {} [{}]", fixture.id, fixture.status());
    for p in match_placements(fixture, scheme) {
        let points = if fixture.is_finished() {
            format!("+{} match pts", p.match_points)
        } else {
            String::new()
        };
        let _ = writeln!(out, "{}. {:<20} {:>5} pts  {}", p.rank + 1, p.team, p.score, points);
    }
    out
}

pub fn standings(rows: &[StandingRow], scheme: &PointsScheme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4}{:<20}{:>12}{:>12}", "#", "Team", "Match pts", "Quiz pts");
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4}{:<20}{:>12}{:>12}",
            i + 1,
            row.team,
            row.match_points,
            row.quiz_points
        );
    }
    let _ = writeln!(
        out,
        "1st = {} pts, 2nd = {} pts, 3rd = {} pts. Quiz points break ties.",
        scheme.first, scheme.second, scheme.third
    );
    out
}

pub fn leaderboard(rows: &[LeaderboardRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4}{:<20}{:<20}{:>8}", "#", "Player", "Team", "Score");
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{:<4}{:<20}{:<20}{:>8}", i + 1, row.player, row.team, row.score);
    }
    if let Some(best) = rows.first() {
        let _ = writeln!(out, "Top scorer: {} with {} points", best.player, best.score);
    }
    out
}
