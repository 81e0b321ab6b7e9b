//! Standings and player leaderboard.
//!
//! Match points only come from finished matches; quiz points count every
//! match whatever its status. Inside a match, equal scores keep fixture
//! order, so the team listed first takes the better placement.

use crate::config::PointsScheme;
use crate::models::{Match, PlayerId, Roster, TeamId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub team: TeamId,
    pub match_points: u32,
    pub quiz_points: u32,
    pub matches_finished: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub player: PlayerId,
    pub team: TeamId,
    pub score: u32,
}

/// One team's placement inside a single match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub team: TeamId,
    pub score: u32,
    /// 0-based.
    pub rank: usize,
    pub match_points: u32,
}

/// Teams of `fixture` ordered by in-match score, with the points each
/// placement is worth under `scheme`. The points are only credited to the
/// standings once the match is finished.
pub fn match_placements(fixture: &Match, scheme: &PointsScheme) -> Vec<Placement> {
    let mut ordered: Vec<(&TeamId, u32)> = fixture.scores().collect();
    // stable: ties keep fixture order
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered
        .into_iter()
        .enumerate()
        .map(|(rank, (team, score))| Placement {
            team: team.clone(),
            score,
            rank,
            match_points: scheme.for_placement(rank),
        })
        .collect()
}

pub fn compute_standings<'a>(
    roster: &Roster,
    matches: impl IntoIterator<Item = &'a Match>,
    scheme: &PointsScheme,
) -> Vec<StandingRow> {
    let mut table: BTreeMap<TeamId, StandingRow> = roster
        .teams()
        .into_iter()
        .map(|team| (team.clone(), empty_row(team)))
        .collect();

    for fixture in matches {
        for (team, score) in fixture.scores() {
            let row = table.entry(team.clone()).or_insert_with(|| empty_row(team.clone()));
            row.quiz_points = row.quiz_points.saturating_add(score);
        }

        if !fixture.is_finished() {
            continue;
        }
        for placement in match_placements(fixture, scheme) {
            if let Some(row) = table.get_mut(&placement.team) {
                row.match_points = row.match_points.saturating_add(placement.match_points);
                row.matches_finished += 1;
            }
        }
    }

    let mut rows: Vec<StandingRow> = table.into_values().collect();
    rows.sort_by(compare_standing);
    rows
}

fn empty_row(team: TeamId) -> StandingRow {
    StandingRow { team, match_points: 0, quiz_points: 0, matches_finished: 0 }
}

fn compare_standing(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.match_points
        .cmp(&a.match_points)
        .then_with(|| b.quiz_points.cmp(&a.quiz_points))
        .then_with(|| a.team.cmp(&b.team))
}

/// Rostered players by cumulative score, ties by player id.
pub fn compute_leaderboard(roster: &Roster) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = roster
        .players()
        .map(|p| LeaderboardRow { player: p.id.clone(), team: p.team.clone(), score: p.score })
        .collect();
    rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player.cmp(&b.player)));
    rows
}
