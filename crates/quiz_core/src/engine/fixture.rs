//! Triangular draw for 9 teams.
//!
//! The teams are laid out on a 3x3 grid in input order. The three rows and
//! the three columns each make one match, so every team plays exactly twice,
//! meets its row-mates once and its column-mates once, and never meets the
//! other four teams.

use crate::error::{Result, TournamentError};
use crate::models::{Match, MatchId, TeamId};
use std::collections::BTreeSet;

pub const TEAM_COUNT: usize = 9;
pub const MATCH_COUNT: usize = 6;

/// Positional groups: rows first, then columns.
pub const FIXTURE_GROUPS: [[usize; 3]; MATCH_COUNT] =
    [[0, 1, 2], [3, 4, 5], [6, 7, 8], [0, 3, 6], [1, 4, 7], [2, 5, 8]];

/// Build the 6 matches for `teams`, ids "1".."6" in group order.
///
/// The input is used as given: no sorting, no deduplication.
pub fn generate_fixtures(teams: &[TeamId]) -> Result<Vec<Match>> {
    if teams.len() != TEAM_COUNT {
        return Err(TournamentError::validation(format!(
            "the tournament needs exactly {} teams, found {}",
            TEAM_COUNT,
            teams.len()
        )));
    }

    let distinct: BTreeSet<&TeamId> = teams.iter().collect();
    if distinct.len() != TEAM_COUNT {
        return Err(TournamentError::validation(format!(
            "team identifiers must be distinct ({} unique out of {})",
            distinct.len(),
            TEAM_COUNT
        )));
    }

    let matches: Vec<Match> = FIXTURE_GROUPS
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let id = MatchId::new(i as u8 + 1);
            Match::new(id, group.map(|slot| teams[slot].clone()))
        })
        .collect();

    log::debug!("Generated {} fixtures for {} teams", matches.len(), teams.len());
    Ok(matches)
}

#[cfg(test)]
pub(crate) fn nine_teams() -> Vec<TeamId> {
    ["A", "B", "C", "D", "E", "F", "G", "H", "I"].into_iter().map(TeamId::from).collect()
}
