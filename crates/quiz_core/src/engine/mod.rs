//! Fixture generation, match progression and ranking.

pub mod fixture;
pub mod match_engine;
pub mod ranking;

pub use fixture::{generate_fixtures, FIXTURE_GROUPS, MATCH_COUNT, TEAM_COUNT};
pub use match_engine::{Award, MatchEngine, QuestionCursor};
pub use ranking::{
    compute_leaderboard, compute_standings, match_placements, LeaderboardRow, Placement,
    StandingRow,
};
