//! # quiz_core - Triangular Quiz Tournament Engine
//!
//! Runs a quiz tournament for exactly 9 teams drawn into 6 three-team
//! matches, tracks live scores per team and per player, and ranks the
//! teams and players.
//!
//! ## Features
//! - Deterministic 3x3 grid draw (every team plays twice)
//! - Per-match question cursor with atomic point awards
//! - 3/1/0 match points, quiz points as tie-break
//! - JSON session document with the operator console export layout
//!   (`teams`, `questions`, `matches`, `player_scores`, `match_progress`).
//!   Blank `Consigne` cells must be `null` or absent; the bare `NaN` token
//!   some spreadsheet exports write is not valid JSON and is rejected.
//! - JSON command API for a display layer

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;
pub mod state;

pub use api::{execute_command, execute_command_json, Command, CommandResponse};
pub use config::{PointsScheme, TournamentConfig};
pub use engine::{
    generate_fixtures, Award, LeaderboardRow, MatchEngine, Placement, QuestionCursor, StandingRow,
};
pub use error::{EntityKind, Result, TournamentError};
pub use models::{
    Match, MatchId, MatchStatus, PlayerId, Question, QuestionBank, Roster, RosterRecord, TeamId,
};
pub use save::{SaveError, SaveFormat, SaveManager, TournamentSnapshot};
pub use state::TournamentState;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
