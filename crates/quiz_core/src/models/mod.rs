pub mod fixture;
pub mod ids;
pub mod question;
pub mod roster;

pub use fixture::{Match, MatchStatus};
pub use ids::{MatchId, PlayerId, TeamId};
pub use question::{Question, QuestionBank, RoundSummary};
pub use roster::{Player, Roster, RosterLoadSummary, RosterRecord, Team};
