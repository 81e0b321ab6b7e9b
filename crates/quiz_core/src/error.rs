use thiserror::Error;

/// Stable error codes surfaced by the JSON command boundary.
pub mod error_codes {
    pub const VALIDATION: &str = "E_VALIDATION";
    pub const NOT_FOUND: &str = "E_NOT_FOUND";
    pub const INVALID_STATE: &str = "E_INVALID_STATE";
    pub const EXHAUSTED: &str = "E_EXHAUSTED";
    pub const MALFORMED_REQUEST: &str = "E_MALFORMED_REQUEST";
    pub const SERIALIZATION: &str = "E_SERIALIZATION";
}

/// What kind of identifier a failed lookup was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Player,
    Match,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Team => write!(f, "team"),
            EntityKind::Player => write!(f, "player"),
            EntityKind::Match => write!(f, "match"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TournamentError {
    /// Malformed import data, wrong team count, award outside the match.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {kind} '{id}'")]
    NotFound { kind: EntityKind, id: String },

    /// Command not allowed in the match's current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A command needed a question but the match cursor is past the end.
    #[error("No question left for match {match_id} (cursor at {cursor})")]
    Exhausted { match_id: String, cursor: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TournamentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TournamentError::Validation(msg.into())
    }

    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        TournamentError::NotFound { kind, id: id.to_string() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TournamentError::Validation(_) => error_codes::VALIDATION,
            TournamentError::NotFound { .. } => error_codes::NOT_FOUND,
            TournamentError::InvalidState(_) => error_codes::INVALID_STATE,
            TournamentError::Exhausted { .. } => error_codes::EXHAUSTED,
            TournamentError::Serialization(_) => error_codes::SERIALIZATION,
        }
    }
}

impl From<serde_json::Error> for TournamentError {
    fn from(err: serde_json::Error) -> Self {
        TournamentError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
