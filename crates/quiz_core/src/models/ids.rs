//! Typed identifiers for teams, players and matches.

use crate::error::TournamentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Team name as it appears in the roster file.
    TeamId
);

string_id!(
    /// Player name, unique across the tournament.
    PlayerId
);

/// Match number, "1" through "6" in generator order.
///
/// Serialized as a bare integer; as a JSON map key it is written "1".."6".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u8);

impl MatchId {
    /// Highest id of a drawn tournament; ids run 1..=LAST.
    pub const LAST: u8 = 6;

    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub fn is_valid(self) -> bool {
        (1..=Self::LAST).contains(&self.0)
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse()
            .map(MatchId)
            .map_err(|_| TournamentError::validation(format!("'{}' is not a match id", s.trim())))?;
        if !id.is_valid() {
            return Err(TournamentError::validation(format!(
                "match id {} is out of range 1..={}",
                id,
                Self::LAST
            )));
        }
        Ok(id)
    }
}
