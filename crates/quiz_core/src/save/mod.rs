// Save/Load for tournament sessions
// JSON document (export/import) or MessagePack + LZ4 with integrity check

pub mod error;
pub mod format;
pub mod manager;

pub use error::SaveError;
pub use format::{
    decompress_and_deserialize, serialize_and_compress, CompactSave, MatchEntry, MatchProgress,
    TournamentSnapshot,
};
pub use manager::{SaveFormat, SaveManager};

pub const SNAPSHOT_VERSION: u32 = 1;
