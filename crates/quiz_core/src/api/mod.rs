pub mod json_api;

pub use json_api::{
    execute_command, execute_command_json, Command, CommandResponse, CurrentQuestionView,
    MatchView, TeamScoreView,
};
