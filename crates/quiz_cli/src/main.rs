//! Quiz tournament operator console
//!
//! Every command works on one session file: load, apply, save back.

#[cfg(feature = "cli")]
use anyhow::{bail, Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use quiz_cli::{load_session, report, save_session};
#[cfg(feature = "cli")]
use quiz_core::{MatchId, PlayerId, SaveManager, TeamId, TournamentConfig, TournamentState};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "quiz")]
#[command(about = "Run a 9-team triangular quiz tournament", long_about = None)]
struct Cli {
    /// Session file (.json, or .qsave for the compact format)
    #[arg(long, global = true, env = "QUIZ_STATE_PATH", default_value = "tournament.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Create an empty session file
    Init {
        /// Overwrite an existing session
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Load teams and players from CSV (Equipe, Joueur)
    ImportTeams {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Load questions from CSV (Manche, Rubrique, Question, Points, Temps[, Consigne])
    ImportQuestions {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Draw the 6 matches from the 9 loaded teams
    Schedule,

    /// List the matches
    Fixtures,

    /// Show the current question of a match
    Question {
        #[arg(long = "match")]
        match_id: MatchId,
    },

    /// Credit points to a player and their team
    Award {
        #[arg(long = "match")]
        match_id: MatchId,
        #[arg(long)]
        team: String,
        #[arg(long)]
        player: String,
        /// Defaults to the current question's value
        #[arg(long)]
        points: Option<u32>,
    },

    /// Move a match to its next question
    Next {
        #[arg(long = "match")]
        match_id: MatchId,
    },

    /// Finish a match
    Close {
        #[arg(long = "match")]
        match_id: MatchId,
    },

    /// Show the live scores of a match
    Scores {
        #[arg(long = "match")]
        match_id: MatchId,
    },

    /// Team standings
    Standings,

    /// Player leaderboard
    Leaderboard,

    /// Write the session as a JSON document
    Export {
        /// Output path (default: tournoi_<ddmm_HHMM>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the session with a previously exported document
    Restore {
        #[arg(long)]
        from: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TournamentConfig::from_env().map_err(anyhow::Error::msg)?;
    let path = cli.state.as_path();

    match cli.command {
        Commands::Init { force } => {
            if path.exists() && !force {
                bail!("❌ {} already exists (use --force to overwrite)", path.display());
            }
            save_session(path, &TournamentState::new())?;
            println!("✅ New tournament session: {}", path.display());
        }

        Commands::ImportTeams { csv } => {
            println!("📥 Importing teams from {}", csv.display());
            let (records, stats) = quiz_cli::read_roster_csv(&csv)?;
            let mut state = load_session(path)?;
            let summary = state.load_roster(&records).context("Roster rejected")?;
            save_session(path, &state)?;

            println!("   Rows:        {}/{}", stats.parsed, stats.total_rows);
            println!("   Teams:       {}", summary.teams);
            println!("   Players:     {}", summary.players);
            println!("   New players: {}", summary.new_players);
            if summary.teams != quiz_core::engine::TEAM_COUNT {
                println!(
                    "⚠️  {} teams loaded, the draw needs exactly {}",
                    summary.teams,
                    quiz_core::engine::TEAM_COUNT
                );
            }
        }

        Commands::ImportQuestions { csv } => {
            println!("📥 Importing questions from {}", csv.display());
            let (questions, stats) = quiz_cli::read_questions_csv(&csv)?;
            let mut state = load_session(path)?;
            let count = state.load_questions(questions).context("Questions rejected")?;
            save_session(path, &state)?;

            println!("   Rows:      {}/{}", stats.parsed, stats.total_rows);
            println!("   Questions: {}", count);
            for round in state.questions().rounds() {
                println!(
                    "   - {} ({} questions, {} pts)",
                    round.round, round.question_count, round.total_points
                );
            }
        }

        Commands::Schedule => {
            let mut state = load_session(path)?;
            state.generate_fixtures().context("Cannot draw the fixtures")?;
            save_session(path, &state)?;
            println!("🎲 Fixtures drawn");
            print!("{}", report::fixtures(&state));
        }

        Commands::Fixtures => {
            let state = load_session(path)?;
            print!("{}", report::fixtures(&state));
        }

        Commands::Question { match_id } => {
            let state = load_session(path)?;
            let cursor = state.current_question(match_id)?;
            print!("{}", report::question(&state, state.get_match(match_id)?, &cursor));
        }

        Commands::Award { match_id, team, player, points } => {
            let mut state = load_session(path)?;
            let (team, player) = (TeamId::from(team), PlayerId::from(player));
            let award = match points {
                Some(points) => state.award_points(match_id, &team, &player, points)?,
                None => state.award_current_question(match_id, &team, &player)?,
            };
            save_session(path, &state)?;
            println!(
                "✅ +{} for {} ({}): team {} pts, player {} pts",
                award.points, award.player, award.team, award.team_score, award.player_score
            );
        }

        Commands::Next { match_id } => {
            let mut state = load_session(path)?;
            state.advance(match_id)?;
            save_session(path, &state)?;
            let cursor = state.current_question(match_id)?;
            print!("{}", report::question(&state, state.get_match(match_id)?, &cursor));
        }

        Commands::Close { match_id } => {
            let mut state = load_session(path)?;
            state.close_match(match_id)?;
            save_session(path, &state)?;
            println!("🏁 Match {} finished", match_id);
            print!("{}", report::scoreboard(state.get_match(match_id)?, &config.points));
        }

        Commands::Scores { match_id } => {
            let state = load_session(path)?;
            print!("{}", report::scoreboard(state.get_match(match_id)?, &config.points));
        }

        Commands::Standings => {
            let state = load_session(path)?;
            print!("{}", report::standings(&state.standings(&config.points), &config.points));
        }

        Commands::Leaderboard => {
            let state = load_session(path)?;
            print!("{}", report::leaderboard(&state.leaderboard()));
        }

        Commands::Export { out } => {
            let state = load_session(path)?;
            let out = out.unwrap_or_else(|| {
                PathBuf::from(SaveManager::export_filename(&chrono::Local::now()))
            });
            save_session(&out, &state)?;
            println!("📄 Exported to {}", out.display());
        }

        Commands::Restore { from } => restore(path, &from)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn restore(path: &Path, from: &Path) -> Result<()> {
    println!("📂 Restoring from {}", from.display());
    let mut state = TournamentState::new();
    SaveManager::restore_into(from, &mut state)
        .with_context(|| format!("Failed to restore from {}", from.display()))?;
    save_session(path, &state)?;

    let finished = state.matches().filter(|m| m.is_finished()).count();
    println!("✅ Session restored");
    println!("   Teams:    {}", state.roster().team_count());
    println!("   Matches:  {} ({} finished)", state.matches().count(), finished);
    println!("   Questions: {}", state.questions().len());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("quiz CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
