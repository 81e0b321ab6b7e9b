//! CSV import of the roster and question files.
//!
//! Header names follow the operator files: `Equipe`, `Joueur` for the
//! roster; `Manche`, `Rubrique`, `Question`, `Points`, `Temps` and the
//! optional `Consigne` for questions. A missing required column rejects the
//! whole file before any row is read.

use anyhow::{bail, Context, Result};
use quiz_core::{Question, RosterRecord};
use serde::Deserialize;
use std::path::Path;

pub const ROSTER_COLUMNS: [&str; 2] = ["Equipe", "Joueur"];
pub const QUESTION_COLUMNS: [&str; 5] = ["Manche", "Rubrique", "Question", "Points", "Temps"];

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))
}

fn check_columns(headers: &csv::StringRecord, required: &[&str], path: &Path) -> Result<()> {
    let missing: Vec<&str> =
        required.iter().copied().filter(|col| !headers.iter().any(|h| h == *col)).collect();
    if !missing.is_empty() {
        bail!(
            "{}: missing columns {} (required: {})",
            path.display(),
            missing.join(", "),
            required.join(", ")
        );
    }
    Ok(())
}

pub fn read_roster_csv(path: &Path) -> Result<(Vec<RosterRecord>, ParseStats)> {
    let mut reader = open(path)?;
    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    check_columns(&headers, &ROSTER_COLUMNS, path)?;

    let mut stats = ParseStats::default();
    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<RosterRecord>().enumerate() {
        stats.total_rows += 1;
        let record = row.with_context(|| format!("{}: bad roster row {}", path.display(), line + 2))?;
        records.push(record);
        stats.parsed += 1;
    }
    Ok((records, stats))
}

/// Question row as it appears in the file; numbers are parsed here so the
/// error can name the row.
#[derive(Debug, Deserialize)]
struct QuestionRow {
    #[serde(rename = "Manche")]
    round: String,
    #[serde(rename = "Rubrique")]
    category: String,
    #[serde(rename = "Question")]
    text: String,
    #[serde(rename = "Points")]
    points: String,
    #[serde(rename = "Temps")]
    time: String,
    #[serde(rename = "Consigne", default)]
    instruction: Option<String>,
}

fn parse_positive(value: &str, column: &str, line: usize) -> Result<u32> {
    // spreadsheet exports write integers as "10.0"
    let trimmed = value.trim();
    let number = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    number
        .parse::<u32>()
        .with_context(|| format!("row {}: '{}' is not a whole number in '{}'", line, value, column))
}

pub fn read_questions_csv(path: &Path) -> Result<(Vec<Question>, ParseStats)> {
    let mut reader = open(path)?;
    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    check_columns(&headers, &QUESTION_COLUMNS, path)?;

    let mut stats = ParseStats::default();
    let mut questions = Vec::new();
    for (i, row) in reader.deserialize::<QuestionRow>().enumerate() {
        let line = i + 2;
        stats.total_rows += 1;
        let row = row.with_context(|| format!("{}: bad question row {}", path.display(), line))?;
        questions.push(Question {
            round: row.round,
            category: row.category,
            text: row.text,
            points: parse_positive(&row.points, "Points", line)?,
            time_limit_secs: parse_positive(&row.time, "Temps", line)?,
            instruction: row.instruction.filter(|s| !s.trim().is_empty()),
        });
        stats.parsed += 1;
    }
    Ok((questions, stats))
}
