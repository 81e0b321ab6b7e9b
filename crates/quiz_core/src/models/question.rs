use crate::error::{Result, TournamentError};
use serde::{Deserialize, Serialize};

/// A quiz item, in the column layout of the question file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "Manche")]
    pub round: String,
    #[serde(rename = "Rubrique")]
    pub category: String,
    #[serde(rename = "Question")]
    pub text: String,
    #[serde(rename = "Points")]
    pub points: u32,
    /// Time allowance in seconds. Advisory only.
    #[serde(rename = "Temps")]
    pub time_limit_secs: u32,
    #[serde(rename = "Consigne", default)]
    pub instruction: Option<String>,
}

impl Question {
    /// Only the numbers are checked; blank labels are legal cells.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.points == 0 {
            return Err("'Points' must be positive".to_string());
        }
        if self.time_limit_secs == 0 {
            return Err("'Temps' must be positive".to_string());
        }
        Ok(())
    }

    /// Instruction text, ignoring blank cells.
    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Round summary for display: categories in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round: String,
    pub categories: Vec<String>,
    pub question_count: usize,
    pub total_points: u32,
}

/// The shared, ordered question sequence served in every match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence. All-or-nothing.
    pub fn load(&mut self, questions: Vec<Question>) -> Result<usize> {
        for (index, question) in questions.iter().enumerate() {
            question.validate().map_err(|msg| {
                TournamentError::validation(format!("question {}: {}", index + 1, msg))
            })?;
        }

        self.questions = questions;
        log::info!("Question bank loaded: {} questions", self.questions.len());
        Ok(self.questions.len())
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn rounds(&self) -> Vec<RoundSummary> {
        let mut rounds: Vec<RoundSummary> = Vec::new();
        for q in &self.questions {
            let idx = match rounds.iter().position(|r| r.round == q.round) {
                Some(idx) => idx,
                None => {
                    rounds.push(RoundSummary {
                        round: q.round.clone(),
                        categories: Vec::new(),
                        question_count: 0,
                        total_points: 0,
                    });
                    rounds.len() - 1
                }
            };
            let summary = &mut rounds[idx];
            if !summary.categories.contains(&q.category) {
                summary.categories.push(q.category.clone());
            }
            summary.question_count += 1;
            summary.total_points = summary.total_points.saturating_add(q.points);
        }
        rounds
    }
}

#[cfg(test)]
pub(crate) fn sample_question(round: &str, category: &str, points: u32) -> Question {
    Question {
        round: round.to_string(),
        category: category.to_string(),
        text: format!("{category} question worth {points}"),
        points,
        time_limit_secs: 30,
        instruction: None,
    }
}
