use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single multiple-choice question. `correct_answer` is the zero-based
/// index into `options` and is never sent to students taking a quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    pub subject: String,
    pub difficulty: Difficulty,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Question {
    pub fn new(
        title: &str,
        question_text: &str,
        options: Vec<String>,
        correct_answer: i32,
        subject: &str,
        difficulty: Difficulty,
        created_by: &str,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            question_text: question_text.to_string(),
            options,
            correct_answer,
            subject: subject.to_string(),
            difficulty,
            created_by: created_by.to_string(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// A question must carry 2-6 options and a correct index pointing at
    /// one of them.
    pub fn validate(&self) -> Result<(), String> {
        if self.options.len() < 2 || self.options.len() > 6 {
            return Err(format!(
                "A question must have between 2 and 6 options, got {}",
                self.options.len()
            ));
        }
        if self.correct_answer < 0 || self.correct_answer as usize >= self.options.len() {
            return Err(format!(
                "Correct answer index {} is out of range for {} options",
                self.correct_answer,
                self.options.len()
            ));
        }
        Ok(())
    }
}
