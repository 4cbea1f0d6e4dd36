use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answer slot value for a question the student has not answered yet.
pub const UNANSWERED: i32 = -1;

/// One student's attempt at one quiz. Exactly one result exists per
/// (student, quiz, assignment) key; `submitted_at` is the finality flag
/// and is set exactly once, by submission.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    /// Serialized as null for free (unassigned) practice attempts so the
    /// unique (student, quiz, assignment) index still applies.
    pub assignment_id: Option<String>,
    pub student_id: String,
    pub answers: Vec<i32>,
    pub score: f64,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub time_spent_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuizResult {
    /// A fresh, unsubmitted attempt with every answer slot set to the
    /// unanswered sentinel.
    pub fn start(
        quiz_id: &str,
        assignment_id: Option<&str>,
        student_id: &str,
        question_count: usize,
    ) -> Self {
        QuizResult {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            assignment_id: assignment_id.map(|id| id.to_string()),
            student_id: student_id.to_string(),
            answers: vec![UNANSWERED; question_count],
            score: 0.0,
            started_at: Utc::now(),
            submitted_at: None,
            time_spent_minutes: 0,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}
