use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::AssignmentStatus;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    pub assignment_id: Option<String>,
}

/// Answers are accepted as-is: the array may be shorter or longer than
/// the question list. Missing slots count as unanswered and trailing
/// entries are ignored at scoring time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveAnswersRequest {
    pub answers: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    pub answers: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    #[validate(length(min = 1))]
    pub assigned_to: String,

    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentListQuery {
    pub student_id: Option<String>,
    pub quiz_id: Option<String>,
    pub status: Option<AssignmentStatus>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResultListQuery {
    pub quiz_id: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

pub fn page_window(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (offset.unwrap_or(0).max(0), limit.unwrap_or(20).clamp(1, 100))
}
