use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quiz definition: an ordered list of question ids plus a time limit.
/// The question order here is the order answers are scored in, so the
/// catalog is the single source of truth for the answer key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject: String,
    pub time_limit_minutes: i32,
    pub question_ids: Vec<String>,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        title: &str,
        subject: &str,
        time_limit_minutes: i32,
        question_ids: Vec<String>,
        created_by: &str,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            subject: subject.to_string(),
            time_limit_minutes,
            question_ids,
            created_by: created_by.to_string(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn question_count(&self) -> usize {
        self.question_ids.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.question_ids.is_empty() {
            return Err("A quiz must have at least one question".to_string());
        }
        if self.time_limit_minutes < 1 {
            return Err("Time limit must be at least 1 minute".to_string());
        }
        Ok(())
    }
}
