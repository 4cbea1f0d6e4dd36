use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Binds a quiz to one student with a deadline. The status only ever
/// moves forward: pending -> in_progress -> completed, or any open
/// status -> expired once the due date has passed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Assignment {
    pub id: String,
    pub quiz_id: String,
    pub assigned_to: String,
    pub assigned_by: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    /// Reminder hour thresholds (1, 3, 6) already notified for this
    /// assignment. Claimed atomically by the sweep so a threshold fires
    /// at most once across runs.
    #[serde(default)]
    pub reminders_sent: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
    Expired,
}

impl AssignmentStatus {
    /// Statuses a student can still act on.
    pub const OPEN: [AssignmentStatus; 2] =
        [AssignmentStatus::Pending, AssignmentStatus::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Expired)
    }
}

impl Assignment {
    pub fn new(
        quiz_id: &str,
        assigned_to: &str,
        assigned_by: &str,
        due_date: DateTime<Utc>,
    ) -> Self {
        Assignment {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            assigned_to: assigned_to.to_string(),
            assigned_by: assigned_by.to_string(),
            due_date,
            status: AssignmentStatus::Pending,
            reminders_sent: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }
}
