use async_trait::async_trait;

use crate::{
    errors::AppResult,
    models::domain::{Assignment, QuizResult},
};

/// Outbound notification events. Delivery is a collaborator concern;
/// callers fire these without awaiting business outcomes and tolerate
/// failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn quiz_submitted(&self, result: &QuizResult) -> AppResult<()>;
    async fn assignment_reminder(&self, assignment: &Assignment, hours_left: i64)
        -> AppResult<()>;
    async fn assignment_expired(&self, assignment: &Assignment) -> AppResult<()>;
}

/// Default notifier: logs the event and succeeds. Stands in until a
/// real delivery channel is wired up.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn quiz_submitted(&self, result: &QuizResult) -> AppResult<()> {
        log::info!(
            "Quiz submitted: result={} student={} score={:.1}",
            result.id,
            result.student_id,
            result.score
        );
        Ok(())
    }

    async fn assignment_reminder(
        &self,
        assignment: &Assignment,
        hours_left: i64,
    ) -> AppResult<()> {
        log::info!(
            "Assignment reminder: assignment={} student={} due in {}h",
            assignment.id,
            assignment.assigned_to,
            hours_left
        );
        Ok(())
    }

    async fn assignment_expired(&self, assignment: &Assignment) -> AppResult<()> {
        log::info!(
            "Assignment expired: assignment={} student={}",
            assignment.id,
            assignment.assigned_to
        );
        Ok(())
    }
}
