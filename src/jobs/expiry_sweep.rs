use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::{
    errors::AppResult,
    models::domain::{Assignment, AssignmentStatus},
    repositories::AssignmentRepository,
    services::Notifier,
};

/// Hours-remaining marks at which a deadline reminder is sent.
pub const REMINDER_THRESHOLDS: [i64; 3] = [1, 3, 6];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub reminders_sent: usize,
    pub expired: usize,
}

/// Periodic pass over open assignments: emits deadline reminders inside
/// a six-hour lookahead window and expires anything past due.
///
/// Every assignment is an independent unit of work; one failure is
/// logged and the rest of the batch continues. Transitions and reminder
/// claims are atomic in the store, so a partial sweep is safe to re-run
/// and a sweep racing a submission resolves to a single winner.
pub struct ExpirySweep {
    assignments: Arc<dyn AssignmentRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ExpirySweep {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            assignments,
            notifier,
        }
    }

    pub fn spawn(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        log::info!("Starting expiry sweep every {:?}", interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match self.run_once().await {
                    Ok(stats) => log::info!(
                        "Expiry sweep done: {} reminders, {} expired",
                        stats.reminders_sent,
                        stats.expired
                    ),
                    Err(err) => log::error!("Expiry sweep failed: {}", err),
                }
            }
        })
    }

    pub async fn run_once(&self) -> AppResult<SweepStats> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<SweepStats> {
        let mut stats = SweepStats::default();

        let window_end = now + ChronoDuration::hours(6);
        let upcoming = self.assignments.find_open_due_between(now, window_end).await?;

        for assignment in &upcoming {
            match self.remind(assignment, now).await {
                Ok(true) => stats.reminders_sent += 1,
                Ok(false) => {}
                Err(err) => log::warn!(
                    "Reminder failed for assignment {}: {}",
                    assignment.id,
                    err
                ),
            }
        }

        let overdue = self.assignments.find_open_overdue(now).await?;

        for assignment in &overdue {
            match self.expire(assignment).await {
                Ok(true) => stats.expired += 1,
                Ok(false) => {}
                Err(err) => log::warn!(
                    "Expiry failed for assignment {}: {}",
                    assignment.id,
                    err
                ),
            }
        }

        Ok(stats)
    }

    /// Send a reminder if the assignment sits on a threshold that has
    /// not been claimed yet. Returns whether a reminder went out.
    async fn remind(&self, assignment: &Assignment, now: DateTime<Utc>) -> AppResult<bool> {
        let seconds_left = (assignment.due_date - now).num_seconds();
        if seconds_left <= 0 {
            return Ok(false);
        }
        let hours_left = (seconds_left + 3599) / 3600;

        if !REMINDER_THRESHOLDS.contains(&hours_left) {
            return Ok(false);
        }

        // First claimant wins; later sweeps see the threshold as spent
        if !self.assignments.claim_reminder(&assignment.id, hours_left).await? {
            return Ok(false);
        }

        self.notifier
            .assignment_reminder(assignment, hours_left)
            .await?;
        Ok(true)
    }

    /// Expire one overdue assignment. Returns whether this sweep was the
    /// writer that performed the transition.
    async fn expire(&self, assignment: &Assignment) -> AppResult<bool> {
        let transitioned = self
            .assignments
            .transition_if_current(
                &assignment.id,
                &AssignmentStatus::OPEN,
                AssignmentStatus::Expired,
            )
            .await?;

        if !transitioned {
            // A submission (or an earlier sweep) already closed it
            return Ok(false);
        }

        self.notifier.assignment_expired(assignment).await?;
        Ok(true)
    }
}
