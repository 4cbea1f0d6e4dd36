use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Assignment, AssignmentStatus},
};

#[derive(Debug, Default, Clone)]
pub struct AssignmentFilter {
    pub assigned_to: Option<String>,
    pub quiz_id: Option<String>,
    pub status: Option<AssignmentStatus>,
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>>;
    async fn update(&self, assignment: Assignment) -> AppResult<Assignment>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn list(
        &self,
        filter: AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Assignment>, i64)>;

    /// Atomically move the assignment to `to` only if its current status
    /// is one of `from`. Returns whether the transition was applied; a
    /// `false` means another writer (a submission or the sweep) got
    /// there first.
    async fn transition_if_current(
        &self,
        id: &str,
        from: &[AssignmentStatus],
        to: AssignmentStatus,
    ) -> AppResult<bool>;

    /// Open assignments whose due date falls inside the window.
    async fn find_open_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Assignment>>;

    /// Open assignments whose due date is strictly in the past.
    async fn find_open_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Assignment>>;

    /// Atomically claim a reminder threshold (hours remaining) for an
    /// assignment. Returns true only for the first claimant, so a
    /// threshold is notified at most once across sweep runs.
    async fn claim_reminder(&self, id: &str, threshold: i64) -> AppResult<bool>;
}

pub struct MongoAssignmentRepository {
    collection: Collection<Assignment>,
}

impl MongoAssignmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("assignments");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for assignments collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let student_status_index = IndexModel::builder()
            .keys(doc! { "assigned_to": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("assigned_to_status".to_string())
                    .build(),
            )
            .build();

        let due_date_index = IndexModel::builder()
            .keys(doc! { "due_date": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("due_date_status".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_status_index).await?;
        self.collection.create_index(due_date_index).await?;
        Ok(())
    }

    fn status_in(statuses: &[AssignmentStatus]) -> Document {
        let names: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        doc! { "$in": names }
    }
}

#[async_trait]
impl AssignmentRepository for MongoAssignmentRepository {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment> {
        self.collection.insert_one(&assignment).await?;
        Ok(assignment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>> {
        let assignment = self.collection.find_one(doc! { "id": id }).await?;
        Ok(assignment)
    }

    async fn update(&self, assignment: Assignment) -> AppResult<Assignment> {
        self.collection
            .replace_one(doc! { "id": &assignment.id }, &assignment)
            .await?;
        Ok(assignment)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    async fn list(
        &self,
        filter: AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Assignment>, i64)> {
        let mut query = doc! {};
        if let Some(student) = filter.assigned_to {
            query.insert("assigned_to", student);
        }
        if let Some(quiz_id) = filter.quiz_id {
            query.insert("quiz_id", quiz_id);
        }
        if let Some(status) = filter.status {
            query.insert("status", status.as_str());
        }

        let total = self.collection.count_documents(query.clone()).await? as i64;

        let items = self
            .collection
            .find(query)
            .sort(doc! { "due_date": 1 })
            .skip(offset as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn transition_if_current(
        &self,
        id: &str,
        from: &[AssignmentStatus],
        to: AssignmentStatus,
    ) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "status": Self::status_in(from) },
                doc! { "$set": {
                    "status": to.as_str(),
                    "modified_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;

        Ok(result.modified_count == 1)
    }

    async fn find_open_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Assignment>> {
        let assignments = self
            .collection
            .find(doc! {
                "due_date": { "$gte": to_bson(&from)?, "$lte": to_bson(&to)? },
                "status": Self::status_in(&AssignmentStatus::OPEN),
            })
            .await?
            .try_collect()
            .await?;
        Ok(assignments)
    }

    async fn find_open_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Assignment>> {
        let assignments = self
            .collection
            .find(doc! {
                "due_date": { "$lt": to_bson(&now)? },
                "status": Self::status_in(&AssignmentStatus::OPEN),
            })
            .await?
            .try_collect()
            .await?;
        Ok(assignments)
    }

    async fn claim_reminder(&self, id: &str, threshold: i64) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "reminders_sent": { "$ne": threshold } },
                doc! { "$addToSet": { "reminders_sent": threshold } },
            )
            .await?;

        Ok(result.modified_count == 1)
    }
}
