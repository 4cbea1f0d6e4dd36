use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, to_document, Bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::QuizResult,
};

#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Atomic find-or-create keyed on (student, quiz, assignment). The
    /// returned bool is true when `candidate` was inserted, false when
    /// an existing attempt was returned instead. Two concurrent calls
    /// for the same key resolve to the same document.
    async fn find_or_create(&self, candidate: QuizResult) -> AppResult<(QuizResult, bool)>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizResult>>;

    /// Overwrite the answers array of an unsubmitted attempt. Returns
    /// false if the attempt was already finalized.
    async fn save_answers(&self, id: &str, answers: &[i32]) -> AppResult<bool>;

    /// Compare-and-swap finalization: freezes answers, score and
    /// timestamps only if `submitted_at` is still unset. Returns the
    /// finalized document, or None if another submission won the race.
    async fn finalize(
        &self,
        id: &str,
        answers: &[i32],
        score: f64,
        submitted_at: DateTime<Utc>,
        time_spent_minutes: i64,
    ) -> AppResult<Option<QuizResult>>;

    async fn list_by_student(
        &self,
        student_id: &str,
        quiz_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizResult>, i64)>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_results collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // The uniqueness backing the idempotent-start contract: one
        // attempt per (student, quiz, assignment), null assignment
        // included.
        let attempt_key_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "quiz_id": 1, "assignment_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_key_unique".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(attempt_key_index).await?;
        self.collection.create_index(student_index).await?;
        Ok(())
    }

    fn assignment_key(assignment_id: &Option<String>) -> Bson {
        match assignment_id {
            Some(id) => Bson::String(id.clone()),
            None => Bson::Null,
        }
    }
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn find_or_create(&self, candidate: QuizResult) -> AppResult<(QuizResult, bool)> {
        let filter = doc! {
            "student_id": &candidate.student_id,
            "quiz_id": &candidate.quiz_id,
            "assignment_id": Self::assignment_key(&candidate.assignment_id),
        };

        let insert = to_document(&candidate)?;

        let found = self
            .collection
            .find_one_and_update(filter, doc! { "$setOnInsert": insert })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Upsert returned no quiz result document".to_string())
            })?;

        let created = found.id == candidate.id;
        Ok((found, created))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizResult>> {
        let result = self.collection.find_one(doc! { "id": id }).await?;
        Ok(result)
    }

    async fn save_answers(&self, id: &str, answers: &[i32]) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "submitted_at": Bson::Null },
                doc! { "$set": { "answers": to_bson(&answers.to_vec())? } },
            )
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn finalize(
        &self,
        id: &str,
        answers: &[i32],
        score: f64,
        submitted_at: DateTime<Utc>,
        time_spent_minutes: i64,
    ) -> AppResult<Option<QuizResult>> {
        let finalized = self
            .collection
            .find_one_and_update(
                doc! { "id": id, "submitted_at": Bson::Null },
                doc! { "$set": {
                    "answers": to_bson(&answers.to_vec())?,
                    "score": score,
                    "submitted_at": to_bson(&submitted_at)?,
                    "time_spent_minutes": time_spent_minutes,
                } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(finalized)
    }

    async fn list_by_student(
        &self,
        student_id: &str,
        quiz_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizResult>, i64)> {
        let mut filter = doc! { "student_id": student_id };
        if let Some(qid) = quiz_id {
            filter.insert("quiz_id", qid);
        }

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let results = self
            .collection
            .find(filter)
            .sort(doc! { "started_at": -1 })
            .skip(offset as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((results, total))
    }
}
