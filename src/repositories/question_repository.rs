use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Question};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Resolve questions by id, returned in the order of `ids`. Ids with
    /// no matching document are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let subject_index = IndexModel::builder()
            .keys(doc! { "subject": 1 })
            .options(IndexOptions::builder().name("subject".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(subject_index).await?;
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let fetched: Vec<Question> = self
            .collection
            .find(doc! { "id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;

        // The store returns documents in arbitrary order; scoring depends
        // on the quiz's question order, so reorder by the id list.
        let mut by_id: HashMap<String, Question> = fetched
            .into_iter()
            .map(|question| (question.id.clone(), question))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
