use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    jobs::ExpirySweep,
    repositories::{
        MongoAssignmentRepository, MongoQuestionRepository, MongoQuizRepository,
        MongoQuizResultRepository,
    },
    services::{AssignmentService, AttemptService, LogNotifier, Notifier},
};

#[derive(Clone)]
pub struct AppState {
    pub attempt_service: Arc<AttemptService>,
    pub assignment_service: Arc<AssignmentService>,
    pub expiry_sweep: Arc<ExpirySweep>,
    pub config: Arc<Config>,
    pub db: Database,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let assignment_repository = Arc::new(MongoAssignmentRepository::new(&db));
        assignment_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoQuizResultRepository::new(&db));
        result_repository.ensure_indexes().await?;

        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let attempt_service = Arc::new(AttemptService::new(
            quiz_repository.clone(),
            question_repository,
            assignment_repository.clone(),
            result_repository,
            notifier.clone(),
        ));

        let assignment_service = Arc::new(AssignmentService::new(
            assignment_repository.clone(),
            quiz_repository,
        ));

        let expiry_sweep = Arc::new(ExpirySweep::new(assignment_repository, notifier));

        Ok(Self {
            attempt_service,
            assignment_service,
            expiry_sweep,
            config: Arc::new(config),
            db,
        })
    }
}
