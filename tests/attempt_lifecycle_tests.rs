use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use quizdeck_server::{
    auth::{Claims, UserRole},
    errors::{AppError, AppResult},
    models::{
        domain::{
            Assignment, AssignmentStatus, Difficulty, Question, Quiz, QuizResult, UNANSWERED,
        },
        dto::request::{StartQuizRequest, SubmitQuizRequest},
    },
    repositories::{
        AssignmentFilter, AssignmentRepository, QuestionRepository, QuizRepository,
        QuizResultRepository,
    },
    services::{AttemptService, Notifier},
};

// ---------------------------------------------------------------------
// In-memory repositories mirroring the store's atomic operations
// ---------------------------------------------------------------------

struct InMemoryQuizzes {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizzes {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }
}

struct InMemoryQuestions {
    questions: RwLock<HashMap<String, Question>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestions {
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(ids.iter().filter_map(|id| questions.get(id).cloned()).collect())
    }
}

struct InMemoryAssignments {
    assignments: RwLock<HashMap<String, Assignment>>,
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignments {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment> {
        self.assignments
            .write()
            .await
            .insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>> {
        Ok(self.assignments.read().await.get(id).cloned())
    }

    async fn update(&self, assignment: Assignment) -> AppResult<Assignment> {
        self.assignments
            .write()
            .await
            .insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.assignments.write().await.remove(id).is_some())
    }

    async fn list(
        &self,
        filter: AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Assignment>, i64)> {
        let assignments = self.assignments.read().await;
        let mut items: Vec<_> = assignments
            .values()
            .filter(|a| {
                filter
                    .assigned_to
                    .as_ref()
                    .map(|s| &a.assigned_to == s)
                    .unwrap_or(true)
                    && filter.quiz_id.as_ref().map(|q| &a.quiz_id == q).unwrap_or(true)
                    && filter.status.map(|s| a.status == s).unwrap_or(true)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.due_date.cmp(&b.due_date));

        let total = items.len() as i64;
        let start = (offset.max(0) as usize).min(items.len());
        let end = (start + limit.max(0) as usize).min(items.len());
        Ok((items[start..end].to_vec(), total))
    }

    async fn transition_if_current(
        &self,
        id: &str,
        from: &[AssignmentStatus],
        to: AssignmentStatus,
    ) -> AppResult<bool> {
        let mut assignments = self.assignments.write().await;
        match assignments.get_mut(id) {
            Some(assignment) if from.contains(&assignment.status) => {
                assignment.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_open_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| {
                AssignmentStatus::OPEN.contains(&a.status)
                    && a.due_date >= from
                    && a.due_date <= to
            })
            .cloned()
            .collect())
    }

    async fn find_open_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| AssignmentStatus::OPEN.contains(&a.status) && a.due_date < now)
            .cloned()
            .collect())
    }

    async fn claim_reminder(&self, id: &str, threshold: i64) -> AppResult<bool> {
        let mut assignments = self.assignments.write().await;
        match assignments.get_mut(id) {
            Some(assignment) if !assignment.reminders_sent.contains(&threshold) => {
                assignment.reminders_sent.push(threshold);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

struct InMemoryResults {
    results: RwLock<HashMap<String, QuizResult>>,
}

#[async_trait]
impl QuizResultRepository for InMemoryResults {
    async fn find_or_create(&self, candidate: QuizResult) -> AppResult<(QuizResult, bool)> {
        // Holds the write lock across find + insert, like the store's
        // single upsert
        let mut results = self.results.write().await;

        let existing = results
            .values()
            .find(|r| {
                r.student_id == candidate.student_id
                    && r.quiz_id == candidate.quiz_id
                    && r.assignment_id == candidate.assignment_id
            })
            .cloned();

        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        results.insert(candidate.id.clone(), candidate.clone());
        Ok((candidate, true))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizResult>> {
        Ok(self.results.read().await.get(id).cloned())
    }

    async fn save_answers(&self, id: &str, answers: &[i32]) -> AppResult<bool> {
        let mut results = self.results.write().await;
        match results.get_mut(id) {
            Some(result) if !result.is_submitted() => {
                result.answers = answers.to_vec();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn finalize(
        &self,
        id: &str,
        answers: &[i32],
        score: f64,
        submitted_at: DateTime<Utc>,
        time_spent_minutes: i64,
    ) -> AppResult<Option<QuizResult>> {
        let mut results = self.results.write().await;
        match results.get_mut(id) {
            Some(result) if !result.is_submitted() => {
                result.answers = answers.to_vec();
                result.score = score;
                result.submitted_at = Some(submitted_at);
                result.time_spent_minutes = time_spent_minutes;
                Ok(Some(result.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_by_student(
        &self,
        student_id: &str,
        quiz_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizResult>, i64)> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results
            .values()
            .filter(|r| {
                r.student_id == student_id
                    && quiz_id.map(|q| r.quiz_id == q).unwrap_or(true)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        let total = items.len() as i64;
        let start = (offset.max(0) as usize).min(items.len());
        let end = (start + limit.max(0) as usize).min(items.len());
        Ok((items[start..end].to_vec(), total))
    }
}

struct CountingNotifier {
    submitted: AtomicUsize,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn quiz_submitted(&self, _result: &QuizResult) -> AppResult<()> {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn assignment_reminder(
        &self,
        _assignment: &Assignment,
        _hours_left: i64,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn assignment_expired(&self, _assignment: &Assignment) -> AppResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------

struct World {
    service: AttemptService,
    quizzes: Arc<InMemoryQuizzes>,
    questions: Arc<InMemoryQuestions>,
    assignments: Arc<InMemoryAssignments>,
    results: Arc<InMemoryResults>,
    notifier: Arc<CountingNotifier>,
}

impl World {
    fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizzes {
            quizzes: RwLock::new(HashMap::new()),
        });
        let questions = Arc::new(InMemoryQuestions {
            questions: RwLock::new(HashMap::new()),
        });
        let assignments = Arc::new(InMemoryAssignments {
            assignments: RwLock::new(HashMap::new()),
        });
        let results = Arc::new(InMemoryResults {
            results: RwLock::new(HashMap::new()),
        });
        let notifier = Arc::new(CountingNotifier {
            submitted: AtomicUsize::new(0),
        });

        let service = AttemptService::new(
            quizzes.clone(),
            questions.clone(),
            assignments.clone(),
            results.clone(),
            notifier.clone(),
        );

        Self {
            service,
            quizzes,
            questions,
            assignments,
            results,
            notifier,
        }
    }

    /// Seed a quiz whose answer key is `correct`, one question per entry.
    async fn seed_quiz(&self, quiz_id: &str, correct: &[i32]) {
        let mut question_ids = Vec::new();
        let mut questions = self.questions.questions.write().await;

        for (i, &answer) in correct.iter().enumerate() {
            let question = Question::new(
                &format!("Question {}", i + 1),
                "Pick the correct option",
                vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string(),
                ],
                answer,
                "math",
                Difficulty::Medium,
                "teacher-1",
            );
            question_ids.push(question.id.clone());
            questions.insert(question.id.clone(), question);
        }
        drop(questions);

        let mut quiz = Quiz::new("Fixture Quiz", "math", 30, question_ids, "teacher-1");
        quiz.id = quiz_id.to_string();
        self.quizzes
            .quizzes
            .write()
            .await
            .insert(quiz.id.clone(), quiz);
    }

    async fn seed_assignment(
        &self,
        id: &str,
        quiz_id: &str,
        student: &str,
        due_in: Duration,
        status: AssignmentStatus,
    ) {
        let mut assignment = Assignment::new(quiz_id, student, "teacher-1", Utc::now() + due_in);
        assignment.id = id.to_string();
        assignment.status = status;
        self.assignments
            .assignments
            .write()
            .await
            .insert(assignment.id.clone(), assignment);
    }

    async fn assignment_status(&self, id: &str) -> AssignmentStatus {
        self.assignments
            .assignments
            .read()
            .await
            .get(id)
            .expect("assignment exists")
            .status
    }
}

fn student(sub: &str) -> Claims {
    Claims {
        sub: sub.to_string(),
        role: UserRole::Student,
        iat: 0,
        exp: 9999999999,
    }
}

fn start_request(quiz_id: &str, assignment_id: Option<&str>) -> StartQuizRequest {
    StartQuizRequest {
        quiz_id: quiz_id.to_string(),
        assignment_id: assignment_id.map(|s| s.to_string()),
    }
}

fn submit_request(answers: Option<Vec<i32>>) -> SubmitQuizRequest {
    SubmitQuizRequest { answers }
}

// ---------------------------------------------------------------------
// StartAttempt
// ---------------------------------------------------------------------

#[tokio::test]
async fn start_creates_attempt_with_sentinel_answers() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1, 2, 3]).await;

    let response = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start should succeed");

    assert!(!response.can_continue);
    assert_eq!(response.quiz_result.answers, vec![UNANSWERED; 4]);
    assert!(!response.quiz_result.is_submitted());
    assert_eq!(response.quiz.questions.len(), 4);
}

#[tokio::test]
async fn start_is_idempotent() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1]).await;

    let first = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("first start");
    let second = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("second start");

    assert!(!first.can_continue);
    assert!(second.can_continue);
    assert_eq!(first.quiz_result.id, second.quiz_result.id);
    assert_eq!(world.results.results.read().await.len(), 1);
}

#[tokio::test]
async fn concurrent_starts_resolve_to_one_attempt() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::days(7),
            AssignmentStatus::Pending,
        )
        .await;

    let request = || start_request("quiz-1", Some("assignment-1"));
    let (a, b) = tokio::join!(
        world.service.start_quiz("student-1", request()),
        world.service.start_quiz("student-1", request()),
    );

    let a = a.expect("first concurrent start");
    let b = b.expect("second concurrent start");

    assert_eq!(a.quiz_result.id, b.quiz_result.id);
    assert_eq!(world.results.results.read().await.len(), 1);
    // Exactly one of the two saw a fresh attempt
    assert_ne!(a.can_continue, b.can_continue);
}

#[tokio::test]
async fn start_moves_assignment_to_in_progress() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::days(1),
            AssignmentStatus::Pending,
        )
        .await;

    world
        .service
        .start_quiz("student-1", start_request("quiz-1", Some("assignment-1")))
        .await
        .expect("start should succeed");

    assert_eq!(
        world.assignment_status("assignment-1").await,
        AssignmentStatus::InProgress
    );
}

#[tokio::test]
async fn start_rejects_wrong_student() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::days(1),
            AssignmentStatus::Pending,
        )
        .await;

    let result = world
        .service
        .start_quiz("student-2", start_request("quiz-1", Some("assignment-1")))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn start_rejects_completed_assignment() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::days(1),
            AssignmentStatus::Completed,
        )
        .await;

    let result = world
        .service
        .start_quiz("student-1", start_request("quiz-1", Some("assignment-1")))
        .await;

    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn start_rejects_past_due_assignment() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::hours(-1),
            AssignmentStatus::Pending,
        )
        .await;

    let result = world
        .service
        .start_quiz("student-1", start_request("quiz-1", Some("assignment-1")))
        .await;

    assert!(matches!(result, Err(AppError::Expired(_))));
}

#[tokio::test]
async fn start_rejects_unknown_quiz() {
    let world = World::new();

    let result = world
        .service
        .start_quiz("student-1", start_request("quiz-missing", None))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ---------------------------------------------------------------------
// SaveAnswers
// ---------------------------------------------------------------------

#[tokio::test]
async fn save_answers_overwrites_checkpoint() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1, 2, 3]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");
    let id = started.quiz_result.id;

    let saved = world
        .service
        .save_answers(&id, &student("student-1"), vec![0, 1, -1, -1])
        .await
        .expect("first save");
    assert_eq!(saved.answers, vec![0, 1, -1, -1]);

    // Saving is repeatable and never scores
    let saved = world
        .service
        .save_answers(&id, &student("student-1"), vec![0, 1, 2, -1])
        .await
        .expect("second save");
    assert_eq!(saved.answers, vec![0, 1, 2, -1]);
    assert_eq!(saved.score, 0.0);
    assert!(!saved.is_submitted());
}

#[tokio::test]
async fn save_answers_rejects_non_owner() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");

    let result = world
        .service
        .save_answers(&started.quiz_result.id, &student("student-2"), vec![0])
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn save_answers_rejects_finalized_attempt() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");
    let id = started.quiz_result.id;

    world
        .service
        .submit_quiz(&id, &student("student-1"), submit_request(Some(vec![0])))
        .await
        .expect("submit");

    let result = world
        .service
        .save_answers(&id, &student("student-1"), vec![1])
        .await;

    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

// ---------------------------------------------------------------------
// SubmitAttempt
// ---------------------------------------------------------------------

#[tokio::test]
async fn submit_scores_against_fresh_answer_key() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[2, 0, 1, 3]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");

    let finalized = world
        .service
        .submit_quiz(
            &started.quiz_result.id,
            &student("student-1"),
            submit_request(Some(vec![2, 0, 1, 3])),
        )
        .await
        .expect("submit");

    assert_eq!(finalized.score, 100.0);
    assert!(finalized.is_submitted());
    assert!(finalized.time_spent_minutes >= 0);
    assert_eq!(world.notifier.submitted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn submit_uses_saved_answers_when_none_provided() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1, 2, 3]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");
    let id = started.quiz_result.id;

    world
        .service
        .save_answers(&id, &student("student-1"), vec![0, 1, -1, -1])
        .await
        .expect("save");

    let finalized = world
        .service
        .submit_quiz(&id, &student("student-1"), submit_request(None))
        .await
        .expect("submit");

    assert_eq!(finalized.score, 50.0);
    assert_eq!(finalized.answers, vec![0, 1, -1, -1]);
}

#[tokio::test]
async fn submit_is_final() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");
    let id = started.quiz_result.id;

    let first = world
        .service
        .submit_quiz(&id, &student("student-1"), submit_request(Some(vec![0, 0])))
        .await
        .expect("first submit");
    assert_eq!(first.score, 50.0);

    // A perfect resubmission must be rejected, not re-scored
    let second = world
        .service
        .submit_quiz(&id, &student("student-1"), submit_request(Some(vec![0, 1])))
        .await;
    assert!(matches!(second, Err(AppError::InvalidState(_))));

    let stored = world
        .service
        .get_result(&id, &student("student-1"))
        .await
        .expect("get result");
    assert_eq!(stored.score, 50.0);
    assert_eq!(stored.submitted_at, first.submitted_at);
    assert_eq!(world.notifier.submitted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_submissions_finalize_once() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");
    let id = started.quiz_result.id;
    let claims = student("student-1");

    let (a, b) = tokio::join!(
        world
            .service
            .submit_quiz(&id, &claims, submit_request(Some(vec![0, 1]))),
        world
            .service
            .submit_quiz(&id, &claims, submit_request(Some(vec![0, 1]))),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        matches!(&a, Err(AppError::InvalidState(_))) || matches!(&b, Err(AppError::InvalidState(_)))
    );
    assert_eq!(world.notifier.submitted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn submit_rejects_past_due_assignment() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::days(1),
            AssignmentStatus::Pending,
        )
        .await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", Some("assignment-1")))
        .await
        .expect("start");

    // Deadline passes while the attempt is in flight
    {
        let mut assignments = world.assignments.assignments.write().await;
        let assignment = assignments.get_mut("assignment-1").expect("exists");
        assignment.due_date = Utc::now() - Duration::hours(1);
    }

    let result = world
        .service
        .submit_quiz(
            &started.quiz_result.id,
            &student("student-1"),
            submit_request(Some(vec![0])),
        )
        .await;

    assert!(matches!(result, Err(AppError::Expired(_))));
    // Grading was refused: the attempt is still open
    let stored = world
        .service
        .get_result(&started.quiz_result.id, &student("student-1"))
        .await
        .expect("get result");
    assert!(!stored.is_submitted());
}

#[tokio::test]
async fn submit_rejects_expired_assignment_status() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-1",
            Duration::days(1),
            AssignmentStatus::Pending,
        )
        .await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", Some("assignment-1")))
        .await
        .expect("start");

    // The sweep expired the assignment even though the clock says open
    {
        let mut assignments = world.assignments.assignments.write().await;
        assignments.get_mut("assignment-1").expect("exists").status =
            AssignmentStatus::Expired;
    }

    let result = world
        .service
        .submit_quiz(
            &started.quiz_result.id,
            &student("student-1"),
            submit_request(Some(vec![0])),
        )
        .await;

    assert!(matches!(result, Err(AppError::Expired(_))));
}

#[tokio::test]
async fn forged_answer_key_has_no_effect_on_score() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1, 2, 3]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");

    // The client can only send answer indices; here it sends a sheet
    // that would be perfect against a forged all-ones key
    let finalized = world
        .service
        .submit_quiz(
            &started.quiz_result.id,
            &student("student-1"),
            submit_request(Some(vec![1, 1, 1, 1])),
        )
        .await
        .expect("submit");

    // Scored against the catalog's key [0,1,2,3]: only position 1 matches
    assert_eq!(finalized.score, 25.0);
}

#[tokio::test]
async fn result_visibility_follows_ownership_and_role() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0]).await;

    let started = world
        .service
        .start_quiz("student-1", start_request("quiz-1", None))
        .await
        .expect("start");
    let id = started.quiz_result.id;

    assert!(world.service.get_result(&id, &student("student-1")).await.is_ok());
    assert!(matches!(
        world.service.get_result(&id, &student("student-2")).await,
        Err(AppError::Forbidden(_))
    ));

    let teacher = Claims {
        sub: "teacher-1".to_string(),
        role: UserRole::Teacher,
        iat: 0,
        exp: 9999999999,
    };
    assert!(world.service.get_result(&id, &teacher).await.is_ok());
}

// ---------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------

#[tokio::test]
async fn full_assignment_lifecycle() {
    let world = World::new();
    world.seed_quiz("quiz-1", &[0, 1, 2, 3]).await;
    world
        .seed_assignment(
            "assignment-1",
            "quiz-1",
            "student-s",
            Duration::days(7),
            AssignmentStatus::Pending,
        )
        .await;

    // Start: assignment moves to in_progress
    let started = world
        .service
        .start_quiz("student-s", start_request("quiz-1", Some("assignment-1")))
        .await
        .expect("start");
    assert_eq!(
        world.assignment_status("assignment-1").await,
        AssignmentStatus::InProgress
    );
    let id = started.quiz_result.id;
    let claims = student("student-s");

    // Two partial saves
    world
        .service
        .save_answers(&id, &claims, vec![0, 1, -1, -1])
        .await
        .expect("first save");
    world
        .service
        .save_answers(&id, &claims, vec![0, 1, -1, -1])
        .await
        .expect("second save");

    // Submit 3/4 correct
    let finalized = world
        .service
        .submit_quiz(&id, &claims, submit_request(Some(vec![0, 1, 2, 0])))
        .await
        .expect("submit");

    assert_eq!(finalized.score, 75.0);
    assert!(finalized.time_spent_minutes >= 0);
    assert_eq!(
        world.assignment_status("assignment-1").await,
        AssignmentStatus::Completed
    );
    assert_eq!(world.notifier.submitted.load(Ordering::SeqCst), 1);

    // Listing the student's results shows the finalized attempt
    let page = world
        .service
        .list_my_results(&claims, Some("quiz-1"), 0, 10)
        .await
        .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].score, 75.0);
}
