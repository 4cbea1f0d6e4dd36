use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::{utils::can_view_result, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Assignment, AssignmentStatus, Question, Quiz, QuizResult},
        dto::{
            request::{StartQuizRequest, SubmitQuizRequest},
            response::{PaginatedResponse, QuizView, StartQuizResponse},
        },
    },
    repositories::{
        AssignmentRepository, QuestionRepository, QuizRepository, QuizResultRepository,
    },
    services::{notification::Notifier, scoring::score_answers},
};

/// The attempt lifecycle: start -> save answers -> submit -> score.
///
/// All state lives in the store; the service holds no mutable state and
/// every mutation goes through an atomic repository operation, so
/// concurrent duplicate starts and double submissions resolve to a
/// single winner.
pub struct AttemptService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    results: Arc<dyn QuizResultRepository>,
    notifier: Arc<dyn Notifier>,
}

impl AttemptService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        results: Arc<dyn QuizResultRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            assignments,
            results,
            notifier,
        }
    }

    /// Resolve the quiz and its questions fresh from the catalog, in
    /// quiz order. The answer key is never taken from a request.
    async fn get_quiz_with_questions(&self, quiz_id: &str) -> AppResult<(Quiz, Vec<Question>)> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        if quiz.question_ids.is_empty() {
            return Err(AppError::ValidationError(
                "Quiz has no questions".to_string(),
            ));
        }

        let questions = self.questions.find_by_ids(&quiz.question_ids).await?;
        if questions.len() != quiz.question_ids.len() {
            return Err(AppError::InternalError(format!(
                "Quiz '{}' references {} questions but only {} exist",
                quiz.id,
                quiz.question_ids.len(),
                questions.len()
            )));
        }

        Ok((quiz, questions))
    }

    async fn get_assignment(&self, assignment_id: &str) -> AppResult<Assignment> {
        self.assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Assignment with id '{}' not found",
                    assignment_id
                ))
            })
    }

    /// Start (or resume) the student's attempt at a quiz. At most one
    /// attempt exists per (student, quiz, assignment); a repeated start
    /// returns the existing attempt with `can_continue = true`.
    pub async fn start_quiz(
        &self,
        student_id: &str,
        request: StartQuizRequest,
    ) -> AppResult<StartQuizResponse> {
        let (quiz, questions) = self.get_quiz_with_questions(&request.quiz_id).await?;

        if let Some(assignment_id) = &request.assignment_id {
            let assignment = self.get_assignment(assignment_id).await?;

            if assignment.assigned_to != student_id {
                return Err(AppError::Forbidden(
                    "This quiz is not assigned to you".to_string(),
                ));
            }
            if assignment.status == AssignmentStatus::Completed {
                return Err(AppError::InvalidState(
                    "Assignment is already completed".to_string(),
                ));
            }
            if assignment.status == AssignmentStatus::Expired
                || assignment.is_past_due(Utc::now())
            {
                return Err(AppError::Expired(
                    "Assignment deadline has passed".to_string(),
                ));
            }
        }

        let candidate = QuizResult::start(
            &quiz.id,
            request.assignment_id.as_deref(),
            student_id,
            questions.len(),
        );

        let (result, created) = self.results.find_or_create(candidate).await?;

        if created {
            if let Some(assignment_id) = &request.assignment_id {
                let moved = self
                    .assignments
                    .transition_if_current(
                        assignment_id,
                        &AssignmentStatus::OPEN,
                        AssignmentStatus::InProgress,
                    )
                    .await?;
                if !moved {
                    log::debug!(
                        "Assignment {} was not open when attempt {} started",
                        assignment_id,
                        result.id
                    );
                }
            }
        }

        Ok(StartQuizResponse {
            quiz: QuizView::new(&quiz, &questions),
            quiz_result: result,
            can_continue: !created,
        })
    }

    /// Checkpoint the student's answers. Repeatable; never scores.
    pub async fn save_answers(
        &self,
        result_id: &str,
        caller: &Claims,
        answers: Vec<i32>,
    ) -> AppResult<QuizResult> {
        let mut result = self.get_owned_open_result(result_id, caller).await?;

        let saved = self.results.save_answers(result_id, &answers).await?;
        if !saved {
            // Finalized between our read and the conditional write
            return Err(AppError::InvalidState(
                "Quiz has already been submitted".to_string(),
            ));
        }

        result.answers = answers;
        Ok(result)
    }

    /// Finalize the attempt: resolve answers, re-fetch the answer key,
    /// score, and freeze the result exactly once.
    pub async fn submit_quiz(
        &self,
        result_id: &str,
        caller: &Claims,
        request: SubmitQuizRequest,
    ) -> AppResult<QuizResult> {
        let result = self.get_owned_open_result(result_id, caller).await?;

        if let Some(assignment_id) = &result.assignment_id {
            let assignment = self.get_assignment(assignment_id).await?;
            if assignment.status == AssignmentStatus::Expired
                || assignment.is_past_due(Utc::now())
            {
                return Err(AppError::Expired(
                    "Assignment deadline has passed; submission refused".to_string(),
                ));
            }

            // Claim the assignment before freezing the result so a
            // submission racing the expiry sweep has a single winner:
            // whoever commits the status transition first.
            let claimed = self
                .assignments
                .transition_if_current(
                    assignment_id,
                    &AssignmentStatus::OPEN,
                    AssignmentStatus::Completed,
                )
                .await?;

            if !claimed {
                let current = self.get_assignment(assignment_id).await?;
                match current.status {
                    AssignmentStatus::Expired => {
                        return Err(AppError::Expired(
                            "Assignment expired before submission completed".to_string(),
                        ));
                    }
                    // Already completed: an earlier submission won; the
                    // finalize CAS below reports InvalidState for it.
                    _ => {}
                }
            }
        }

        let final_answers = request.answers.unwrap_or_else(|| result.answers.clone());

        let (_, questions) = self.get_quiz_with_questions(&result.quiz_id).await?;
        let score = score_answers(&questions, &final_answers);

        let submitted_at = Utc::now();
        let time_spent_minutes = (submitted_at - result.started_at).num_minutes().max(0);

        let finalized = self
            .results
            .finalize(
                result_id,
                &final_answers,
                score,
                submitted_at,
                time_spent_minutes,
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidState("Quiz has already been submitted".to_string())
            })?;

        if let Err(err) = self.notifier.quiz_submitted(&finalized).await {
            log::warn!("Failed to send submission notification: {}", err);
        }

        Ok(finalized)
    }

    pub async fn get_result(&self, result_id: &str, caller: &Claims) -> AppResult<QuizResult> {
        let result = self
            .results
            .find_by_id(result_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz result with id '{}' not found", result_id))
            })?;

        can_view_result(caller, &result.student_id)?;
        Ok(result)
    }

    pub async fn list_my_results(
        &self,
        caller: &Claims,
        quiz_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedResponse<QuizResult>> {
        let (items, total) = self
            .results
            .list_by_student(&caller.sub, quiz_id, offset, limit)
            .await?;

        Ok(PaginatedResponse {
            items,
            total,
            offset,
            limit,
        })
    }

    /// Fetch a result, check the caller owns it, and check it is still
    /// open. Shared precondition of SaveAnswers and SubmitAttempt.
    async fn get_owned_open_result(
        &self,
        result_id: &str,
        caller: &Claims,
    ) -> AppResult<QuizResult> {
        let result = self
            .results
            .find_by_id(result_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz result with id '{}' not found", result_id))
            })?;

        if result.student_id != caller.sub {
            return Err(AppError::Forbidden(
                "You do not own this quiz attempt".to_string(),
            ));
        }
        if result.is_submitted() {
            return Err(AppError::InvalidState(
                "Quiz has already been submitted".to_string(),
            ));
        }

        Ok(result)
    }
}
