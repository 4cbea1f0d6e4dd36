use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::{
        utils::{require_assigner_or_admin, require_teacher_or_admin},
        Claims, UserRole,
    },
    errors::{AppError, AppResult},
    models::{
        domain::Assignment,
        dto::{
            request::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
            response::PaginatedResponse,
        },
    },
    repositories::{AssignmentFilter, AssignmentRepository, QuizRepository},
};

pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl AssignmentService {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self {
            assignments,
            quizzes,
        }
    }

    pub async fn create(
        &self,
        caller: &Claims,
        request: CreateAssignmentRequest,
    ) -> AppResult<Assignment> {
        require_teacher_or_admin(caller)?;

        self.quizzes
            .find_by_id(&request.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz with id '{}' not found", request.quiz_id))
            })?;

        // Validated once, at creation
        if request.due_date <= Utc::now() {
            return Err(AppError::ValidationError(
                "Due date must be in the future".to_string(),
            ));
        }

        let assignment = Assignment::new(
            &request.quiz_id,
            &request.assigned_to,
            &caller.sub,
            request.due_date,
        );

        self.assignments.create(assignment).await
    }

    pub async fn get(&self, id: &str, caller: &Claims) -> AppResult<Assignment> {
        let assignment = self.find(id).await?;

        if caller.role == UserRole::Student && assignment.assigned_to != caller.sub {
            return Err(AppError::Forbidden(
                "You cannot view this assignment".to_string(),
            ));
        }

        Ok(assignment)
    }

    pub async fn list(
        &self,
        caller: &Claims,
        query: AssignmentListQuery,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedResponse<Assignment>> {
        let assigned_to = if caller.role == UserRole::Student {
            // Students only ever see their own assignments
            Some(caller.sub.clone())
        } else {
            query.student_id
        };

        let filter = AssignmentFilter {
            assigned_to,
            quiz_id: query.quiz_id,
            status: query.status,
        };

        let (items, total) = self.assignments.list(filter, offset, limit).await?;

        Ok(PaginatedResponse {
            items,
            total,
            offset,
            limit,
        })
    }

    pub async fn update(
        &self,
        id: &str,
        caller: &Claims,
        request: UpdateAssignmentRequest,
    ) -> AppResult<Assignment> {
        let mut assignment = self.find(id).await?;
        require_assigner_or_admin(caller, &assignment.assigned_by)?;

        if let Some(due_date) = request.due_date {
            if due_date <= Utc::now() {
                return Err(AppError::ValidationError(
                    "Due date must be in the future".to_string(),
                ));
            }
            assignment.due_date = due_date;
        }

        if let Some(status) = request.status {
            assignment.status = status;
        }

        assignment.modified_at = Some(Utc::now());
        self.assignments.update(assignment).await
    }

    pub async fn delete(&self, id: &str, caller: &Claims) -> AppResult<()> {
        let assignment = self.find(id).await?;
        require_assigner_or_admin(caller, &assignment.assigned_by)?;

        self.assignments.delete(id).await?;
        Ok(())
    }

    async fn find(&self, id: &str) -> AppResult<Assignment> {
        self.assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))
    }
}
