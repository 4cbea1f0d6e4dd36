use crate::{
    auth::{Claims, UserRole},
    errors::{AppError, AppResult},
};

pub fn require_teacher_or_admin(claims: &Claims) -> AppResult<()> {
    if claims.role == UserRole::Student {
        return Err(AppError::Forbidden(
            "Only teachers and admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_assigner_or_admin(claims: &Claims, assigned_by: &str) -> AppResult<()> {
    if claims.role != UserRole::Admin && claims.sub != assigned_by {
        return Err(AppError::Forbidden(
            "Only the assigning teacher or an admin can modify this assignment".to_string(),
        ));
    }
    Ok(())
}

/// Results are visible to their owning student plus any teacher/admin
/// (analytics consumers).
pub fn can_view_result(claims: &Claims, student_id: &str) -> AppResult<()> {
    if claims.sub != student_id && claims.role == UserRole::Student {
        return Err(AppError::Forbidden(
            "You cannot view this quiz result".to_string(),
        ));
    }
    Ok(())
}
