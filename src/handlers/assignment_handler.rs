use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        page_window, AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
    },
};

#[post("/assignments")]
pub async fn create_assignment(
    state: web::Data<AppState>,
    request: web::Json<CreateAssignmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let assignment = state.assignment_service.create(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(assignment))
}

#[get("/assignments")]
pub async fn list_assignments(
    state: web::Data<AppState>,
    query: web::Query<AssignmentListQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let (offset, limit) = page_window(query.offset, query.limit);
    let page = state
        .assignment_service
        .list(&auth.0, query, offset, limit)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/assignments/{id}")]
pub async fn get_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let assignment = state.assignment_service.get(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(assignment))
}

#[put("/assignments/{id}")]
pub async fn update_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateAssignmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let assignment = state
        .assignment_service
        .update(&id, &auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(assignment))
}

#[delete("/assignments/{id}")]
pub async fn delete_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.assignment_service.delete(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Assignment deleted" })))
}
