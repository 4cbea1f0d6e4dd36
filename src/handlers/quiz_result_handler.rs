use actix_web::{get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        page_window, ResultListQuery, SaveAnswersRequest, StartQuizRequest, SubmitQuizRequest,
    },
};

#[post("/results/start")]
pub async fn start_quiz(
    state: web::Data<AppState>,
    request: web::Json<StartQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let response = state
        .attempt_service
        .start_quiz(&auth.0.sub, request)
        .await?;

    let status = if response.can_continue {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::Created().json(response)
    };
    Ok(status)
}

#[put("/results/{id}/answers")]
pub async fn save_answers(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SaveAnswersRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .attempt_service
        .save_answers(&id, &auth.0, request.into_inner().answers)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/results/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .attempt_service
        .submit_quiz(&id, &auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/results/mine")]
pub async fn my_results(
    state: web::Data<AppState>,
    query: web::Query<ResultListQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let (offset, limit) = page_window(query.offset, query.limit);
    let page = state
        .attempt_service
        .list_my_results(&auth.0, query.quiz_id.as_deref(), offset, limit)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/results/{id}")]
pub async fn get_result(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state.attempt_service.get_result(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(result))
}
