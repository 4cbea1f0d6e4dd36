pub mod assignment_handler;
pub mod quiz_result_handler;

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, errors::AppError};

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.db.health_check().await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

/// Authenticated API surface, mounted under /api behind the auth
/// middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // `/results/mine` must register ahead of `/results/{id}`
        .service(quiz_result_handler::my_results)
        .service(quiz_result_handler::start_quiz)
        .service(quiz_result_handler::save_answers)
        .service(quiz_result_handler::submit_quiz)
        .service(quiz_result_handler::get_result)
        .service(assignment_handler::create_assignment)
        .service(assignment_handler::list_assignments)
        .service(assignment_handler::get_assignment)
        .service(assignment_handler::update_assignment)
        .service(assignment_handler::delete_assignment);
}
