// src/web/handlers/application_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use super::helpers::{
    application_not_found, database_error, db_pool, error_response, insert_error, load_job,
    load_worker,
};
use crate::database::{ApplicationRepository, DatabaseConfig};
use crate::models::{Application, ApplicationStatus};
use crate::web::types::{ApiError, ApiResult, ApplyRequest, DataResponse};

fn already_applied() -> ApiError {
    error_response(
        Status::Conflict,
        "You have already applied for this job",
        "ALREADY_APPLIED",
        &["Check your applications with GET /api/workers/<id>/applications"],
    )
}

pub async fn apply_handler(
    request: Json<ApplyRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Application> {
    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, &request.worker_id).await?;
    let job = load_job(pool, &request.job_id).await?;

    let application = Application::new(&job.id, &worker.id);
    ApplicationRepository::new(pool)
        .insert(&application)
        .await
        .map_err(|e| insert_error(e, already_applied))?;

    info!("{} applied for {}", worker.name, job.title);
    Ok(Json(DataResponse::success(
        "Application submitted successfully".to_string(),
        application,
    )))
}

/// Employer decision on an application; a later decision replaces an earlier one.
pub async fn decide_application_handler(
    application_id: &str,
    status: ApplicationStatus,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Application> {
    let pool = db_pool(db_config)?;
    let application = ApplicationRepository::new(pool)
        .set_status(application_id, status)
        .await
        .map_err(database_error)?
        .ok_or_else(|| application_not_found(application_id))?;

    Ok(Json(DataResponse::success(
        format!("Application {}", status.as_str().to_lowercase()),
        application,
    )))
}
