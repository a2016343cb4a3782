// src/web/handlers/helpers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::database::{
    is_unique_violation, DatabaseConfig, EmployerRepository, JobRepository, WorkerRepository,
};
use crate::models::{Employer, Job, ValidationError, Worker};
use crate::ranking::RankingError;
use crate::web::types::{ApiError, StandardErrorResponse};

pub fn error_response(
    status: Status,
    error: impl Into<String>,
    error_code: &str,
    suggestions: &[&str],
) -> ApiError {
    (
        status,
        Json(StandardErrorResponse::new(
            error.into(),
            error_code.to_string(),
            suggestions.iter().map(|s| s.to_string()).collect(),
        )),
    )
}

pub fn database_error(e: anyhow::Error) -> ApiError {
    error!("Database operation failed: {:#}", e);
    error_response(
        Status::InternalServerError,
        "Database operation failed",
        "DATABASE_ERROR",
        &["Try again in a few moments"],
    )
}

/// Map a failed insert to 409 when a UNIQUE constraint rejected it.
pub fn insert_error(e: anyhow::Error, conflict: fn() -> ApiError) -> ApiError {
    if is_unique_violation(&e) {
        warn!("Insert rejected by unique constraint: {:#}", e);
        conflict()
    } else {
        database_error(e)
    }
}

pub fn db_pool(db_config: &DatabaseConfig) -> Result<&SqlitePool, ApiError> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {}", e);
        error_response(
            Status::ServiceUnavailable,
            "Database connection failed",
            "DATABASE_ERROR",
            &["Try again in a few moments"],
        )
    })
}

pub fn validation_error(e: ValidationError) -> ApiError {
    warn!("Rejected request: {}", e);
    let suggestions: &[&str] = match e {
        ValidationError::InvalidCoordinates { .. } | ValidationError::MissingCoordinates => &[
            "Allow location access and retry",
            "Send longitude within [-180, 180] and latitude within [-90, 90]",
        ],
        ValidationError::RatingOutOfRange(_) => &["Send a rating between 1 and 5"],
        ValidationError::BlankField(_) | ValidationError::InvalidSalary(_) => {
            &["Check the request fields and retry"]
        }
        ValidationError::EmptyUpdate => &["Send at least one of name, location or skills"],
    };
    error_response(Status::BadRequest, e.to_string(), "VALIDATION_ERROR", suggestions)
}

pub fn ranking_error(e: RankingError) -> ApiError {
    match e {
        RankingError::MissingCoordinates { worker_id } => {
            warn!("Proximity ranking requested without location for worker {}", worker_id);
            error_response(
                Status::BadRequest,
                "Worker location missing",
                "LOCATION_REQUIRED",
                &["Enable location access and update your location"],
            )
        }
    }
}

pub fn worker_not_found(worker_id: &str) -> ApiError {
    error_response(
        Status::NotFound,
        format!("Worker '{}' not found", worker_id),
        "WORKER_NOT_FOUND",
        &["Check the worker id", "List workers with GET /api/workers"],
    )
}

pub fn job_not_found(job_id: &str) -> ApiError {
    error_response(
        Status::NotFound,
        format!("Job '{}' not found", job_id),
        "JOB_NOT_FOUND",
        &["Check the job id", "List jobs with GET /api/jobs"],
    )
}

pub fn employer_not_found(employer_id: &str) -> ApiError {
    error_response(
        Status::NotFound,
        format!("Employer '{}' not found", employer_id),
        "EMPLOYER_NOT_FOUND",
        &["Register the employer with POST /api/employers first"],
    )
}

pub fn application_not_found(application_id: &str) -> ApiError {
    error_response(
        Status::NotFound,
        format!("Application '{}' not found", application_id),
        "APPLICATION_NOT_FOUND",
        &["Check the application id"],
    )
}

pub async fn load_worker(pool: &SqlitePool, worker_id: &str) -> Result<Worker, ApiError> {
    WorkerRepository::new(pool)
        .find_by_id(worker_id)
        .await
        .map_err(database_error)?
        .ok_or_else(|| worker_not_found(worker_id))
}

pub async fn load_job(pool: &SqlitePool, job_id: &str) -> Result<Job, ApiError> {
    JobRepository::new(pool)
        .find_by_id(job_id)
        .await
        .map_err(database_error)?
        .ok_or_else(|| job_not_found(job_id))
}

pub async fn load_employer(pool: &SqlitePool, employer_id: &str) -> Result<Employer, ApiError> {
    EmployerRepository::new(pool)
        .find_by_id(employer_id)
        .await
        .map_err(database_error)?
        .ok_or_else(|| employer_not_found(employer_id))
}

pub async fn load_jobs(pool: &SqlitePool) -> Result<Vec<Job>, ApiError> {
    JobRepository::new(pool)
        .list_all()
        .await
        .map_err(database_error)
}
