// src/web/handlers/employer_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use super::helpers::{
    database_error, db_pool, error_response, insert_error, load_employer, validation_error,
};
use crate::database::{ApplicationRepository, DatabaseConfig, EmployerRepository, JobRepository};
use crate::models::{ApplicationCounts, Employer, NewEmployer};
use crate::web::types::{ApiError, ApiResult, DataResponse, EmployerStats};

fn employer_exists() -> ApiError {
    error_response(
        Status::Conflict,
        "An employer with this phone already exists",
        "EMPLOYER_EXISTS",
        &["Use a different phone number"],
    )
}

pub async fn create_employer_handler(
    request: Json<NewEmployer>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Employer> {
    let employer = request
        .into_inner()
        .into_employer()
        .map_err(validation_error)?;

    let pool = db_pool(db_config)?;
    EmployerRepository::new(pool)
        .insert(&employer)
        .await
        .map_err(|e| insert_error(e, employer_exists))?;

    Ok(Json(DataResponse::success(
        "Employer registered successfully".to_string(),
        employer,
    )))
}

pub async fn list_employers_handler(
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<Employer>> {
    let pool = db_pool(db_config)?;
    let employers = EmployerRepository::new(pool)
        .list_all()
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(
        format!("{} employers", employers.len()),
        employers,
    )))
}

pub async fn get_employer_handler(
    employer_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Employer> {
    let pool = db_pool(db_config)?;
    let employer = load_employer(pool, employer_id).await?;

    Ok(Json(DataResponse::success(employer.name.clone(), employer)))
}

pub async fn employer_stats_handler(
    employer_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<EmployerStats> {
    let pool = db_pool(db_config)?;
    let employer = load_employer(pool, employer_id).await?;

    let jobs = JobRepository::new(pool)
        .list_by_employer(&employer.id)
        .await
        .map_err(database_error)?;
    let applications = ApplicationRepository::new(pool)
        .list_for_employer(&employer.id)
        .await
        .map_err(database_error)?;
    let counts = ApplicationCounts::tally(&applications);

    Ok(Json(DataResponse::success(
        format!("{} jobs posted", jobs.len()),
        EmployerStats {
            jobs_posted: jobs.len(),
            total_applications: counts.total,
            pending: counts.pending,
            accepted: counts.accepted,
            rejected: counts.rejected,
        },
    )))
}
