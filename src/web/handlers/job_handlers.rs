// src/web/handlers/job_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use super::helpers::{
    database_error, db_pool, job_not_found, load_employer, load_job, load_worker,
    validation_error,
};
use crate::database::{ApplicationRepository, DatabaseConfig, JobRepository};
use crate::models::{Job, NewJob};
use crate::web::types::{ActionResponse, ApiError, ApiResult, DataResponse, JobApplicant};

pub async fn create_job_handler(
    request: Json<NewJob>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Job> {
    let job = request.into_inner().into_job().map_err(validation_error)?;

    let pool = db_pool(db_config)?;
    if let Some(employer_id) = &job.employer_id {
        load_employer(pool, employer_id).await?;
    }

    JobRepository::new(pool)
        .insert(&job)
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(
        "Job posted successfully".to_string(),
        job,
    )))
}

pub async fn list_jobs_handler(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<Job>> {
    let pool = db_pool(db_config)?;
    let jobs = JobRepository::new(pool)
        .list_recent()
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(format!("{} jobs", jobs.len()), jobs)))
}

pub async fn employer_jobs_handler(
    employer_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<Job>> {
    let pool = db_pool(db_config)?;
    let jobs = JobRepository::new(pool)
        .list_by_employer(employer_id)
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(
        format!("{} jobs posted by {}", jobs.len(), employer_id),
        jobs,
    )))
}

pub async fn get_job_handler(job_id: &str, db_config: &State<DatabaseConfig>) -> ApiResult<Job> {
    let pool = db_pool(db_config)?;
    let job = load_job(pool, job_id).await?;

    Ok(Json(DataResponse::success(job.title.clone(), job)))
}

pub async fn job_applicants_handler(
    job_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<JobApplicant>> {
    let pool = db_pool(db_config)?;
    let job = load_job(pool, job_id).await?;
    let applications = ApplicationRepository::new(pool)
        .list_by_job(&job.id)
        .await
        .map_err(database_error)?;

    let mut applicants = Vec::with_capacity(applications.len());
    for application in applications {
        let worker = load_worker(pool, &application.worker_id).await?;
        applicants.push(JobApplicant {
            application,
            worker,
        });
    }

    Ok(Json(DataResponse::success(
        format!("{} applications for {}", applicants.len(), job.title),
        applicants,
    )))
}

pub async fn delete_job_handler(
    job_id: &str,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, ApiError> {
    let pool = db_pool(db_config)?;
    let deleted = JobRepository::new(pool)
        .delete(job_id)
        .await
        .map_err(database_error)?;

    if !deleted {
        return Err(job_not_found(job_id));
    }

    info!("Job {} removed from catalog", job_id);
    Ok(Json(ActionResponse::success(
        "Job and all related applications deleted successfully".to_string(),
        "deleted".to_string(),
    )))
}
