// src/web/handlers/worker_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use super::helpers::{
    database_error, db_pool, error_response, insert_error, load_job, load_jobs, load_worker,
    validation_error, worker_not_found,
};
use crate::database::{ApplicationRepository, DatabaseConfig, WorkerRepository};
use crate::environment::RecommendationConfig;
use crate::models::{
    ApplicationCounts, GeoPoint, NewWorker, ValidationError, Worker, WorkerProfileUpdate,
};
use crate::ranking::summarize_matches;
use crate::web::types::{
    ApiError, ApiResult, DataResponse, LocationUpdateRequest, RateWorkerRequest, WorkerApplication,
    WorkerStats,
};

fn worker_exists() -> ApiError {
    error_response(
        Status::Conflict,
        "A worker with this phone already exists",
        "WORKER_EXISTS",
        &["Use a different phone number"],
    )
}

pub async fn create_worker_handler(
    request: Json<NewWorker>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    let worker = request.into_inner().into_worker().map_err(validation_error)?;

    let pool = db_pool(db_config)?;
    let repo = WorkerRepository::new(pool);

    if repo
        .find_by_phone(&worker.phone)
        .await
        .map_err(database_error)?
        .is_some()
    {
        return Err(worker_exists());
    }

    // a concurrent create can still win the race; the UNIQUE index decides
    repo.insert(&worker)
        .await
        .map_err(|e| insert_error(e, worker_exists))?;

    Ok(Json(DataResponse::success(
        "Worker created successfully".to_string(),
        worker,
    )))
}

pub async fn list_workers_handler(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<Worker>> {
    let pool = db_pool(db_config)?;
    let workers = WorkerRepository::new(pool)
        .list_all()
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(
        format!("{} workers", workers.len()),
        workers,
    )))
}

pub async fn get_worker_handler(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, worker_id).await?;

    Ok(Json(DataResponse::success(
        format!("Worker {}", worker.name),
        worker,
    )))
}

pub async fn update_profile_handler(
    worker_id: &str,
    request: Json<WorkerProfileUpdate>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    let pool = db_pool(db_config)?;
    let mut worker = load_worker(pool, worker_id).await?;

    request
        .into_inner()
        .apply_to(&mut worker)
        .map_err(validation_error)?;

    let updated = WorkerRepository::new(pool)
        .update_profile(&worker)
        .await
        .map_err(database_error)?;
    if !updated {
        return Err(worker_not_found(worker_id));
    }

    Ok(Json(DataResponse::success(
        "Profile updated successfully".to_string(),
        worker,
    )))
}

pub async fn update_location_handler(
    worker_id: &str,
    request: Json<LocationUpdateRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    let point = GeoPoint::new(request.longitude, request.latitude);
    if !point.is_valid() {
        return Err(validation_error(ValidationError::InvalidCoordinates {
            longitude: request.longitude,
            latitude: request.latitude,
        }));
    }

    let pool = db_pool(db_config)?;
    let worker = WorkerRepository::new(pool)
        .update_location(worker_id, point)
        .await
        .map_err(database_error)?
        .ok_or_else(|| worker_not_found(worker_id))?;

    Ok(Json(DataResponse::success(
        "Location updated successfully".to_string(),
        worker,
    )))
}

pub async fn rate_worker_handler(
    worker_id: &str,
    request: Json<RateWorkerRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    let rating = Worker::validate_rating(request.rating).map_err(validation_error)?;

    let pool = db_pool(db_config)?;
    let worker = WorkerRepository::new(pool)
        .add_rating(worker_id, rating)
        .await
        .map_err(database_error)?
        .ok_or_else(|| worker_not_found(worker_id))?;

    info!(
        "Worker {} rated {} (mean {:.2} over {})",
        worker.id, rating, worker.rating, worker.rating_count
    );

    Ok(Json(DataResponse::success(
        "Rating added successfully".to_string(),
        worker,
    )))
}

pub async fn worker_stats_handler(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<WorkerStats> {
    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, worker_id).await?;
    let jobs = load_jobs(pool).await?;
    let applications = ApplicationRepository::new(pool)
        .list_by_worker(&worker.id)
        .await
        .map_err(database_error)?;

    let matches = summarize_matches(&worker, &jobs, rec_config.gps_radius_meters);
    let counts = ApplicationCounts::tally(&applications);

    Ok(Json(DataResponse::success(
        format!(
            "{} skill matches, {} jobs nearby, {} applications",
            matches.ai_matches, matches.gps_matches, counts.total
        ),
        WorkerStats {
            matches,
            total_applied: counts.total,
            pending: counts.pending,
            accepted: counts.accepted,
            rejected: counts.rejected,
        },
    )))
}

pub async fn worker_applications_handler(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<WorkerApplication>> {
    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, worker_id).await?;
    let applications = ApplicationRepository::new(pool)
        .list_by_worker(&worker.id)
        .await
        .map_err(database_error)?;

    let mut entries = Vec::with_capacity(applications.len());
    for application in applications {
        let job = load_job(pool, &application.job_id).await?;
        entries.push(WorkerApplication { application, job });
    }

    Ok(Json(DataResponse::success(
        format!("{} applications", entries.len()),
        entries,
    )))
}
