// src/web/handlers/recommendation_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use super::helpers::{db_pool, error_response, load_jobs, load_worker, ranking_error};
use crate::database::DatabaseConfig;
use crate::environment::RecommendationConfig;
use crate::ranking::{
    rank_by_proximity, rank_by_skill_overlap, rank_by_text_similarity_with, summarize_matches,
    Strategy,
};
use crate::utils::radius_km_to_meters;
use crate::web::types::{ApiError, ApiResult, DataResponse, RecommendationData};

pub async fn basic_recommendations_handler(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<RecommendationData> {
    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, worker_id).await?;
    let jobs = load_jobs(pool).await?;

    let ranked = rank_by_skill_overlap(&worker, &jobs);
    let summary = summarize_matches(&worker, &jobs, rec_config.gps_radius_meters);

    info!(
        "Skill matching for worker {}: {} jobs, {} with shared skills",
        worker.id, summary.total_jobs, summary.ai_matches
    );

    Ok(Json(DataResponse::success(
        format!("Ranked {} jobs by skill overlap", ranked.len()),
        RecommendationData {
            strategy: Strategy::Basic,
            worker_id: worker.id,
            max_distance_meters: None,
            summary,
            jobs: ranked,
        },
    )))
}

pub async fn ai_recommendations_handler(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<RecommendationData> {
    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, worker_id).await?;
    let jobs = load_jobs(pool).await?;

    let ranked = rank_by_text_similarity_with(&worker, &jobs, &rec_config.weights);
    let summary = summarize_matches(&worker, &jobs, rec_config.gps_radius_meters);

    info!(
        "AI matching for worker {}: {} jobs ranked",
        worker.id,
        ranked.len()
    );

    Ok(Json(DataResponse::success(
        format!("Ranked {} jobs by profile similarity", ranked.len()),
        RecommendationData {
            strategy: Strategy::Ai,
            worker_id: worker.id,
            max_distance_meters: None,
            summary,
            jobs: ranked,
        },
    )))
}

fn invalid_radius(message: String) -> ApiError {
    error_response(
        Status::BadRequest,
        message,
        "INVALID_RADIUS",
        &["Use a radius such as 2, 5 or 10 (kilometres)"],
    )
}

/// Parse the raw `radius_km` query value; a malformed value is an error, never "no bound".
pub fn parse_radius_km(raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let radius_km = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid_radius(format!("Radius '{}' is not a number", raw)))?;

    radius_km_to_meters(radius_km)
        .map(Some)
        .map_err(|e| invalid_radius(e.to_string()))
}

pub async fn gps_recommendations_handler(
    worker_id: &str,
    radius_km: Option<&str>,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<RecommendationData> {
    let max_distance_meters = parse_radius_km(radius_km)?;

    let pool = db_pool(db_config)?;
    let worker = load_worker(pool, worker_id).await?;
    let jobs = load_jobs(pool).await?;

    let ranked = rank_by_proximity(&worker, &jobs, max_distance_meters).map_err(ranking_error)?;
    let summary = summarize_matches(&worker, &jobs, rec_config.gps_radius_meters);

    info!(
        "GPS matching for worker {}: {} of {} jobs kept",
        worker.id,
        ranked.len(),
        jobs.len()
    );

    Ok(Json(DataResponse::success(
        format!("Found {} jobs near you", ranked.len()),
        RecommendationData {
            strategy: Strategy::Gps,
            worker_id: worker.id,
            max_distance_meters,
            summary,
            jobs: ranked,
        },
    )))
}
