// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::database::DatabaseConfig;
use crate::environment::{EnvironmentConfig, RecommendationConfig};
use crate::models::{
    Application, ApplicationStatus, Employer, Job, NewEmployer, NewJob, NewWorker, Worker,
    WorkerProfileUpdate,
};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, put, routes, Build, Request, Response, Rocket, State};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Workers

#[post("/workers", data = "<request>")]
pub async fn create_worker(
    request: Json<NewWorker>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    handlers::create_worker_handler(request, db_config).await
}

#[get("/workers")]
pub async fn list_workers(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<Worker>> {
    handlers::list_workers_handler(db_config).await
}

#[get("/workers/<worker_id>")]
pub async fn get_worker(worker_id: &str, db_config: &State<DatabaseConfig>) -> ApiResult<Worker> {
    handlers::get_worker_handler(worker_id, db_config).await
}

#[put("/workers/<worker_id>", data = "<request>")]
pub async fn update_worker_profile(
    worker_id: &str,
    request: Json<WorkerProfileUpdate>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    handlers::update_profile_handler(worker_id, request, db_config).await
}

#[put("/workers/<worker_id>/location", data = "<request>")]
pub async fn update_worker_location(
    worker_id: &str,
    request: Json<LocationUpdateRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    handlers::update_location_handler(worker_id, request, db_config).await
}

#[post("/workers/<worker_id>/rate", data = "<request>")]
pub async fn rate_worker(
    worker_id: &str,
    request: Json<RateWorkerRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Worker> {
    handlers::rate_worker_handler(worker_id, request, db_config).await
}

#[get("/workers/<worker_id>/stats")]
pub async fn worker_stats(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<WorkerStats> {
    handlers::worker_stats_handler(worker_id, db_config, rec_config).await
}

#[get("/workers/<worker_id>/applications")]
pub async fn worker_applications(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<WorkerApplication>> {
    handlers::worker_applications_handler(worker_id, db_config).await
}

// Recommendations

#[get("/workers/<worker_id>/recommendations/basic")]
pub async fn basic_recommendations(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<RecommendationData> {
    handlers::basic_recommendations_handler(worker_id, db_config, rec_config).await
}

#[get("/workers/<worker_id>/recommendations/ai")]
pub async fn ai_recommendations(
    worker_id: &str,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<RecommendationData> {
    handlers::ai_recommendations_handler(worker_id, db_config, rec_config).await
}

#[get("/workers/<worker_id>/recommendations/gps?<radius_km>")]
pub async fn gps_recommendations(
    worker_id: &str,
    radius_km: Option<&str>,
    db_config: &State<DatabaseConfig>,
    rec_config: &State<RecommendationConfig>,
) -> ApiResult<RecommendationData> {
    handlers::gps_recommendations_handler(worker_id, radius_km, db_config, rec_config).await
}

// Jobs

#[post("/jobs", data = "<request>")]
pub async fn create_job(request: Json<NewJob>, db_config: &State<DatabaseConfig>) -> ApiResult<Job> {
    handlers::create_job_handler(request, db_config).await
}

#[get("/jobs")]
pub async fn list_jobs(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<Job>> {
    handlers::list_jobs_handler(db_config).await
}

#[get("/jobs/<job_id>")]
pub async fn get_job(job_id: &str, db_config: &State<DatabaseConfig>) -> ApiResult<Job> {
    handlers::get_job_handler(job_id, db_config).await
}

#[delete("/jobs/<job_id>")]
pub async fn delete_job(
    job_id: &str,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::delete_job_handler(job_id, db_config).await
}

#[get("/jobs/<job_id>/applications")]
pub async fn job_applicants(
    job_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<JobApplicant>> {
    handlers::job_applicants_handler(job_id, db_config).await
}

// Applications

#[post("/applications", data = "<request>")]
pub async fn apply(
    request: Json<ApplyRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Application> {
    handlers::apply_handler(request, db_config).await
}

#[put("/applications/<application_id>/accept")]
pub async fn accept_application(
    application_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Application> {
    handlers::decide_application_handler(application_id, ApplicationStatus::Accepted, db_config)
        .await
}

#[put("/applications/<application_id>/reject")]
pub async fn reject_application(
    application_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Application> {
    handlers::decide_application_handler(application_id, ApplicationStatus::Rejected, db_config)
        .await
}

// Employers

#[post("/employers", data = "<request>")]
pub async fn create_employer(
    request: Json<NewEmployer>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Employer> {
    handlers::create_employer_handler(request, db_config).await
}

#[get("/employers")]
pub async fn list_employers(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<Employer>> {
    handlers::list_employers_handler(db_config).await
}

#[get("/employers/<employer_id>")]
pub async fn get_employer(
    employer_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Employer> {
    handlers::get_employer_handler(employer_id, db_config).await
}

#[get("/employers/<employer_id>/stats")]
pub async fn employer_stats(
    employer_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<EmployerStats> {
    handlers::employer_stats_handler(employer_id, db_config).await
}

#[get("/employers/<employer_id>/jobs")]
pub async fn employer_jobs(
    employer_id: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<Job>> {
    handlers::employer_jobs_handler(employer_id, db_config).await
}

#[get("/health")]
pub async fn health(db_config: &State<DatabaseConfig>) -> Json<TextResponse> {
    handlers::health_handler(db_config).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be read".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec![
            "Verify all required fields are present".to_string(),
            "Check that numeric fields are numbers".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application with its managed state; the caller decides how to launch it.
pub fn build_rocket(
    db_config: DatabaseConfig,
    rec_config: RecommendationConfig,
) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(db_config)
        .manage(rec_config)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                create_worker,
                list_workers,
                get_worker,
                update_worker_profile,
                update_worker_location,
                rate_worker,
                worker_stats,
                worker_applications,
                basic_recommendations,
                ai_recommendations,
                gps_recommendations,
                create_job,
                list_jobs,
                get_job,
                delete_job,
                job_applicants,
                apply,
                accept_application,
                reject_application,
                create_employer,
                list_employers,
                get_employer,
                employer_stats,
                employer_jobs,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig, port: u16) -> Result<()> {
    let mut db_config = DatabaseConfig::new(config.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    info!("Starting Rojgar recommendation API server");
    info!("Database: {}", db_config.database_path.display());
    info!(
        "Blend weights: ai={} rating={} location={}",
        config.recommendation.weights.ai,
        config.recommendation.weights.rating,
        config.recommendation.weights.location
    );

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    build_rocket(db_config, config.recommendation)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed to launch: {}", e))?;

    Ok(())
}
