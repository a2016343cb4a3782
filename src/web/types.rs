// src/web/types.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::models::{Application, Job, Worker};
use crate::ranking::{MatchSummary, RankedJob, Strategy};

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

/// Error half of every handler result: an HTTP status plus the standard body.
pub type ApiError = (Status, Json<StandardErrorResponse>);

pub type ApiResult<T> = Result<Json<DataResponse<T>>, ApiError>;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LocationUpdateRequest {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct RateWorkerRequest {
    pub rating: f64,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: String,
    pub worker_id: String,
}

/// Worker dashboard: match counters plus application outcomes.
#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct WorkerStats {
    #[serde(flatten)]
    pub matches: MatchSummary,
    pub total_applied: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct EmployerStats {
    pub jobs_posted: usize,
    pub total_applications: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// An application as the worker sees it, with the job it targets.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct WorkerApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job: Job,
}

/// An application as the employer sees it, with the applicant.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobApplicant {
    #[serde(flatten)]
    pub application: Application,
    pub worker: Worker,
}

/// Ranked list plus the counters the dashboard shows next to it.
#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct RecommendationData {
    pub strategy: Strategy,
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance_meters: Option<f64>,
    pub summary: MatchSummary,
    pub jobs: Vec<RankedJob>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}
