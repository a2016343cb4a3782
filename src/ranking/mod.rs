// src/ranking/mod.rs
//! Job recommendation rankers.
//!
//! Every ranker is a pure function of a worker snapshot and a job snapshot:
//! inputs are borrowed, output is a freshly allocated `Vec<RankedJob>`.
//! Sorting is stable, so equal scores keep their input order.

pub mod geo;
pub mod skill_overlap;
pub mod summary;
pub mod text_similarity;
pub mod tfidf;

pub use geo::{haversine_distance, rank_by_proximity, ProximityBand, EARTH_RADIUS_METERS};
pub use skill_overlap::{rank_by_skill_overlap, skill_overlap};
pub use summary::{summarize_matches, MatchSummary, DEFAULT_GPS_RADIUS_METERS};
pub use text_similarity::{
    rank_by_text_similarity, rank_by_text_similarity_with, BlendWeights, TextScores,
};

use crate::models::Job;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("worker {worker_id} has no coordinates; proximity ranking needs a location")]
    MissingCoordinates { worker_id: String },
}

/// A job plus whatever scores the ranker that produced it computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<ProximityBand>,
}

impl RankedJob {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            score: None,
            ai_score: None,
            location_score: None,
            rating_score: None,
            final_score: None,
            distance_meters: None,
            proximity: None,
        }
    }

    pub fn with_overlap(mut self, score: u32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_text_scores(mut self, scores: TextScores) -> Self {
        self.ai_score = Some(scores.ai_score);
        self.location_score = Some(scores.location_score);
        self.rating_score = Some(scores.rating_score);
        self.final_score = Some(scores.final_score);
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance_meters = Some(meters);
        self.proximity = Some(ProximityBand::from_meters(meters));
        self
    }
}

/// Which ranker to run; used by the CLI and for log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Basic,
    Ai,
    Gps,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Basic => "basic",
            Strategy::Ai => "ai",
            Strategy::Gps => "gps",
        }
    }
}
