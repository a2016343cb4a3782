// src/ranking/text_similarity.rs
//! "AI" matching: TF-IDF cosine similarity between the worker's skills and
//! each job's text, blended with a rating signal and a location signal.
//!
//! Each job is compared against the worker in isolation: the corpus is
//! rebuilt per job and always holds exactly two documents (worker, job).

use serde::{Deserialize, Serialize};

use super::tfidf::{cosine_similarity, TfIdfModel};
use super::RankedJob;
use crate::models::{Job, Worker};
use crate::utils::same_place;

pub const AI_WEIGHT: f64 = 0.6;
pub const RATING_WEIGHT: f64 = 0.2;
pub const LOCATION_WEIGHT: f64 = 0.2;

pub const MAX_RATING: f64 = 5.0;

/// Weights of the final blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub ai: f64,
    pub rating: f64,
    pub location: f64,
}

impl BlendWeights {
    pub const DEFAULT: BlendWeights = BlendWeights {
        ai: AI_WEIGHT,
        rating: RATING_WEIGHT,
        location: LOCATION_WEIGHT,
    };

    pub fn sum(&self) -> f64 {
        self.ai + self.rating + self.location
    }

    pub fn blend(&self, ai_score: f64, rating_score: f64, location_score: f64) -> f64 {
        ai_score * self.ai + rating_score * self.rating + location_score * self.location
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextScores {
    pub ai_score: f64,
    pub location_score: f64,
    pub rating_score: f64,
    pub final_score: f64,
}

pub fn worker_document(worker: &Worker) -> String {
    worker.skills.join(" ")
}

pub fn job_document(job: &Job) -> String {
    format!(
        "{} {} {}",
        job.title,
        job.description,
        job.skills_required.join(" ")
    )
}

/// Cosine similarity of the two texts under a two-document TF-IDF model,
/// with vectors laid out over the worker document's terms.
pub fn text_similarity(worker_text: &str, job_text: &str) -> f64 {
    let mut model = TfIdfModel::new();
    let worker_doc = model.add_document(worker_text);
    let job_doc = model.add_document(job_text);

    let (worker_vector, job_vector) = model.vectors_over(worker_doc, job_doc);
    cosine_similarity(&worker_vector, &job_vector)
}

pub fn location_score(worker_location: Option<&str>, job_location: &str) -> f64 {
    match worker_location {
        Some(place) if same_place(place, job_location) => 1.0,
        _ => 0.0,
    }
}

pub fn rating_score(rating: f64) -> f64 {
    if !rating.is_finite() {
        return 0.0;
    }
    rating.clamp(0.0, MAX_RATING) / MAX_RATING
}

pub fn score_job(worker: &Worker, job: &Job, weights: &BlendWeights) -> TextScores {
    let ai_score = text_similarity(&worker_document(worker), &job_document(job));
    let location_score = location_score(worker.location.as_deref(), &job.location);
    let rating_score = rating_score(worker.rating);

    TextScores {
        ai_score,
        location_score,
        rating_score,
        final_score: weights.blend(ai_score, rating_score, location_score),
    }
}

/// Rank with the default `0.6 / 0.2 / 0.2` blend.
pub fn rank_by_text_similarity(worker: &Worker, jobs: &[Job]) -> Vec<RankedJob> {
    rank_by_text_similarity_with(worker, jobs, &BlendWeights::DEFAULT)
}

pub fn rank_by_text_similarity_with(
    worker: &Worker,
    jobs: &[Job],
    weights: &BlendWeights,
) -> Vec<RankedJob> {
    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .map(|job| RankedJob::new(job.clone()).with_text_scores(score_job(worker, job, weights)))
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.final_score.unwrap_or(0.0);
        let b = b.final_score.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    tracing::debug!(
        worker_id = %worker.id,
        jobs = ranked.len(),
        top_score = ranked.first().and_then(|r| r.final_score).unwrap_or(0.0),
        "text similarity ranking computed"
    );

    ranked
}
