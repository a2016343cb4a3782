// src/ranking/summary.rs
use serde::Serialize;

use super::geo::haversine_distance;
use super::skill_overlap::skill_overlap;
use crate::models::{Job, Worker};

pub const DEFAULT_GPS_RADIUS_METERS: f64 = 5_000.0;

/// Dashboard counters, computed per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total_jobs: usize,
    pub ai_matches: usize,
    pub gps_matches: usize,
}

pub fn summarize_matches(worker: &Worker, jobs: &[Job], gps_radius_meters: f64) -> MatchSummary {
    let ai_matches = jobs
        .iter()
        .filter(|job| skill_overlap(&worker.skills, &job.skills_required) > 0)
        .count();

    // without coordinates nothing counts as nearby
    let gps_matches = match worker.coordinates {
        Some(origin) => jobs
            .iter()
            .filter(|job| haversine_distance(origin, job.coordinates) <= gps_radius_meters)
            .count(),
        None => 0,
    };

    MatchSummary {
        total_jobs: jobs.len(),
        ai_matches,
        gps_matches,
    }
}
