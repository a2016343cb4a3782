// src/ranking/geo.rs
use serde::{Deserialize, Serialize};

use super::{RankedJob, RankingError};
use crate::models::{GeoPoint, Job, Worker};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in metres on a spherical earth.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Coarse distance label shown next to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityBand {
    VeryClose,
    Nearby,
    ABitFar,
    FarAway,
}

impl ProximityBand {
    pub fn from_meters(meters: f64) -> Self {
        if meters < 500.0 {
            ProximityBand::VeryClose
        } else if meters < 3_000.0 {
            ProximityBand::Nearby
        } else if meters < 10_000.0 {
            ProximityBand::ABitFar
        } else {
            ProximityBand::FarAway
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProximityBand::VeryClose => "Very close to you",
            ProximityBand::Nearby => "Nearby",
            ProximityBand::ABitFar => "A bit far",
            ProximityBand::FarAway => "Far away",
        }
    }
}

/// Rank jobs nearest first, optionally dropping those beyond `max_distance_meters`.
///
/// Fails before computing anything when the worker has no coordinates.
pub fn rank_by_proximity(
    worker: &Worker,
    jobs: &[Job],
    max_distance_meters: Option<f64>,
) -> Result<Vec<RankedJob>, RankingError> {
    let origin = worker
        .coordinates
        .ok_or_else(|| RankingError::MissingCoordinates {
            worker_id: worker.id.clone(),
        })?;

    let within = |distance: f64| match max_distance_meters {
        Some(limit) if !limit.is_nan() => distance <= limit,
        _ => true,
    };

    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .filter_map(|job| {
            let distance = haversine_distance(origin, job.coordinates);
            within(distance).then(|| RankedJob::new(job.clone()).with_distance(distance))
        })
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.distance_meters.unwrap_or(f64::INFINITY);
        let b = b.distance_meters.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    tracing::debug!(
        worker_id = %worker.id,
        candidates = jobs.len(),
        kept = ranked.len(),
        max_distance_meters = ?max_distance_meters,
        "proximity ranking computed"
    );

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUNE: GeoPoint = GeoPoint {
        longitude: 73.8567,
        latitude: 18.5204,
    };
    const MUMBAI: GeoPoint = GeoPoint {
        longitude: 72.8777,
        latitude: 19.0760,
    };

    #[test]
    fn same_point_is_zero_distance() {
        assert!(haversine_distance(PUNE, PUNE).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(
            haversine_distance(PUNE, MUMBAI),
            haversine_distance(MUMBAI, PUNE)
        );
    }

    #[test]
    fn pune_to_mumbai_is_about_120_km() {
        let d = haversine_distance(PUNE, MUMBAI);
        assert!((115_000.0..125_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn proximity_band_boundaries() {
        assert_eq!(ProximityBand::from_meters(0.0), ProximityBand::VeryClose);
        assert_eq!(ProximityBand::from_meters(499.9), ProximityBand::VeryClose);
        assert_eq!(ProximityBand::from_meters(500.0), ProximityBand::Nearby);
        assert_eq!(ProximityBand::from_meters(2_999.0), ProximityBand::Nearby);
        assert_eq!(ProximityBand::from_meters(3_000.0), ProximityBand::ABitFar);
        assert_eq!(ProximityBand::from_meters(9_999.0), ProximityBand::ABitFar);
        assert_eq!(ProximityBand::from_meters(10_000.0), ProximityBand::FarAway);
        assert_eq!(ProximityBand::Nearby.label(), "Nearby");
    }

    #[test]
    fn nearest_first_and_radius_filter() {
        let worker = Worker::new("Asha", "1").with_coordinates(PUNE);
        let jobs = vec![
            Job::new("Mumbai job", "Mumbai", MUMBAI),
            Job::new("Pune job", "Pune", PUNE),
        ];

        let ranked = rank_by_proximity(&worker, &jobs, None).unwrap();
        assert_eq!(ranked[0].job.title, "Pune job");
        assert_eq!(ranked[0].proximity, Some(ProximityBand::VeryClose));
        assert_eq!(ranked[1].job.title, "Mumbai job");

        let near = rank_by_proximity(&worker, &jobs, Some(5_000.0)).unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].job.title, "Pune job");

        assert!(rank_by_proximity(&worker, &jobs, Some(-1.0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_worker_coordinates_is_an_error() {
        let worker = Worker::new("Asha", "1");
        let jobs = vec![Job::new("Pune job", "Pune", PUNE)];

        let err = rank_by_proximity(&worker, &jobs, None).unwrap_err();
        assert_eq!(
            err,
            RankingError::MissingCoordinates {
                worker_id: worker.id.clone()
            }
        );
    }
}
