// src/ranking/skill_overlap.rs
use std::collections::HashSet;

use super::RankedJob;
use crate::models::{Job, Worker};

/// Number of distinct worker skills found verbatim in `required`.
pub fn skill_overlap(worker_skills: &[String], required: &[String]) -> u32 {
    let unique: HashSet<&str> = worker_skills.iter().map(String::as_str).collect();
    unique
        .into_iter()
        .filter(|skill| required.iter().any(|r| r == skill))
        .count() as u32
}

/// Rank jobs by how many of the worker's skills they require, highest first.
pub fn rank_by_skill_overlap(worker: &Worker, jobs: &[Job]) -> Vec<RankedJob> {
    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .map(|job| {
            RankedJob::new(job.clone())
                .with_overlap(skill_overlap(&worker.skills, &job.skills_required))
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        worker_id = %worker.id,
        jobs = ranked.len(),
        top_score = ranked.first().and_then(|r| r.score).unwrap_or(0),
        "skill overlap ranking computed"
    );

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn job(title: &str, skills: &[&str]) -> Job {
        Job::new(title, "Pune", GeoPoint::new(73.8567, 18.5204)).with_skills(skills)
    }

    #[test]
    fn best_overlap_comes_first() {
        let worker = Worker::new("Asha", "1").with_skills(&["electrician", "plumber"]);
        let jobs = vec![
            job("A", &["electrician", "carpenter"]),
            job("B", &["plumber", "electrician"]),
        ];

        let ranked = rank_by_skill_overlap(&worker, &jobs);
        assert_eq!(ranked[0].job.title, "B");
        assert_eq!(ranked[0].score, Some(2));
        assert_eq!(ranked[1].job.title, "A");
        assert_eq!(ranked[1].score, Some(1));
    }

    #[test]
    fn ties_keep_input_order() {
        let worker = Worker::new("Asha", "1").with_skills(&["mason"]);
        let jobs = vec![
            job("first", &["painter"]),
            job("second", &["mason"]),
            job("third", &["welder"]),
            job("fourth", &["mason", "painter"]),
        ];

        let titles: Vec<_> = rank_by_skill_overlap(&worker, &jobs)
            .into_iter()
            .map(|r| r.job.title)
            .collect();
        assert_eq!(titles, vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn empty_skills_score_zero() {
        let worker = Worker::new("Asha", "1");
        let jobs = vec![job("A", &["mason"]), job("B", &[])];

        let ranked = rank_by_skill_overlap(&worker, &jobs);
        assert!(ranked.iter().all(|r| r.score == Some(0)));
        assert_eq!(ranked[0].job.title, "A");
    }

    #[test]
    fn duplicate_worker_skills_count_once() {
        let skills = vec!["mason".to_string(), "mason".to_string()];
        let required = vec!["mason".to_string()];
        assert_eq!(skill_overlap(&skills, &required), 1);
    }

    #[test]
    fn match_is_exact() {
        let skills = vec!["Electrician".to_string()];
        let required = vec!["electrician".to_string()];
        assert_eq!(skill_overlap(&skills, &required), 0);
    }

    #[test]
    fn empty_job_list_yields_empty_ranking() {
        let worker = Worker::new("Asha", "1").with_skills(&["mason"]);
        assert!(rank_by_skill_overlap(&worker, &[]).is_empty());
    }
}
