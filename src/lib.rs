pub mod catalog_cli;
pub mod database;
pub mod environment;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod utils;
pub mod web;

pub use environment::{EnvironmentConfig, RecommendationConfig};
pub use models::{GeoPoint, Job, Worker};
pub use ranking::{
    haversine_distance, rank_by_proximity, rank_by_skill_overlap, rank_by_text_similarity,
    summarize_matches, BlendWeights, MatchSummary, RankedJob, RankingError, Strategy,
};
pub use web::{build_rocket, start_web_server};
