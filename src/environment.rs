// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ranking::{BlendWeights, DEFAULT_GPS_RADIUS_METERS};

/// Tunables of the recommendation layer; every field has a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub weights: BlendWeights,
    pub gps_radius_meters: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: BlendWeights::DEFAULT,
            gps_radius_meters: DEFAULT_GPS_RADIUS_METERS,
        }
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        if [w.ai, w.rating, w.location]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            anyhow::bail!("Blend weights must be finite and non-negative: {:?}", w);
        }
        if !self.gps_radius_meters.is_finite() || self.gps_radius_meters < 0.0 {
            anyhow::bail!(
                "gps_radius_meters must be a non-negative number: {}",
                self.gps_radius_meters
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/rojgar.db"),
            recommendation: RecommendationConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            info!("config.yaml not found, using built-in defaults");
            return Self::default().resolved();
        }

        Self::load_from_file(&config_path, &environment)
    }

    pub fn get_environment() -> String {
        std::env::var("ROJGAR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, environment)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        env_config.resolved()
    }

    fn resolved(self) -> Result<Self> {
        self.recommendation.validate()?;
        Ok(Self {
            database_path: Self::resolve_path(&self.database_path)?,
            recommendation: self.recommendation,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.database_path.parent() {
            crate::utils::ensure_dir_exists(db_parent).await?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}
