// src/catalog_cli.rs
use crate::database::{DatabaseConfig, JobRepository, WorkerRepository};
use crate::environment::EnvironmentConfig;
use crate::models::{NewJob, NewWorker};
use crate::ranking::{
    rank_by_proximity, rank_by_skill_overlap, rank_by_text_similarity_with, RankedJob, Strategy,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "rojgar-cli")]
#[command(about = "Maintain the worker/job catalog and run recommendations offline")]
pub struct CatalogCli {
    #[command(subcommand)]
    pub command: CatalogCommand,

    #[arg(long, default_value = "data/rojgar.db")]
    pub database_path: PathBuf,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Initialize the database
    Init,
    /// Load workers and jobs from a YAML file
    Seed { file: PathBuf },
    /// List all workers
    Workers,
    /// List all jobs, newest first
    Jobs,
    /// Rank the job catalog for one worker
    Rank {
        worker_id: String,
        #[arg(long, value_enum, default_value = "ai")]
        strategy: Strategy,
        /// Only keep jobs within this many kilometres (gps strategy)
        #[arg(long)]
        radius_km: Option<f64>,
    },
}

/// Shape of the file accepted by `seed`.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub workers: Vec<NewWorker>,
    #[serde(default)]
    pub jobs: Vec<NewJob>,
}

pub async fn handle_catalog_command(cli: CatalogCli) -> Result<()> {
    let mut db_config = DatabaseConfig::new(cli.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;

    let pool = db_config.pool()?;
    let worker_repo = WorkerRepository::new(pool);
    let job_repo = JobRepository::new(pool);

    match cli.command {
        CatalogCommand::Init => {
            info!(
                "✅ Database initialized at {}",
                db_config.database_path.display()
            );
        }

        CatalogCommand::Seed { file } => {
            let content = crate::utils::read_file_safe(&file).await?;
            let seed: SeedFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse seed file {}", file.display()))?;

            let mut workers_added = 0;
            for new_worker in seed.workers {
                let name = new_worker.name.clone();
                match new_worker.into_worker() {
                    Ok(worker) => {
                        if worker_repo.find_by_phone(&worker.phone).await?.is_some() {
                            warn!("Skipping worker {}: phone already registered", name);
                            continue;
                        }
                        worker_repo.insert(&worker).await?;
                        workers_added += 1;
                    }
                    Err(e) => warn!("Skipping worker {}: {}", name, e),
                }
            }

            let mut jobs_added = 0;
            for new_job in seed.jobs {
                let title = new_job.title.clone();
                match new_job.into_job() {
                    Ok(job) => {
                        job_repo.insert(&job).await?;
                        jobs_added += 1;
                    }
                    Err(e) => warn!("Skipping job {}: {}", title, e),
                }
            }

            info!(
                "✅ Seeded {} workers and {} jobs from {}",
                workers_added,
                jobs_added,
                file.display()
            );
        }

        CatalogCommand::Workers => {
            let workers = worker_repo.list_all().await?;
            if workers.is_empty() {
                info!("No workers found.");
            } else {
                info!(
                    "{:<38} {:<20} {:<15} {:<6} {}",
                    "ID", "Name", "Location", "Rating", "Skills"
                );
                info!("{}", "-".repeat(100));
                for worker in workers {
                    info!(
                        "{:<38} {:<20} {:<15} {:<6.2} {}",
                        worker.id,
                        worker.name,
                        worker.location.as_deref().unwrap_or("-"),
                        worker.rating,
                        worker.skills.join(", ")
                    );
                }
            }
        }

        CatalogCommand::Jobs => {
            let jobs = job_repo.list_recent().await?;
            if jobs.is_empty() {
                info!("No jobs found.");
            } else {
                info!(
                    "{:<38} {:<25} {:<15} {:<10} {}",
                    "ID", "Title", "Location", "Salary", "Skills"
                );
                info!("{}", "-".repeat(100));
                for job in jobs {
                    info!(
                        "{:<38} {:<25} {:<15} {:<10.0} {}",
                        job.id,
                        job.title,
                        job.location,
                        job.salary,
                        job.skills_required.join(", ")
                    );
                }
            }
        }

        CatalogCommand::Rank {
            worker_id,
            strategy,
            radius_km,
        } => {
            let Some(worker) = worker_repo.find_by_id(&worker_id).await? else {
                anyhow::bail!("Worker not found: {}", worker_id);
            };
            let jobs = job_repo.list_all().await?;
            let rec_config = EnvironmentConfig::load()?.recommendation;

            let ranked = match strategy {
                Strategy::Basic => rank_by_skill_overlap(&worker, &jobs),
                Strategy::Ai => rank_by_text_similarity_with(&worker, &jobs, &rec_config.weights),
                Strategy::Gps => {
                    let max_distance = radius_km
                        .map(crate::utils::radius_km_to_meters)
                        .transpose()?;
                    match rank_by_proximity(&worker, &jobs, max_distance) {
                        Ok(ranked) => ranked,
                        Err(e) => {
                            error!("❌ {}", e);
                            anyhow::bail!("Update the worker location before GPS ranking");
                        }
                    }
                }
            };

            info!(
                "{} ranking for {} ({} jobs):",
                strategy.as_str(),
                worker.name,
                ranked.len()
            );
            for (position, entry) in ranked.iter().enumerate() {
                info!("{:>3}. {}", position + 1, describe(entry));
            }
        }
    }

    Ok(())
}

fn describe(entry: &RankedJob) -> String {
    let job = &entry.job;
    if let Some(score) = entry.score {
        format!("{} [{}] score={}", job.title, job.location, score)
    } else if let (Some(final_score), Some(ai)) = (entry.final_score, entry.ai_score) {
        format!(
            "{} [{}] final={:.3} ai={:.3}",
            job.title, job.location, final_score, ai
        )
    } else if let (Some(meters), Some(band)) = (entry.distance_meters, entry.proximity) {
        format!(
            "{} [{}] {:.0} m ({})",
            job.title,
            job.location,
            meters,
            band.label()
        )
    } else {
        format!("{} [{}]", job.title, job.location)
    }
}
