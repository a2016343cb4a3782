// src/database.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

use crate::models::{Application, ApplicationStatus, Employer, GeoPoint, Job, Worker};

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            crate::utils::ensure_dir_exists(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Round-trip a trivial query so callers learn whether SQLite answers
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool()?)
            .await
            .context("Database did not answer")?;
        Ok(())
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL UNIQUE,
                skills TEXT NOT NULL DEFAULT '[]',
                rating REAL NOT NULL DEFAULT 0,
                rating_count INTEGER NOT NULL DEFAULT 0,
                location TEXT,
                longitude REAL,
                latitude REAL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                employer_id TEXT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                skills_required TEXT NOT NULL DEFAULT '[]',
                salary REAL NOT NULL DEFAULT 0,
                location TEXT NOT NULL,
                longitude REAL NOT NULL,
                latitude REAL NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL DEFAULT '',
                organization TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id TEXT PRIMARY KEY,
                job_id TEXT NOT NULL,
                worker_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Applied',
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(job_id, worker_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_applications_worker ON applications(worker_id);")
            .execute(pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workers_phone ON workers(phone);")
            .execute(pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_employer ON jobs(employer_id);")
            .execute(pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);")
            .execute(pool)
            .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkerRow {
    id: String,
    name: String,
    phone: String,
    skills: String,
    rating: f64,
    rating_count: i64,
    location: Option<String>,
    longitude: Option<f64>,
    latitude: Option<f64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorkerRow> for Worker {
    type Error = anyhow::Error;

    fn try_from(row: WorkerRow) -> Result<Self> {
        let skills: Vec<String> = serde_json::from_str(&row.skills)
            .with_context(|| format!("Corrupt skills column for worker {}", row.id))?;

        let coordinates = match (row.longitude, row.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
            _ => None,
        };

        Ok(Worker {
            id: row.id,
            name: row.name,
            phone: row.phone,
            skills,
            rating: row.rating,
            rating_count: u32::try_from(row.rating_count).unwrap_or(0),
            location: row.location,
            coordinates,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    employer_id: Option<String>,
    title: String,
    description: String,
    skills_required: String,
    salary: f64,
    location: String,
    longitude: f64,
    latitude: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self> {
        let skills_required: Vec<String> = serde_json::from_str(&row.skills_required)
            .with_context(|| format!("Corrupt skills_required column for job {}", row.id))?;

        Ok(Job {
            id: row.id,
            employer_id: row.employer_id,
            title: row.title,
            description: row.description,
            skills_required,
            salary: row.salary,
            location: row.location,
            coordinates: GeoPoint::new(row.longitude, row.latitude),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmployerRow {
    id: String,
    name: String,
    phone: String,
    email: String,
    organization: String,
    location: String,
    created_at: DateTime<Utc>,
}

impl From<EmployerRow> for Employer {
    fn from(row: EmployerRow) -> Self {
        Employer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            organization: row.organization,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    job_id: String,
    worker_id: String,
    status: String,
    applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = anyhow::Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        let status = ApplicationStatus::parse(&row.status).ok_or_else(|| {
            anyhow::anyhow!("Unknown status '{}' for application {}", row.status, row.id)
        })?;

        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            worker_id: row.worker_id,
            status,
            applied_at: row.applied_at,
        })
    }
}

/// True when `error` came from a UNIQUE constraint rejecting an insert.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}

const WORKER_COLUMNS: &str =
    "id, name, phone, skills, rating, rating_count, location, longitude, latitude, created_at";

const JOB_COLUMNS: &str = "id, employer_id, title, description, skills_required, salary, \
     location, longitude, latitude, created_at";

const EMPLOYER_COLUMNS: &str = "id, name, phone, email, organization, location, created_at";

const APPLICATION_COLUMNS: &str = "a.id, a.job_id, a.worker_id, a.status, a.applied_at";

/// Worker lookups used by the recommendation endpoints.
pub struct WorkerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WorkerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, worker: &Worker) -> Result<()> {
        let skills = serde_json::to_string(&worker.skills)?;

        sqlx::query(
            r#"
            INSERT INTO workers (id, name, phone, skills, rating, rating_count, location,
                                 longitude, latitude, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&worker.id)
        .bind(&worker.name)
        .bind(&worker.phone)
        .bind(skills)
        .bind(worker.rating)
        .bind(i64::from(worker.rating_count))
        .bind(&worker.location)
        .bind(worker.coordinates.map(|c| c.longitude))
        .bind(worker.coordinates.map(|c| c.latitude))
        .bind(worker.created_at)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert worker {}", worker.id))?;

        info!("Created worker: {} ({})", worker.name, worker.id);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&format!(
            "SELECT {} FROM workers WHERE id = ?",
            WORKER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Worker::try_from).transpose()
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&format!(
            "SELECT {} FROM workers WHERE phone = ?",
            WORKER_COLUMNS
        ))
        .bind(phone)
        .fetch_optional(self.pool)
        .await?;

        row.map(Worker::try_from).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Worker>> {
        let rows = sqlx::query_as::<_, WorkerRow>(&format!(
            "SELECT {} FROM workers ORDER BY rowid ASC",
            WORKER_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Worker::try_from).collect()
    }

    /// Replace the worker's live coordinates
    pub async fn update_location(&self, id: &str, point: GeoPoint) -> Result<Option<Worker>> {
        let result = sqlx::query(
            r#"
            UPDATE workers
            SET longitude = ?, latitude = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(point.longitude)
        .bind(point.latitude)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!("Updated location for worker: {}", id);
        self.find_by_id(id).await
    }

    /// Overwrite the editable profile fields (name, location, skills)
    pub async fn update_profile(&self, worker: &Worker) -> Result<bool> {
        let skills = serde_json::to_string(&worker.skills)?;

        let result = sqlx::query(
            r#"
            UPDATE workers
            SET name = ?, location = ?, skills = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&worker.name)
        .bind(&worker.location)
        .bind(skills)
        .bind(Utc::now())
        .bind(&worker.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("Updated profile for worker: {}", worker.id);
        }
        Ok(result.rows_affected() > 0)
    }

    /// Fold one rating into the stored running mean in a single statement
    pub async fn add_rating(&self, id: &str, rating: f64) -> Result<Option<Worker>> {
        let result = sqlx::query(
            r#"
            UPDATE workers
            SET rating = (rating * rating_count + ?) / (rating_count + 1),
                rating_count = rating_count + 1,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(rating)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}

/// Read access to the open job catalog plus the posting operations that feed it.
pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, job: &Job) -> Result<()> {
        if !job.coordinates.is_valid() {
            anyhow::bail!(
                "Refusing to store job {} with invalid coordinates {:?}",
                job.id,
                job.coordinates
            );
        }

        let skills = serde_json::to_string(&job.skills_required)?;

        sqlx::query(
            r#"
            INSERT INTO jobs (id, employer_id, title, description, skills_required, salary,
                              location, longitude, latitude, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.employer_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(skills)
        .bind(job.salary)
        .bind(&job.location)
        .bind(job.coordinates.longitude)
        .bind(job.coordinates.latitude)
        .bind(job.created_at)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert job {}", job.id))?;

        info!("Created job: {} ({})", job.title, job.id);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Job::try_from).transpose()
    }

    /// All jobs in posting order; this is the ranking input
    pub async fn list_all(&self) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs ORDER BY rowid ASC",
            JOB_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Job::try_from).collect()
    }

    pub async fn list_recent(&self) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC, rowid DESC",
            JOB_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Job::try_from).collect()
    }

    pub async fn list_by_employer(&self, employer_id: &str) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE employer_id = ? ORDER BY created_at DESC, rowid DESC",
            JOB_COLUMNS
        ))
        .bind(employer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Job::try_from).collect()
    }

    /// Remove a job together with every application made to it
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let applications = sqlx::query("DELETE FROM applications WHERE job_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(
                "Deleted job: {} ({} applications)",
                id,
                applications.rows_affected()
            );
        }

        Ok(deleted)
    }
}

pub struct EmployerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmployerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, employer: &Employer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employers (id, name, phone, email, organization, location, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employer.id)
        .bind(&employer.name)
        .bind(&employer.phone)
        .bind(&employer.email)
        .bind(&employer.organization)
        .bind(&employer.location)
        .bind(employer.created_at)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert employer {}", employer.id))?;

        info!("Created employer: {} ({})", employer.name, employer.id);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Employer>> {
        let row = sqlx::query_as::<_, EmployerRow>(&format!(
            "SELECT {} FROM employers WHERE id = ?",
            EMPLOYER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Employer::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Employer>> {
        let rows = sqlx::query_as::<_, EmployerRow>(&format!(
            "SELECT {} FROM employers ORDER BY rowid ASC",
            EMPLOYER_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Employer::from).collect())
    }
}

pub struct ApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fails with a unique violation when the worker already applied to the job
    pub async fn insert(&self, application: &Application) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (id, job_id, worker_id, status, applied_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.worker_id)
        .bind(application.status.as_str())
        .bind(application.applied_at)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert application {}", application.id))?;

        info!(
            "Worker {} applied to job {}",
            application.worker_id, application.job_id
        );
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications a WHERE a.id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    /// Newest first
    pub async fn list_by_worker(&self, worker_id: &str) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications a WHERE a.worker_id = ? \
             ORDER BY a.applied_at DESC, a.rowid DESC",
            APPLICATION_COLUMNS
        ))
        .bind(worker_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Application::try_from).collect()
    }

    /// Newest first
    pub async fn list_by_job(&self, job_id: &str) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications a WHERE a.job_id = ? \
             ORDER BY a.applied_at DESC, a.rowid DESC",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Application::try_from).collect()
    }

    /// Applications to any job posted by `employer_id`
    pub async fn list_for_employer(&self, employer_id: &str) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications a JOIN jobs j ON j.id = a.job_id \
             WHERE j.employer_id = ? ORDER BY a.applied_at DESC, a.rowid DESC",
            APPLICATION_COLUMNS
        ))
        .bind(employer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Application::try_from).collect()
    }

    pub async fn set_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let result = sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!("Application {} marked {}", id, status.as_str());
        self.find_by_id(id).await
    }
}
