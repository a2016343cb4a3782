// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Geographic point in decimal degrees, serialized in GeoJSON order `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude.abs() <= 180.0
            && self.latitude.abs() <= 90.0
    }

    /// Build a point from optional request fields, rejecting partial or out of range input.
    pub fn from_parts(
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<Option<Self>, ValidationError> {
        match (longitude, latitude) {
            (None, None) => Ok(None),
            (Some(longitude), Some(latitude)) => {
                let point = Self::new(longitude, latitude);
                if point.is_valid() {
                    Ok(Some(point))
                } else {
                    Err(ValidationError::InvalidCoordinates {
                        longitude,
                        latitude,
                    })
                }
            }
            _ => Err(ValidationError::MissingCoordinates),
        }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.longitude, point.latitude]
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("valid GPS coordinates are required (got lon={longitude}, lat={latitude})")]
    InvalidCoordinates { longitude: f64, latitude: f64 },
    #[error("both latitude and longitude are required")]
    MissingCoordinates,
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("rating must be between 1 and 5 (got {0})")]
    RatingOutOfRange(f64),
    #[error("salary must be a non-negative number (got {0})")]
    InvalidSalary(f64),
    #[error("nothing to update")]
    EmptyUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl Worker {
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            skills: Vec::new(),
            rating: 0.0,
            rating_count: 0,
            location: None,
            coordinates: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_skills<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.skills = skills.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_coordinates(mut self, coordinates: GeoPoint) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Ratings are whole-star style values from 1 to 5.
    pub fn validate_rating(rating: f64) -> Result<f64, ValidationError> {
        if (1.0..=5.0).contains(&rating) {
            Ok(rating)
        } else {
            Err(ValidationError::RatingOutOfRange(rating))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub employer_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub salary: f64,
    pub location: String,
    pub coordinates: GeoPoint,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(title: &str, location: &str, coordinates: GeoPoint) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employer_id: None,
            title: title.to_string(),
            description: String::new(),
            skills_required: Vec::new(),
            salary: 0.0,
            location: location.to_string(),
            coordinates,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_skills<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.skills_required = skills.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary = salary;
        self
    }

    pub fn with_employer(mut self, employer_id: &str) -> Self {
        self.employer_id = Some(employer_id.to_string());
        self
    }
}

/// Skills arrive either as a JSON list or as a comma separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for SkillsInput {
    fn default() -> Self {
        SkillsInput::List(Vec::new())
    }
}

impl SkillsInput {
    pub fn into_skills(self) -> Vec<String> {
        match self {
            SkillsInput::List(items) => crate::utils::clean_skills(items),
            SkillsInput::Csv(raw) => crate::utils::parse_skill_list(&raw),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub skills: SkillsInput,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
}

impl NewWorker {
    pub fn into_worker(self) -> Result<Worker, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::BlankField("phone"));
        }

        let coordinates = GeoPoint::from_parts(self.longitude, self.latitude)?;
        let mut worker = Worker::new(self.name.trim(), self.phone.trim());
        worker.skills = self.skills.into_skills();
        worker.location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        worker.coordinates = coordinates;
        Ok(worker)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_required: SkillsInput,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub employer_id: Option<String>,
    pub location: String,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
}

impl NewJob {
    /// Jobs without a valid location never reach the catalog.
    pub fn into_job(self) -> Result<Job, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankField("title"));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::BlankField("location"));
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(ValidationError::InvalidSalary(self.salary));
        }

        let coordinates = GeoPoint::from_parts(self.longitude, self.latitude)?
            .ok_or(ValidationError::MissingCoordinates)?;

        let mut job = Job::new(self.title.trim(), self.location.trim(), coordinates)
            .with_description(&self.description)
            .with_salary(self.salary);
        job.skills_required = self.skills_required.into_skills();
        job.employer_id = self.employer_id.filter(|id| !id.trim().is_empty());
        Ok(job)
    }
}

/// Partial profile edit; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
}

impl WorkerProfileUpdate {
    pub fn apply_to(self, worker: &mut Worker) -> Result<(), ValidationError> {
        if self.name.is_none() && self.location.is_none() && self.skills.is_none() {
            return Err(ValidationError::EmptyUpdate);
        }

        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::BlankField("name"));
            }
            worker.name = name.to_string();
        }
        if let Some(location) = self.location {
            // an empty string clears the location
            let location = location.trim();
            worker.location = (!location.is_empty()).then(|| location.to_string());
        }
        if let Some(skills) = self.skills {
            worker.skills = skills.into_skills();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employer {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub location: String,
}

impl NewEmployer {
    pub fn into_employer(self) -> Result<Employer, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::BlankField("phone"));
        }

        Ok(Employer {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            organization: self.organization.trim().to_string(),
            location: self.location.trim().to_string(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Applied" => Some(ApplicationStatus::Applied),
            "Accepted" => Some(ApplicationStatus::Accepted),
            "Rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// A worker's application to one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub worker_id: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl Application {
    pub fn new(job_id: &str, worker_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            worker_id: worker_id.to_string(),
            status: ApplicationStatus::Applied,
            applied_at: Utc::now(),
        }
    }
}

/// Outcome counts over a set of applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCounts {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl ApplicationCounts {
    pub fn tally(applications: &[Application]) -> Self {
        applications
            .iter()
            .fold(Self::default(), |mut counts, application| {
                counts.total += 1;
                match application.status {
                    ApplicationStatus::Applied => counts.pending += 1,
                    ApplicationStatus::Accepted => counts.accepted += 1,
                    ApplicationStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_job(longitude: Option<f64>, latitude: Option<f64>) -> NewJob {
        NewJob {
            title: "Electrician".to_string(),
            description: String::new(),
            skills_required: SkillsInput::Csv("electrician, wiring".to_string()),
            salary: 12000.0,
            employer_id: None,
            location: "Pune".to_string(),
            longitude,
            latitude,
        }
    }

    #[test]
    fn geo_point_serializes_as_lon_lat_pair() {
        let point = GeoPoint::new(73.8567, 18.5204);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "[73.8567,18.5204]");

        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn geo_point_rejects_out_of_range_values() {
        assert!(GeoPoint::new(73.0, 18.0).is_valid());
        assert!(!GeoPoint::new(181.0, 18.0).is_valid());
        assert!(!GeoPoint::new(73.0, -90.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 18.0).is_valid());
    }

    #[test]
    fn job_creation_requires_coordinates() {
        assert_eq!(
            new_job(None, None).into_job().unwrap_err(),
            ValidationError::MissingCoordinates
        );
        assert_eq!(
            new_job(Some(73.8), None).into_job().unwrap_err(),
            ValidationError::MissingCoordinates
        );
        assert!(matches!(
            new_job(Some(200.0), Some(18.5)).into_job(),
            Err(ValidationError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn job_creation_splits_comma_skills() {
        let job = new_job(Some(73.8567), Some(18.5204)).into_job().unwrap();
        assert_eq!(job.skills_required, vec!["electrician", "wiring"]);
        assert_eq!(job.coordinates, GeoPoint::new(73.8567, 18.5204));
    }

    #[test]
    fn worker_coordinates_are_optional() {
        let worker = NewWorker {
            name: "Asha".to_string(),
            phone: "9000000001".to_string(),
            skills: SkillsInput::List(vec![" plumber ".to_string(), "".to_string()]),
            location: Some("  ".to_string()),
            longitude: None,
            latitude: None,
        }
        .into_worker()
        .unwrap();

        assert_eq!(worker.skills, vec!["plumber"]);
        assert_eq!(worker.location, None);
        assert_eq!(worker.coordinates, None);
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        assert_eq!(Worker::validate_rating(4.5), Ok(4.5));
        assert_eq!(Worker::validate_rating(1.0), Ok(1.0));
        assert_eq!(
            Worker::validate_rating(6.0),
            Err(ValidationError::RatingOutOfRange(6.0))
        );
        assert!(Worker::validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn profile_update_only_touches_given_fields() {
        let mut worker = Worker::new("Asha", "9000000001")
            .with_skills(&["plumber"])
            .with_location("Pune");

        let update: WorkerProfileUpdate =
            serde_json::from_str(r#"{ "skills": "mason, painter " }"#).unwrap();
        update.apply_to(&mut worker).unwrap();

        assert_eq!(worker.name, "Asha");
        assert_eq!(worker.location.as_deref(), Some("Pune"));
        assert_eq!(worker.skills, vec!["mason", "painter"]);

        let update: WorkerProfileUpdate =
            serde_json::from_str(r#"{ "name": " Asha K ", "location": "" }"#).unwrap();
        update.apply_to(&mut worker).unwrap();
        assert_eq!(worker.name, "Asha K");
        assert_eq!(worker.location, None);
    }

    #[test]
    fn profile_update_rejects_blank_name_and_empty_body() {
        let mut worker = Worker::new("Asha", "9000000001");
        let blank = WorkerProfileUpdate {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            blank.apply_to(&mut worker),
            Err(ValidationError::BlankField("name"))
        );
        assert_eq!(
            WorkerProfileUpdate::default().apply_to(&mut worker),
            Err(ValidationError::EmptyUpdate)
        );
        assert_eq!(worker.name, "Asha");
    }

    #[test]
    fn application_counts_follow_status() {
        let mut accepted = Application::new("job-1", "w-1");
        accepted.status = ApplicationStatus::Accepted;
        let mut rejected = Application::new("job-2", "w-1");
        rejected.status = ApplicationStatus::Rejected;
        let pending = Application::new("job-3", "w-1");

        let counts = ApplicationCounts::tally(&[accepted, rejected, pending]);
        assert_eq!(
            counts,
            ApplicationCounts {
                total: 3,
                pending: 1,
                accepted: 1,
                rejected: 1
            }
        );
        assert_eq!(ApplicationStatus::parse("Accepted"), Some(ApplicationStatus::Accepted));
        assert_eq!(ApplicationStatus::parse("accepted"), None);
    }
}
