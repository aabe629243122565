use serde::Deserialize;

use super::repo_types::{ApplicationStage, JobStatus, NewJob};
use crate::validation::FieldErrors;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Clamp to sane bounds.
    pub fn bounded(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

/// Body of job create and update. A missing status means draft.
#[derive(Debug, Default, Deserialize)]
pub struct JobForm {
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl JobForm {
    pub fn validate(&self) -> Result<NewJob, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = errors.check("title", self.title.as_deref()).min_len(3).finish();
        let location = errors
            .check("location", self.location.as_deref())
            .min_len(3)
            .finish();
        let description = errors
            .check("description", self.description.as_deref())
            .min_len(10)
            .finish();
        let status = match self.status.as_deref() {
            None => Some(JobStatus::Draft),
            some => errors.check("status", some).choice::<JobStatus>(),
        };

        match (title, location, description, status) {
            (Some(title), Some(location), Some(description), Some(status)) if errors.is_empty() => {
                Ok(NewJob {
                    title,
                    location,
                    description,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StageForm {
    pub stage: Option<String>,
}

impl StageForm {
    pub fn validate(&self) -> Result<ApplicationStage, FieldErrors> {
        let mut errors = FieldErrors::new();
        let stage = errors
            .check("stage", self.stage.as_deref())
            .choice::<ApplicationStage>();
        stage.ok_or(errors)
    }
}
