use tracing::info;
use uuid::Uuid;

use super::repo_types::{Job, JobApplication, JobStatus};
use crate::{
    error::{ApiError, ApiResult, RepoError},
    state::AppState,
};

/// Only active jobs take applications.
pub fn ensure_open(job: &Job) -> ApiResult<()> {
    if job.status != JobStatus::Active {
        return Err(ApiError::Conflict(
            "This job is not accepting applications".into(),
        ));
    }
    Ok(())
}

pub async fn apply(st: &AppState, user_id: Uuid, job_id: Uuid) -> ApiResult<JobApplication> {
    let member = st
        .jobs
        .member_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member profile not found".into()))?;
    let job = st
        .jobs
        .find_job(job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".into()))?;
    ensure_open(&job)?;

    let application = st
        .jobs
        .insert_application(job.id, member.id)
        .await
        .map_err(|e| match e {
            RepoError::Conflict(_) => {
                ApiError::Conflict("You have already applied to this job".into())
            }
            other => other.into(),
        })?;
    info!(application_id = %application.id, %job_id, member_id = %member.id, "application submitted");
    Ok(application)
}
