use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{ProfileForm, ProfileResponse},
    services::{company_of, ensure_verified, replace_logo, validate_logo_update},
};
use crate::{
    auth::extractors::CompanyUser,
    config::UploadConfig,
    error::{ApiError, ApiResult, RepoError},
    files::{self, repo::FileRecord},
    jobs::{
        dto::{JobForm, StageForm},
        repo_types::{Applicant, CompanyJob, Job, JobApplication},
    },
    state::AppState,
    validation::{max_size_message, FieldErrors, RawForm},
};

pub fn company_routes(uploads: &UploadConfig) -> Router<AppState> {
    let logo_limit = uploads.body_limit(uploads.logo_update_max_bytes);
    Router::new()
        .route("/company/profile", get(get_profile).put(update_profile))
        .route(
            "/company/logo",
            put(update_logo).layer(DefaultBodyLimit::max(logo_limit)),
        )
        .route("/company/jobs", get(list_jobs).post(create_job))
        .route("/company/jobs/:id", put(update_job).delete(delete_job))
        .route("/company/jobs/:id/applicants", get(list_applicants))
        .route("/company/applications/:id/stage", patch(move_stage))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state
        .accounts
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    let company = company_of(&state, auth.id).await?;

    let logo_url = match state.companies.find_logo(company.logo_id).await? {
        Some(file) => match files::services::presign(state.storage.as_ref(), &file.src).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, company_id = %company.id, "logo presign failed");
                None
            }
        },
        None => None,
    };

    Ok(Json(ProfileResponse {
        user: user.into(),
        company,
        logo_url,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    Json(payload): Json<ProfileForm>,
) -> ApiResult<Json<ProfileResponse>> {
    let update = payload.validate().map_err(ApiError::Validation)?;
    let (user, company) = state.companies.update_profile(auth.id, &update).await?;
    info!(user_id = %user.id, company_id = %company.id, "company profile updated");
    Ok(Json(ProfileResponse {
        user: user.into(),
        company,
        logo_url: None,
    }))
}

/// PUT /company/logo (multipart, field `logo`)
#[instrument(skip(state, mp))]
pub async fn update_logo(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    mp: Multipart,
) -> ApiResult<Json<FileRecord>> {
    let max = state.config.uploads.logo_update_max_bytes;
    let form = RawForm::from_multipart(mp, max).await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            let mut errors = FieldErrors::new();
            errors.add("logo", max_size_message("Logo", max));
            return ApiError::Validation(errors);
        }
        ApiError::BadRequest(format!("Malformed form data: {e}"))
    })?;
    let logo = validate_logo_update(&form, max).map_err(ApiError::Validation)?;
    let company = company_of(&state, auth.id).await?;
    Ok(Json(replace_logo(&state, &company, &logo).await?))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
) -> ApiResult<Json<Vec<CompanyJob>>> {
    let company = company_of(&state, auth.id).await?;
    Ok(Json(state.jobs.list_company_jobs(company.id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    Json(payload): Json<JobForm>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    let company = company_of(&state, auth.id).await?;
    ensure_verified(&company)?;
    let new_job = payload.validate().map_err(ApiError::Validation)?;
    let job = state.jobs.insert_job(company.id, &new_job).await?;
    info!(job_id = %job.id, company_id = %company.id, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

#[instrument(skip(state, payload))]
pub async fn update_job(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobForm>,
) -> ApiResult<Json<Job>> {
    let company = company_of(&state, auth.id).await?;
    let new_job = payload.validate().map_err(ApiError::Validation)?;
    let job = state
        .jobs
        .update_job(company.id, id, &new_job)
        .await
        .map_err(not_found("Job not found"))?;
    Ok(Json(job))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let company = company_of(&state, auth.id).await?;
    state
        .jobs
        .delete_job(company.id, id)
        .await
        .map_err(not_found("Job not found"))?;
    info!(job_id = %id, company_id = %company.id, "job deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_applicants(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Applicant>>> {
    let company = company_of(&state, auth.id).await?;
    Ok(Json(state.jobs.list_applicants(company.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn move_stage(
    State(state): State<AppState>,
    CompanyUser(auth): CompanyUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StageForm>,
) -> ApiResult<Json<JobApplication>> {
    let stage = payload.validate().map_err(ApiError::Validation)?;
    let company = company_of(&state, auth.id).await?;
    let application = state
        .jobs
        .set_stage(company.id, id, stage)
        .await
        .map_err(not_found("Application not found"))?;
    info!(application_id = %id, stage = ?stage, "application stage moved");
    Ok(Json(application))
}

fn not_found(message: &'static str) -> impl Fn(RepoError) -> ApiError {
    move |e| match e {
        RepoError::NotFound => ApiError::NotFound(message.into()),
        other => other.into(),
    }
}
