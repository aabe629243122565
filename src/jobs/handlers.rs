use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::Pagination,
    repo_types::{JobApplication, JobListing, JobStatus},
    services,
};
use crate::{
    auth::extractors::MemberUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
}

pub fn member_routes() -> Router<AppState> {
    Router::new().route("/jobs/:id/apply", post(apply))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<JobListing>>> {
    let (limit, offset) = p.bounded();
    let jobs = state
        .jobs
        .list_jobs_with_status(JobStatus::Active, limit, offset)
        .await?;
    Ok(Json(jobs))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JobListing>> {
    state
        .jobs
        .find_listing(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Job not found".into()))
}

#[instrument(skip(state))]
pub async fn apply(
    State(state): State<AppState>,
    MemberUser(user): MemberUser,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<JobApplication>)> {
    let application = services::apply(&state, user.id, id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}
