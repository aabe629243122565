use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::VerificationRequest,
    repo_types::{CompanyWithUser, Contents, Entity, MemberWithUser},
    services,
};
use crate::{
    auth::{dto::Notice, extractors::AdminUser, repo_types::{Company, User}},
    content::{
        dto::PostForm,
        repo_types::{Article, News},
    },
    error::{ApiError, ApiResult, RepoError},
    jobs::repo_types::{Job, JobApplication},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/companies", get(list_companies))
        .route("/admin/members", get(list_members))
        .route("/admin/jobs", get(list_jobs))
        .route("/admin/job-applications", get(list_job_applications))
        .route("/admin/contents", get(list_contents))
        .route("/admin/users/:id", delete(delete_user))
        .route("/admin/companies/:id", delete(delete_company))
        .route("/admin/members/:id", delete(delete_member))
        .route("/admin/news/:id", delete(delete_news))
        .route("/admin/articles/:id", delete(delete_article))
        .route("/admin/companies/:id/verification", patch(set_verification))
        .route("/admin/news", post(create_news))
        .route("/admin/articles", post(create_article))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.admin.users().await?))
}

#[instrument(skip(state))]
pub async fn list_companies(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<CompanyWithUser>>> {
    Ok(Json(state.admin.companies().await?))
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<MemberWithUser>>> {
    Ok(Json(state.admin.members().await?))
}

#[instrument(skip(state))]
pub async fn list_jobs(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Vec<Job>>> {
    Ok(Json(state.admin.jobs().await?))
}

#[instrument(skip(state))]
pub async fn list_job_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<JobApplication>>> {
    Ok(Json(state.admin.job_applications().await?))
}

#[instrument(skip(state))]
pub async fn list_contents(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Contents>> {
    Ok(Json(services::get_contents(state.admin.as_ref()).await?))
}

async fn remove(state: &AppState, entity: Entity, id: Uuid) -> Response {
    match services::delete(state.admin.as_ref(), entity, id).await {
        Ok(message) => Json(Notice::new(&message)).into_response(),
        Err(failure) => failure.into_response(),
    }
}

#[instrument(skip(state))]
pub async fn delete_user(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Response {
    remove(&state, Entity::User, id).await
}

#[instrument(skip(state))]
pub async fn delete_company(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Response {
    remove(&state, Entity::Company, id).await
}

#[instrument(skip(state))]
pub async fn delete_member(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Response {
    remove(&state, Entity::Member, id).await
}

#[instrument(skip(state))]
pub async fn delete_news(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Response {
    remove(&state, Entity::News, id).await
}

#[instrument(skip(state))]
pub async fn delete_article(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> Response {
    remove(&state, Entity::Article, id).await
}

#[instrument(skip(state))]
pub async fn set_verification(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerificationRequest>,
) -> ApiResult<Json<Company>> {
    let company = state
        .admin
        .set_company_verified(id, payload.verified)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => ApiError::NotFound("Company not found".into()),
            other => other.into(),
        })?;
    info!(admin_id = %admin.id, company_id = %id, verified = payload.verified, "company verification changed");
    Ok(Json(company))
}

#[instrument(skip(state, payload))]
pub async fn create_news(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<PostForm>,
) -> ApiResult<(StatusCode, Json<News>)> {
    let post = payload.validate().map_err(ApiError::Validation)?;
    Ok((StatusCode::CREATED, Json(state.admin.create_news(post).await?)))
}

#[instrument(skip(state, payload))]
pub async fn create_article(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<PostForm>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let post = payload.validate().map_err(ApiError::Validation)?;
    Ok((StatusCode::CREATED, Json(state.admin.create_article(post).await?)))
}
