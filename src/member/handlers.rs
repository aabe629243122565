use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::MemberUser,
    error::{ApiError, ApiResult},
    jobs::repo_types::MemberApplication,
    state::AppState,
};

pub fn member_routes() -> Router<AppState> {
    Router::new().route("/member/applications", get(my_applications))
}

#[instrument(skip(state))]
pub async fn my_applications(
    State(state): State<AppState>,
    MemberUser(user): MemberUser,
) -> ApiResult<Json<Vec<MemberApplication>>> {
    let member = state
        .jobs
        .member_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member profile not found".into()))?;
    let applications = state.jobs.list_member_applications(member.id).await?;
    Ok(Json(applications))
}
