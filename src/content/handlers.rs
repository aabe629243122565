use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo_types::{Article, News};
use crate::{error::ApiResult, state::AppState};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news))
        .route("/articles", get(list_articles))
}

#[instrument(skip(state))]
pub async fn list_news(State(state): State<AppState>) -> ApiResult<Json<Vec<News>>> {
    Ok(Json(state.content.news().await?))
}

#[instrument(skip(state))]
pub async fn list_articles(State(state): State<AppState>) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(state.content.articles().await?))
}
