use crate::{config::UploadConfig, state::AppState};
use axum::Router;

mod claims;
pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod schema;
pub mod services;

pub fn router(uploads: &UploadConfig) -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes(uploads))
        .merge(handlers::me_routes())
}
