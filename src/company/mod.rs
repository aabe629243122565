pub mod dto;
mod handlers;
pub mod repo;
pub mod services;

use crate::{config::UploadConfig, state::AppState};
use axum::Router;

pub fn router(uploads: &UploadConfig) -> Router<AppState> {
    handlers::company_routes(uploads)
}
