use axum::{
    extract::{DefaultBodyLimit, FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{
        AuthResponse, ForgotPasswordRequest, LoginRequest, Notice, PublicUser, RefreshRequest,
        RegisterResponse, ResetPasswordRequest, TokenRequest,
    },
    extractors::AuthUser,
    jwt::JwtKeys,
    repo_types::User,
    schema::{validate_email, validate_new_password, validate_sign_in},
    services::{self, LoginOutcome, RegisterError},
};
use crate::{
    config::UploadConfig,
    error::{ApiError, ApiResult, RepoError},
    state::AppState,
    validation::{max_size_message, FieldErrors, RawForm},
};

pub fn auth_routes(uploads: &UploadConfig) -> Router<AppState> {
    let register_limit = uploads.body_limit(uploads.logo_max_bytes);
    Router::new()
        .route(
            "/auth/register",
            post(register).layer(DefaultBodyLimit::max(register_limit)),
        )
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// POST /auth/register (multipart)
#[instrument(skip(state, mp))]
pub async fn register(
    State(state): State<AppState>,
    mp: Multipart,
) -> (StatusCode, Json<RegisterResponse>) {
    let logo_max = state.config.uploads.logo_max_bytes;
    let form = match RawForm::from_multipart(mp, logo_max).await {
        Ok(f) => f,
        // the logo is the only part that can carry a body this large
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(error = %e, "registration body over limit");
            let mut errors = FieldErrors::new();
            errors.add("logo", max_size_message("Logo", logo_max));
            return registration_failure(RegisterError::Invalid(errors));
        }
        Err(e) => {
            warn!(error = %e, "malformed registration body");
            return (
                StatusCode::BAD_REQUEST,
                Json(RegisterResponse::failed("Malformed form data")),
            );
        }
    };

    match services::register(&state, &form).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "user registered");
            (
                StatusCode::CREATED,
                Json(RegisterResponse::registered(user.role)),
            )
        }
        Err(e) => registration_failure(e),
    }
}

fn registration_failure(e: RegisterError) -> (StatusCode, Json<RegisterResponse>) {
    let (status, body) = match e {
        RegisterError::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            RegisterResponse::invalid(errors),
        ),
        RegisterError::MissingLogo => (
            StatusCode::BAD_REQUEST,
            RegisterResponse::failed("Logo is required for company registration"),
        ),
        RegisterError::EmailTaken => (
            StatusCode::CONFLICT,
            RegisterResponse::failed("Email already registered"),
        ),
        RegisterError::Store(RepoError::Unavailable(msg)) => {
            error!(error = %msg, "registration store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                RegisterResponse::failed("Registration failed, please try again later"),
            )
        }
        other => {
            error!(error = ?other, "registration failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                RegisterResponse::failed("Registration failed, please try again later"),
            )
        }
    };
    (status, Json(body))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let (email, password) =
        validate_sign_in(&payload.email, &payload.password).map_err(ApiError::Validation)?;

    match services::login(&state, &email, &password).await? {
        LoginOutcome::VerificationSent => Ok((
            StatusCode::FORBIDDEN,
            Json(Notice::new("Confirmation email sent!")),
        )
            .into_response()),
        LoginOutcome::Authenticated(user) => {
            info!(user_id = %user.id, email = %user.email, "user logged in");
            Ok(Json(issue_pair(&state, user)?).into_response())
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::Unauthorized("Invalid or expired token".into())
    })?;

    // Role may have changed since signing; reload before issuing.
    let user = state
        .accounts
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    Ok(Json(issue_pair(&state, user)?))
}

fn issue_pair(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}

#[instrument(skip(state))]
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<PublicUser>> {
    let user = state.accounts.find_by_id(user.id).await?.ok_or_else(|| {
        error!(user_id = %user.id, "user not found");
        ApiError::Unauthorized("User not found".into())
    })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Json<Notice>> {
    services::verify_email(&state, payload.token).await?;
    Ok(Json(Notice::new("Email verified!")))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Notice>> {
    let email = validate_email(&payload.email).map_err(ApiError::Validation)?;
    services::forgot_password(&state, &email).await?;
    Ok(Json(Notice::new("Reset email sent!")))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Notice>> {
    let password = validate_new_password(&payload.password).map_err(ApiError::Validation)?;
    services::reset_password(&state, payload.token, &password).await?;
    Ok(Json(Notice::new("Password updated!")))
}
