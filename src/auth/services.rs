//! Account flows: registration, sign-in, email verification and password reset.

use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    password::{hash_password, verify_password},
    repo_types::{NewUser, Role, TokenPurpose, User},
    schema::{validate_registration, Registration},
};
use crate::{
    error::{ApiError, RepoError},
    files::services::{self as files, COMPANY_LOGOS},
    mailer::Mail,
    state::AppState,
    validation::{FieldErrors, RawForm},
};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("validation failed")]
    Invalid(FieldErrors),
    #[error("logo is required for company registration")]
    MissingLogo,
    #[error("email is already registered")]
    EmailTaken,
    #[error("logo upload failed")]
    Upload(#[source] anyhow::Error),
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),
    #[error(transparent)]
    Store(RepoError),
}

impl From<RepoError> for RegisterError {
    fn from(e: RepoError) -> Self {
        match e {
            // email is the only unique column a fresh account can collide on
            RepoError::Conflict(_) => RegisterError::EmailTaken,
            other => RegisterError::Store(other),
        }
    }
}

/// Validate a submission and create the user with its role profile.
///
/// Nothing is written unless validation passes. A company's logo is stored
/// before the account transaction opens; if the transaction fails the
/// object is deleted again, so a failed registration leaves neither rows
/// nor files behind.
pub async fn register(st: &AppState, form: &RawForm) -> Result<User, RegisterError> {
    let registration = validate_registration(form, st.config.uploads.logo_max_bytes)
        .map_err(RegisterError::Invalid)?;

    if let Registration::Company(c) = &registration {
        if c.logo.is_empty() {
            return Err(RegisterError::MissingLogo);
        }
    }

    let account = registration.account();
    if st.accounts.find_by_email(&account.email).await?.is_some() {
        return Err(RegisterError::EmailTaken);
    }

    let password_hash =
        hash_password(&account.password, &st.config.password).map_err(RegisterError::Hash)?;
    let new_user = NewUser {
        username: account.username.clone(),
        fullname: account.fullname.clone(),
        email: account.email.clone(),
        password_hash,
        role: registration.role(),
    };

    let user = match registration {
        Registration::Member(m) => {
            let (user, member) = st.accounts.create_member_account(new_user, m.member).await?;
            info!(user_id = %user.id, member_id = %member.id, "member registered");
            user
        }
        Registration::Company(c) => {
            let logo = files::save(st.storage.as_ref(), COMPANY_LOGOS, &c.logo)
                .await
                .map_err(RegisterError::Upload)?;
            let key = logo.src.clone();
            match st.accounts.create_company_account(new_user, logo, c.company).await {
                Ok((user, company)) => {
                    info!(user_id = %user.id, company_id = %company.id, "company registered");
                    user
                }
                Err(e) => {
                    warn!(error = %e, %key, "company account rejected; removing stored logo");
                    files::discard(st.storage.as_ref(), &key).await;
                    return Err(e.into());
                }
            }
        }
    };
    Ok(user)
}

pub enum LoginOutcome {
    Authenticated(User),
    /// Credentials were right but the email is unverified; a fresh
    /// verification link went out instead.
    VerificationSent,
}

pub async fn login(st: &AppState, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
    let Some(user) = st.accounts.find_by_email(email).await? else {
        warn!(%email, "login unknown email");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    if user.email_verified.is_none() {
        send_token(st, &user.email, TokenPurpose::EmailVerification).await?;
        info!(user_id = %user.id, "verification email sent on login");
        return Ok(LoginOutcome::VerificationSent);
    }

    Ok(LoginOutcome::Authenticated(user))
}

pub async fn verify_email(st: &AppState, token: Uuid) -> Result<(), ApiError> {
    let token = redeem(st, token, TokenPurpose::EmailVerification).await?;
    st.accounts.mark_email_verified(&token.email).await.map_err(|e| match e {
        RepoError::NotFound => ApiError::BadRequest("Email does not exist".into()),
        other => other.into(),
    })?;
    info!(email = %token.email, "email verified");
    Ok(())
}

/// Sends a reset link when the account exists. Unknown emails get the same
/// answer so the endpoint cannot be used to probe for accounts.
pub async fn forgot_password(st: &AppState, email: &str) -> Result<(), ApiError> {
    if st.accounts.find_by_email(email).await?.is_some() {
        send_token(st, email, TokenPurpose::PasswordReset).await?;
        info!(%email, "password reset requested");
    } else {
        warn!(%email, "password reset for unknown email");
    }
    Ok(())
}

pub async fn reset_password(st: &AppState, token: Uuid, password: &str) -> Result<(), ApiError> {
    let token = redeem(st, token, TokenPurpose::PasswordReset).await?;
    let hash = hash_password(password, &st.config.password)?;
    st.accounts.set_password(&token.email, &hash).await?;
    info!(email = %token.email, "password reset");
    Ok(())
}

async fn send_token(st: &AppState, email: &str, kind: TokenPurpose) -> Result<(), ApiError> {
    let ttl = Duration::minutes(st.config.token_ttl_minutes);
    let token = st.accounts.issue_token(email, kind, ttl).await?;
    let base = st.config.public_base_url.trim_end_matches('/');
    let mail = match kind {
        TokenPurpose::EmailVerification => Mail::verification(
            email,
            &format!("{}/new-verification?token={}", base, token.token),
        ),
        TokenPurpose::PasswordReset => Mail::password_reset(
            email,
            &format!("{}/reset-password?token={}", base, token.token),
        ),
    };
    st.mailer.send(mail).await?;
    Ok(())
}

async fn redeem(
    st: &AppState,
    token: Uuid,
    kind: TokenPurpose,
) -> Result<super::repo_types::AccountToken, ApiError> {
    let token = st
        .accounts
        .take_token(token, kind)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid or expired token".into()))?;
    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(ApiError::BadRequest("Invalid or expired token".into()));
    }
    Ok(token)
}

/// Creates the configured admin account on first start.
pub async fn seed_admin(st: &AppState) -> anyhow::Result<()> {
    let Some(seed) = st.config.admin_seed.clone() else {
        return Ok(());
    };
    let email = seed.email.trim().to_lowercase();
    if st.accounts.find_by_email(&email).await?.is_some() {
        return Ok(());
    }
    let password_hash = hash_password(&seed.password, &st.config.password)?;
    let admin = st
        .accounts
        .create_user(NewUser {
            username: "admin".into(),
            fullname: "Administrator".into(),
            email: email.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    st.accounts.mark_email_verified(&email).await?;
    info!(user_id = %admin.id, %email, "admin account seeded");
    Ok(())
}
