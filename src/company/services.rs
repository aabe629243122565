use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::repo_types::Company,
    error::{ApiError, ApiResult},
    files::{
        repo::FileRecord,
        services::{self as files, COMPANY_LOGOS},
    },
    state::AppState,
    validation::{max_size_message, FieldErrors, RawForm, UploadedFile},
};

const LOGO_UPDATE_TYPES: &[&str] = &["image/png", "image/webp", "image/jpg", "image/jpeg"];

pub async fn company_of(st: &AppState, user_id: Uuid) -> ApiResult<Company> {
    st.companies
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company profile not found".into()))
}

/// Job postings are reserved for companies an admin has verified.
pub fn ensure_verified(company: &Company) -> ApiResult<()> {
    if !company.is_verified {
        warn!(company_id = %company.id, "unverified company tried to post a job");
        return Err(ApiError::Forbidden(
            "You are not allowed to post jobs until your company is verified".into(),
        ));
    }
    Ok(())
}

pub fn validate_logo_update(form: &RawForm, max_bytes: usize) -> Result<UploadedFile, FieldErrors> {
    let mut errors = FieldErrors::new();
    let too_big = max_size_message("Logo", max_bytes);
    let logo = errors
        .check_file("logo", form.file("logo"))
        .content_type_in(LOGO_UPDATE_TYPES, "Only PNG, JPG, JPEG and WebP files are allowed")
        .max_bytes(max_bytes, &too_big)
        .finish();
    logo.ok_or(errors)
}

/// Store the new logo, point the company's file row at it, then drop the old object.
pub async fn replace_logo(st: &AppState, company: &Company, logo: &UploadedFile) -> ApiResult<FileRecord> {
    let current = st
        .companies
        .find_logo(company.logo_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Logo not found".into()))?;

    let stored = files::save(st.storage.as_ref(), COMPANY_LOGOS, logo).await?;
    let updated = match st.companies.repoint_logo(current.id, &stored).await {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, key = %stored.src, "logo row not updated; removing new object");
            files::discard(st.storage.as_ref(), &stored.src).await;
            return Err(e.into());
        }
    };
    files::discard(st.storage.as_ref(), &current.src).await;
    info!(company_id = %company.id, old = %current.src, new = %updated.src, "company logo replaced");
    Ok(updated)
}
