use anyhow::Context;
use tracing::{debug, warn};
use uuid::Uuid;

use super::repo::NewFile;
use crate::{storage::StorageClient, validation::UploadedFile};

/// Bucket holding company logos.
pub const COMPANY_LOGOS: &str = "company-logos";

const PRESIGN_TTL_SECS: u64 = 30 * 60;

/// Write an upload under `bucket` and describe the row that should reference it.
pub async fn save(
    storage: &dyn StorageClient,
    bucket: &str,
    upload: &UploadedFile,
) -> anyhow::Result<NewFile> {
    anyhow::ensure!(!upload.is_empty(), "refusing to store an empty upload");

    let id = Uuid::new_v4();
    let ext = ext_from_mime(&upload.content_type)
        .map(str::to_string)
        .or_else(|| upload.extension())
        .unwrap_or_else(|| "bin".into());
    let key = format!("{}/{}.{}", bucket, id, ext);
    storage
        .put_object(&key, upload.bytes.clone(), &upload.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    debug!(%key, size = upload.bytes.len(), "file stored");

    Ok(NewFile {
        id,
        bucket: bucket.to_string(),
        src: key,
        content_type: upload.content_type.clone(),
        size_bytes: upload.bytes.len() as i64,
    })
}

/// Remove a stored object whose row never landed (or was repointed).
/// Failures are logged: the caller has already decided the outcome.
pub async fn discard(storage: &dyn StorageClient, key: &str) {
    if let Err(e) = storage.delete_object(key).await {
        warn!(error = %e, %key, "failed to delete stored object; it is now orphaned");
    } else {
        debug!(%key, "stored object deleted");
    }
}

pub async fn presign(storage: &dyn StorageClient, key: &str) -> anyhow::Result<String> {
    storage
        .presign_get(key, PRESIGN_TTL_SECS)
        .await
        .with_context(|| format!("presign url for {}", key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
