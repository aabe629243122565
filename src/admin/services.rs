use tracing::{info, warn};
use uuid::Uuid;

use super::{
    repo::AdminStore,
    repo_types::{Contents, Entity},
};
use crate::error::RepoError;

/// News and articles, or an error if either read fails.
pub async fn get_contents(store: &dyn AdminStore) -> Result<Contents, RepoError> {
    let (news, articles) = tokio::try_join!(store.news(), store.articles())?;
    Ok(Contents { news, articles })
}

#[derive(Debug)]
pub struct DeleteFailure {
    pub entity: Entity,
    pub cause: RepoError,
}

/// Hard-delete one row. Success carries the confirmation text shown to the admin.
pub async fn delete(store: &dyn AdminStore, entity: Entity, id: Uuid) -> Result<String, DeleteFailure> {
    match store.delete(entity, id).await {
        Ok(()) => {
            info!(?entity, %id, "admin delete");
            Ok(entity.deleted_message())
        }
        Err(cause) => {
            warn!(?entity, %id, error = %cause, "admin delete failed");
            Err(DeleteFailure { entity, cause })
        }
    }
}
