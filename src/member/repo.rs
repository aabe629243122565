use sqlx::PgPool;
use uuid::Uuid;

use crate::{auth::repo_types::Member, error::RepoError};

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> Result<Option<Member>, RepoError> {
    let row = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, user_id, member_type, nim, phone, created_at
          FROM members
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
