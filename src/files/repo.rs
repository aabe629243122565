use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored upload: `src` is the object key inside the storage bucket.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub bucket: String,
    pub src: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An object already written to storage, waiting for its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub id: Uuid,
    pub bucket: String,
    pub src: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Insert a file row on an open connection (usually inside a transaction).
pub async fn insert_file(conn: &mut PgConnection, file: &NewFile) -> Result<FileRecord, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(
        r#"
        INSERT INTO files (id, bucket, src, content_type, size_bytes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, bucket, src, content_type, size_bytes, created_at
        "#,
    )
    .bind(file.id)
    .bind(&file.bucket)
    .bind(&file.src)
    .bind(&file.content_type)
    .bind(file.size_bytes)
    .fetch_one(conn)
    .await
}

pub async fn find_file(db: &PgPool, id: Uuid) -> Result<Option<FileRecord>, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(
        r#"
        SELECT id, bucket, src, content_type, size_bytes, created_at
          FROM files
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Point an existing file row at a newly stored object.
pub async fn repoint_file(
    db: &PgPool,
    id: Uuid,
    file: &NewFile,
) -> Result<Option<FileRecord>, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(
        r#"
        UPDATE files
           SET src = $2, content_type = $3, size_bytes = $4
         WHERE id = $1
        RETURNING id, bucket, src, content_type, size_bytes, created_at
        "#,
    )
    .bind(id)
    .bind(&file.src)
    .bind(&file.content_type)
    .bind(file.size_bytes)
    .fetch_optional(db)
    .await
}
