use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Article, News, NewPost};
use crate::error::RepoError;

/// Public reads of published posts, newest first.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn news(&self) -> Result<Vec<News>, RepoError>;
    async fn articles(&self) -> Result<Vec<Article>, RepoError>;
}

#[derive(Clone)]
pub struct PgContentStore {
    db: PgPool,
}

impl PgContentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn news(&self) -> Result<Vec<News>, RepoError> {
        list_news(&self.db).await
    }

    async fn articles(&self) -> Result<Vec<Article>, RepoError> {
        list_articles(&self.db).await
    }
}

pub async fn list_news(db: &PgPool) -> Result<Vec<News>, RepoError> {
    let rows = sqlx::query_as::<_, News>(
        r#"SELECT id, title, content, created_at FROM news ORDER BY created_at DESC"#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_articles(db: &PgPool) -> Result<Vec<Article>, RepoError> {
    let rows = sqlx::query_as::<_, Article>(
        r#"SELECT id, title, content, created_at FROM articles ORDER BY created_at DESC"#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert_news(db: &PgPool, post: &NewPost) -> Result<News, RepoError> {
    let row = sqlx::query_as::<_, News>(
        r#"
        INSERT INTO news (title, content)
        VALUES ($1, $2)
        RETURNING id, title, content, created_at
        "#,
    )
    .bind(&post.title)
    .bind(&post.content)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn insert_article(db: &PgPool, post: &NewPost) -> Result<Article, RepoError> {
    let row = sqlx::query_as::<_, Article>(
        r#"
        INSERT INTO articles (title, content)
        VALUES ($1, $2)
        RETURNING id, title, content, created_at
        "#,
    )
    .bind(&post.title)
    .bind(&post.content)
    .fetch_one(db)
    .await?;
    Ok(row)
}
