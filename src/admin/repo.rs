use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{CompanyOwnerRow, CompanyWithUser, Entity, MemberOwnerRow, MemberWithUser};
use crate::{
    auth::repo_types::{Company, User},
    content::{
        repo as content_repo,
        repo_types::{Article, NewPost, News},
    },
    error::RepoError,
    jobs::{
        repo as jobs_repo,
        repo_types::{Job, JobApplication},
    },
};

/// Read-all and delete-by-id over every entity, for the admin console.
/// Each method is one round trip to the store.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn users(&self) -> Result<Vec<User>, RepoError>;
    async fn companies(&self) -> Result<Vec<CompanyWithUser>, RepoError>;
    async fn members(&self) -> Result<Vec<MemberWithUser>, RepoError>;
    async fn jobs(&self) -> Result<Vec<Job>, RepoError>;
    async fn job_applications(&self) -> Result<Vec<JobApplication>, RepoError>;
    async fn news(&self) -> Result<Vec<News>, RepoError>;
    async fn articles(&self) -> Result<Vec<Article>, RepoError>;
    /// `NotFound` when no row had that id.
    async fn delete(&self, entity: Entity, id: Uuid) -> Result<(), RepoError>;
    async fn set_company_verified(&self, id: Uuid, verified: bool) -> Result<Company, RepoError>;
    async fn create_news(&self, post: NewPost) -> Result<News, RepoError>;
    async fn create_article(&self, post: NewPost) -> Result<Article, RepoError>;
}

#[derive(Clone)]
pub struct PgAdminStore {
    db: PgPool,
}

impl PgAdminStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const OWNER_COLUMNS: &str =
    "u.username AS owner_username, u.fullname AS owner_fullname, u.email AS owner_email, u.role AS owner_role";

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn users(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, fullname, email, password_hash, role, email_verified, created_at
              FROM users
             ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn companies(&self) -> Result<Vec<CompanyWithUser>, RepoError> {
        let sql = format!(
            r#"
            SELECT c.id, c.user_id, c.logo_id, c.company_name, c.industry, c.ownership, c.phone,
                   c.company_phone, c.website, c.public_mail, c.bio, c.address, c.city,
                   c.is_verified, c.created_at, {OWNER_COLUMNS}
              FROM companies c
              JOIN users u ON u.id = c.user_id
             ORDER BY c.created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, CompanyOwnerRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn members(&self) -> Result<Vec<MemberWithUser>, RepoError> {
        let sql = format!(
            r#"
            SELECT m.id, m.user_id, m.member_type, m.nim, m.phone, m.created_at, {OWNER_COLUMNS}
              FROM members m
              JOIN users u ON u.id = m.user_id
             ORDER BY m.created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, MemberOwnerRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn jobs(&self) -> Result<Vec<Job>, RepoError> {
        jobs_repo::list_all_jobs(&self.db).await
    }

    async fn job_applications(&self) -> Result<Vec<JobApplication>, RepoError> {
        jobs_repo::list_all_applications(&self.db).await
    }

    async fn news(&self) -> Result<Vec<News>, RepoError> {
        content_repo::list_news(&self.db).await
    }

    async fn articles(&self) -> Result<Vec<Article>, RepoError> {
        content_repo::list_articles(&self.db).await
    }

    async fn delete(&self, entity: Entity, id: Uuid) -> Result<(), RepoError> {
        // table names come from a closed enum, never from input
        let sql = format!("DELETE FROM {} WHERE id = $1", entity.table());
        let res = sqlx::query(&sql).bind(id).execute(&self.db).await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn set_company_verified(&self, id: Uuid, verified: bool) -> Result<Company, RepoError> {
        let row = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
               SET is_verified = $2
             WHERE id = $1
            RETURNING id, user_id, logo_id, company_name, industry, ownership, phone,
                      company_phone, website, public_mail, bio, address, city,
                      is_verified, created_at
            "#,
        )
        .bind(id)
        .bind(verified)
        .fetch_optional(&self.db)
        .await?;
        row.ok_or(RepoError::NotFound)
    }

    async fn create_news(&self, post: NewPost) -> Result<News, RepoError> {
        content_repo::insert_news(&self.db, &post).await
    }

    async fn create_article(&self, post: NewPost) -> Result<Article, RepoError> {
        content_repo::insert_article(&self.db, &post).await
    }
}
