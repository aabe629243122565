use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::ProfileUpdate;
use crate::{
    auth::repo_types::{Company, User},
    error::RepoError,
    files::repo::{find_file, repoint_file, FileRecord, NewFile},
};

/// A company's own profile and its logo file row.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Company>, RepoError>;
    /// Updates the account names and the company profile together.
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<(User, Company), RepoError>;
    async fn find_logo(&self, file_id: Uuid) -> Result<Option<FileRecord>, RepoError>;
    /// Points the existing file row at a newly stored object.
    async fn repoint_logo(&self, file_id: Uuid, file: &NewFile) -> Result<FileRecord, RepoError>;
}

#[derive(Clone)]
pub struct PgCompanyStore {
    db: PgPool,
}

impl PgCompanyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Company>, RepoError> {
        find_by_user(&self.db, user_id).await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<(User, Company), RepoError> {
        update_profile(&self.db, user_id, update).await
    }

    async fn find_logo(&self, file_id: Uuid) -> Result<Option<FileRecord>, RepoError> {
        Ok(find_file(&self.db, file_id).await?)
    }

    async fn repoint_logo(&self, file_id: Uuid, file: &NewFile) -> Result<FileRecord, RepoError> {
        repoint_file(&self.db, file_id, file)
            .await?
            .ok_or(RepoError::NotFound)
    }
}

const COMPANY_COLUMNS: &str = "id, user_id, logo_id, company_name, industry, ownership, phone, \
     company_phone, website, public_mail, bio, address, city, is_verified, created_at";

async fn find_by_user(db: &PgPool, user_id: Uuid) -> Result<Option<Company>, RepoError> {
    let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE user_id = $1");
    let row = sqlx::query_as::<_, Company>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

async fn update_profile(
    db: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<(User, Company), RepoError> {
    let mut tx = db.begin().await?;
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
           SET username = $2, fullname = $3
         WHERE id = $1
        RETURNING id, username, fullname, email, password_hash, role, email_verified, created_at
        "#,
    )
    .bind(user_id)
    .bind(&update.username)
    .bind(&update.fullname)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(RepoError::NotFound)?;

    let sql = format!(
        r#"
        UPDATE companies
           SET company_name = $2, industry = $3, ownership = $4, phone = $5,
               company_phone = $6, website = $7, public_mail = $8, bio = $9,
               address = $10, city = $11
         WHERE user_id = $1
        RETURNING {COMPANY_COLUMNS}
        "#
    );
    let company = sqlx::query_as::<_, Company>(&sql)
        .bind(user_id)
        .bind(&update.company_name)
        .bind(&update.industry)
        .bind(&update.ownership)
        .bind(&update.phone)
        .bind(&update.company_phone)
        .bind(&update.website)
        .bind(&update.public_mail)
        .bind(&update.bio)
        .bind(&update.address)
        .bind(&update.city)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound)?;
    tx.commit().await?;
    Ok((user, company))
}
