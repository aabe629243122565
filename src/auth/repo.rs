use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::repo_types::{
        AccountToken, Company, Member, NewCompany, NewMember, NewUser, TokenPurpose, User,
    },
    error::RepoError,
    files::repo::{insert_file, NewFile},
};

/// Account writes and lookups. Multi-row account creation is atomic: either
/// every row lands or none does.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
    async fn create_member_account(
        &self,
        user: NewUser,
        member: NewMember,
    ) -> Result<(User, Member), RepoError>;
    async fn create_company_account(
        &self,
        user: NewUser,
        logo: NewFile,
        company: NewCompany,
    ) -> Result<(User, Company), RepoError>;
    async fn mark_email_verified(&self, email: &str) -> Result<(), RepoError>;
    async fn set_password(&self, email: &str, password_hash: &str) -> Result<(), RepoError>;
    /// Replaces any outstanding token of the same purpose for `email`.
    async fn issue_token(
        &self,
        email: &str,
        kind: TokenPurpose,
        ttl: Duration,
    ) -> Result<AccountToken, RepoError>;
    /// Removes and returns the token; a token can be taken once.
    async fn take_token(
        &self,
        token: Uuid,
        kind: TokenPurpose,
    ) -> Result<Option<AccountToken>, RepoError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn insert_user(conn: &mut PgConnection, user: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, fullname, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, fullname, email, password_hash, role, email_verified, created_at
        "#,
    )
    .bind(&user.username)
    .bind(&user.fullname)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .fetch_one(conn)
    .await
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, fullname, email, password_hash, role, email_verified, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, fullname, email, password_hash, role, email_verified, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let mut conn = self.db.acquire().await?;
        Ok(insert_user(&mut *conn, &user).await?)
    }

    async fn create_member_account(
        &self,
        user: NewUser,
        member: NewMember,
    ) -> Result<(User, Member), RepoError> {
        let mut tx = self.db.begin().await?;
        let user = insert_user(&mut *tx, &user).await?;
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (user_id, member_type, nim, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, member_type, nim, phone, created_at
            "#,
        )
        .bind(user.id)
        .bind(member.member_type)
        .bind(&member.nim)
        .bind(&member.phone)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        debug!(user_id = %user.id, member_id = %member.id, "member account committed");
        Ok((user, member))
    }

    async fn create_company_account(
        &self,
        user: NewUser,
        logo: NewFile,
        company: NewCompany,
    ) -> Result<(User, Company), RepoError> {
        let mut tx = self.db.begin().await?;
        let user = insert_user(&mut *tx, &user).await?;
        let logo = insert_file(&mut *tx, &logo).await?;
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (user_id, logo_id, company_name, industry, ownership, phone,
                 company_phone, website, public_mail, bio)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, logo_id, company_name, industry, ownership, phone,
                      company_phone, website, public_mail, bio, address, city,
                      is_verified, created_at
            "#,
        )
        .bind(user.id)
        .bind(logo.id)
        .bind(&company.company_name)
        .bind(&company.industry)
        .bind(&company.ownership)
        .bind(&company.phone)
        .bind(&company.company_phone)
        .bind(&company.website)
        .bind(&company.public_mail)
        .bind(&company.bio)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        debug!(user_id = %user.id, company_id = %company.id, "company account committed");
        Ok((user, company))
    }

    async fn mark_email_verified(&self, email: &str) -> Result<(), RepoError> {
        let res = sqlx::query(r#"UPDATE users SET email_verified = now() WHERE email = $1"#)
            .bind(email)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn set_password(&self, email: &str, password_hash: &str) -> Result<(), RepoError> {
        let res = sqlx::query(r#"UPDATE users SET password_hash = $2 WHERE email = $1"#)
            .bind(email)
            .bind(password_hash)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn issue_token(
        &self,
        email: &str,
        kind: TokenPurpose,
        ttl: Duration,
    ) -> Result<AccountToken, RepoError> {
        let mut tx = self.db.begin().await?;
        sqlx::query(r#"DELETE FROM account_tokens WHERE email = $1 AND kind = $2"#)
            .bind(email)
            .bind(kind)
            .execute(&mut *tx)
            .await?;
        let token = sqlx::query_as::<_, AccountToken>(
            r#"
            INSERT INTO account_tokens (token, email, kind, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING token, email, kind, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(kind)
        .bind(OffsetDateTime::now_utc() + ttl)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(token)
    }

    async fn take_token(
        &self,
        token: Uuid,
        kind: TokenPurpose,
    ) -> Result<Option<AccountToken>, RepoError> {
        let row = sqlx::query_as::<_, AccountToken>(
            r#"
            DELETE FROM account_tokens
             WHERE token = $1 AND kind = $2
            RETURNING token, email, kind, expires_at
            "#,
        )
        .bind(token)
        .bind(kind)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
