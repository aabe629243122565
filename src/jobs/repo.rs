use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{
    Applicant, ApplicationStage, CompanyJob, Job, JobApplication, JobListing, JobStatus,
    MemberApplication, NewJob,
};
use crate::{auth::repo_types::Member, error::RepoError, member};

const JOB_COLUMNS: &str = "j.id, j.company_id, j.status, j.title, j.location, j.description, j.created_at";

/// Postings and applications. Company-scoped calls treat another company's
/// rows as missing.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn member_by_user(&self, user_id: Uuid) -> Result<Option<Member>, RepoError>;
    async fn insert_job(&self, company_id: Uuid, job: &NewJob) -> Result<Job, RepoError>;
    async fn update_job(&self, company_id: Uuid, id: Uuid, job: &NewJob) -> Result<Job, RepoError>;
    async fn delete_job(&self, company_id: Uuid, id: Uuid) -> Result<(), RepoError>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, RepoError>;
    /// The company's jobs, newest first, with applicant counts per stage.
    async fn list_company_jobs(&self, company_id: Uuid) -> Result<Vec<CompanyJob>, RepoError>;
    async fn list_jobs_with_status(
        &self,
        status: JobStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobListing>, RepoError>;
    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>, RepoError>;
    /// New applications start at `DocumentScreening`. A second application to
    /// the same job is a `Conflict`.
    async fn insert_application(
        &self,
        job_id: Uuid,
        member_id: Uuid,
    ) -> Result<JobApplication, RepoError>;
    async fn list_applicants(
        &self,
        company_id: Uuid,
        job_id: Uuid,
    ) -> Result<Vec<Applicant>, RepoError>;
    async fn set_stage(
        &self,
        company_id: Uuid,
        application_id: Uuid,
        stage: ApplicationStage,
    ) -> Result<JobApplication, RepoError>;
    async fn list_member_applications(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<MemberApplication>, RepoError>;
}

#[derive(Clone)]
pub struct PgJobStore {
    db: PgPool,
}

impl PgJobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn member_by_user(&self, user_id: Uuid) -> Result<Option<Member>, RepoError> {
        member::repo::find_by_user(&self.db, user_id).await
    }

    async fn insert_job(&self, company_id: Uuid, job: &NewJob) -> Result<Job, RepoError> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (company_id, status, title, location, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, status, title, location, description, created_at
            "#,
        )
        .bind(company_id)
        .bind(job.status)
        .bind(&job.title)
        .bind(&job.location)
        .bind(&job.description)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_job(
        &self,
        company_id: Uuid,
        id: Uuid,
        job: &NewJob,
    ) -> Result<Job, RepoError> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
               SET status = $3, title = $4, location = $5, description = $6
             WHERE id = $1 AND company_id = $2
            RETURNING id, company_id, status, title, location, description, created_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(job.status)
        .bind(&job.title)
        .bind(&job.location)
        .bind(&job.description)
        .fetch_optional(&self.db)
        .await?;
        row.ok_or(RepoError::NotFound)
    }

    async fn delete_job(&self, company_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let res = sqlx::query(r#"DELETE FROM jobs WHERE id = $1 AND company_id = $2"#)
            .bind(id)
            .bind(company_id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, RepoError> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company_id, status, title, location, description, created_at
              FROM jobs
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_company_jobs(&self, company_id: Uuid) -> Result<Vec<CompanyJob>, RepoError> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS},
                   COUNT(a.id) AS total,
                   COUNT(a.id) FILTER (WHERE a.stage = 'document_screening') AS document_screening,
                   COUNT(a.id) FILTER (WHERE a.stage = 'in_communication') AS in_communication,
                   COUNT(a.id) FILTER (WHERE a.stage = 'not_a_fit') AS not_a_fit
              FROM jobs j
              LEFT JOIN job_applications a ON a.job_id = j.id
             WHERE j.company_id = $1
             GROUP BY j.id
             ORDER BY j.created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, CompanyJob>(&sql)
            .bind(company_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn list_jobs_with_status(
        &self,
        status: JobStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobListing>, RepoError> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}, c.company_name
              FROM jobs j
              JOIN companies c ON c.id = j.company_id
             WHERE j.status = $1
             ORDER BY j.created_at DESC
             LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, JobListing>(&sql)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<JobListing>, RepoError> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}, c.company_name
              FROM jobs j
              JOIN companies c ON c.id = j.company_id
             WHERE j.id = $1
            "#
        );
        let row = sqlx::query_as::<_, JobListing>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert_application(
        &self,
        job_id: Uuid,
        member_id: Uuid,
    ) -> Result<JobApplication, RepoError> {
        let row = sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO job_applications (job_id, member_id)
            VALUES ($1, $2)
            RETURNING id, job_id, member_id, stage, created_at
            "#,
        )
        .bind(job_id)
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_applicants(
        &self,
        company_id: Uuid,
        job_id: Uuid,
    ) -> Result<Vec<Applicant>, RepoError> {
        let rows = sqlx::query_as::<_, Applicant>(
            r#"
            SELECT a.id AS application_id, a.stage, a.created_at AS applied_at,
                   m.id AS member_id, m.member_type, m.nim, m.phone,
                   u.fullname, u.email
              FROM job_applications a
              JOIN jobs j    ON j.id = a.job_id
              JOIN members m ON m.id = a.member_id
              JOIN users u   ON u.id = m.user_id
             WHERE a.job_id = $1 AND j.company_id = $2
             ORDER BY a.created_at
            "#,
        )
        .bind(job_id)
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn set_stage(
        &self,
        company_id: Uuid,
        application_id: Uuid,
        stage: ApplicationStage,
    ) -> Result<JobApplication, RepoError> {
        let row = sqlx::query_as::<_, JobApplication>(
            r#"
            UPDATE job_applications a
               SET stage = $3
              FROM jobs j
             WHERE a.id = $1 AND j.id = a.job_id AND j.company_id = $2
            RETURNING a.id, a.job_id, a.member_id, a.stage, a.created_at
            "#,
        )
        .bind(application_id)
        .bind(company_id)
        .bind(stage)
        .fetch_optional(&self.db)
        .await?;
        row.ok_or(RepoError::NotFound)
    }

    async fn list_member_applications(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<MemberApplication>, RepoError> {
        let rows = sqlx::query_as::<_, MemberApplication>(
            r#"
            SELECT a.id, a.job_id, j.title AS job_title, c.company_name, a.stage, a.created_at
              FROM job_applications a
              JOIN jobs j      ON j.id = a.job_id
              JOIN companies c ON c.id = j.company_id
             WHERE a.member_id = $1
             ORDER BY a.created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

pub async fn list_all_jobs(db: &PgPool) -> Result<Vec<Job>, RepoError> {
    let rows = sqlx::query_as::<_, Job>(
        r#"
        SELECT id, company_id, status, title, location, description, created_at
          FROM jobs
         ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_all_applications(db: &PgPool) -> Result<Vec<JobApplication>, RepoError> {
    let rows = sqlx::query_as::<_, JobApplication>(
        r#"
        SELECT id, job_id, member_id, stage, created_at
          FROM job_applications
         ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
