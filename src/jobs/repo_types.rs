use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{auth::repo_types::MemberType, validation::FormChoice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Inactive,
    Completed,
    Draft,
}

impl FormChoice for JobStatus {
    const CHOICES: &'static [&'static str] = &["active", "inactive", "completed", "draft"];

    fn from_form(value: &str) -> Option<Self> {
        match value {
            "active" => Some(JobStatus::Active),
            "inactive" => Some(JobStatus::Inactive),
            "completed" => Some(JobStatus::Completed),
            "draft" => Some(JobStatus::Draft),
            _ => None,
        }
    }
}

/// Where an application sits in the company's hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_stage", rename_all = "snake_case")]
pub enum ApplicationStage {
    DocumentScreening,
    InCommunication,
    NotAFit,
}

impl FormChoice for ApplicationStage {
    const CHOICES: &'static [&'static str] =
        &["document_screening", "in_communication", "not_a_fit"];

    fn from_form(value: &str) -> Option<Self> {
        match value {
            "document_screening" => Some(ApplicationStage::DocumentScreening),
            "in_communication" => Some(ApplicationStage::InCommunication),
            "not_a_fit" => Some(ApplicationStage::NotAFit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub status: JobStatus,
    pub title: String,
    pub location: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub member_id: Uuid,
    pub stage: ApplicationStage,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub location: String,
    pub description: String,
    pub status: JobStatus,
}

/// Public job listing row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub company_name: String,
}

/// A company's own job with its applicant tally per stage.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    #[sqlx(flatten)]
    pub applicants: StageCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct StageCounts {
    pub total: i64,
    pub document_screening: i64,
    pub in_communication: i64,
    pub not_a_fit: i64,
}

/// An application as the hiring company sees it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Applicant {
    pub application_id: Uuid,
    pub stage: ApplicationStage,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
    pub member_id: Uuid,
    pub member_type: MemberType,
    pub nim: String,
    pub phone: String,
    pub fullname: String,
    pub email: String,
}

/// An application as the applying member sees it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MemberApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub stage: ApplicationStage,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
