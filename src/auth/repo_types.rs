use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::validation::FormChoice;

/// Account category. Each non-admin user owns exactly one matching profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
    Company,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::Company => "COMPANY",
        }
    }
}

impl FormChoice for Role {
    const CHOICES: &'static [&'static str] = &["ADMIN", "MEMBER", "COMPANY"];

    fn from_form(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "MEMBER" => Some(Role::Member),
            "COMPANY" => Some(Role::Company),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "member_type", rename_all = "UPPERCASE")]
pub enum MemberType {
    Student,
    Alumni,
}

impl FormChoice for MemberType {
    const CHOICES: &'static [&'static str] = &["STUDENT", "ALUMNI"];

    fn from_form(value: &str) -> Option<Self> {
        match value {
            "STUDENT" => Some(MemberType::Student),
            "ALUMNI" => Some(MemberType::Alumni),
            _ => None,
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub role: Role,
    #[serde(with = "time::serde::rfc3339::option")]
    pub email_verified: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub member_type: MemberType,
    pub nim: String,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub logo_id: Uuid,
    pub company_name: String,
    pub industry: String,
    pub ownership: String,
    pub phone: String,
    pub company_phone: String,
    pub website: String,
    pub public_mail: String,
    pub bio: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub member_type: MemberType,
    pub nim: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub company_name: String,
    pub industry: String,
    pub ownership: String,
    pub phone: String,
    pub company_phone: String,
    pub website: String,
    pub public_mail: String,
    pub bio: String,
}

/// What a one-shot account token may be exchanged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "token_kind", rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

#[derive(Debug, Clone, FromRow)]
pub struct AccountToken {
    pub token: Uuid,
    pub email: String,
    pub kind: TokenPurpose,
    pub expires_at: OffsetDateTime,
}

impl AccountToken {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
