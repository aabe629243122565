use serde::Serialize;
use sqlx::FromRow;

use crate::{
    auth::{
        dto::PublicUser,
        repo_types::{Company, Member, Role},
    },
    content::repo_types::{Article, News},
};

/// Company row together with its owning user.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithUser {
    #[serde(flatten)]
    pub company: Company,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberWithUser {
    #[serde(flatten)]
    pub member: Member,
    pub user: PublicUser,
}

/// Owner columns selected next to a profile row, prefixed `owner_`.
#[derive(Debug, Clone, FromRow)]
pub struct OwnerColumns {
    pub owner_username: String,
    pub owner_fullname: String,
    pub owner_email: String,
    pub owner_role: Role,
}

impl OwnerColumns {
    pub fn into_user(self, id: uuid::Uuid) -> PublicUser {
        PublicUser {
            id,
            username: self.owner_username,
            fullname: self.owner_fullname,
            email: self.owner_email,
            role: self.owner_role,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanyOwnerRow {
    #[sqlx(flatten)]
    pub company: Company,
    #[sqlx(flatten)]
    pub owner: OwnerColumns,
}

impl From<CompanyOwnerRow> for CompanyWithUser {
    fn from(r: CompanyOwnerRow) -> Self {
        let user = r.owner.into_user(r.company.user_id);
        Self {
            company: r.company,
            user,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MemberOwnerRow {
    #[sqlx(flatten)]
    pub member: Member,
    #[sqlx(flatten)]
    pub owner: OwnerColumns,
}

impl From<MemberOwnerRow> for MemberWithUser {
    fn from(r: MemberOwnerRow) -> Self {
        let user = r.owner.into_user(r.member.user_id);
        Self {
            member: r.member,
            user,
        }
    }
}

/// News and articles, fetched together.
#[derive(Debug, Clone, Serialize)]
pub struct Contents {
    pub news: Vec<News>,
    pub articles: Vec<Article>,
}

/// Entities an admin may hard-delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Company,
    Member,
    News,
    Article,
}

impl Entity {
    pub fn table(self) -> &'static str {
        match self {
            Entity::User => "users",
            Entity::Company => "companies",
            Entity::Member => "members",
            Entity::News => "news",
            Entity::Article => "articles",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Company => "Company",
            Entity::Member => "Member",
            Entity::News => "News",
            Entity::Article => "Article",
        }
    }

    pub fn deleted_message(self) -> String {
        format!("{} successfully deleted!", self.label())
    }

    pub fn failed_message(self) -> String {
        format!(
            "An error occurred while deleting the {}. Please try again.",
            self.label().to_lowercase()
        )
    }
}
