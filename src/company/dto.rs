use serde::{Deserialize, Serialize};

use crate::{
    auth::{dto::PublicUser, repo_types::Company},
    validation::FieldErrors,
};

/// Body of PUT /company/profile. Address and city may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub ownership: Option<String>,
    pub phone: Option<String>,
    pub company_phone: Option<String>,
    pub website: Option<String>,
    pub public_mail: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub fullname: String,
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
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut e = FieldErrors::new();
        let username = e.check("username", self.username.as_deref()).min_len(3).finish();
        let fullname = e.check("fullname", self.fullname.as_deref()).min_len(3).finish();
        let company_name = e
            .check("companyName", self.company_name.as_deref())
            .min_len(3)
            .finish();
        let industry = e.check("industry", self.industry.as_deref()).min_len(3).finish();
        let ownership = e.check("ownership", self.ownership.as_deref()).min_len(3).finish();
        let phone = e.check("phone", self.phone.as_deref()).min_len(10).finish();
        let company_phone = e
            .check("companyPhone", self.company_phone.as_deref())
            .min_len(10)
            .finish();
        let website = e.check("website", self.website.as_deref()).url().finish();
        let public_mail = e
            .check("publicMail", self.public_mail.as_deref())
            .email()
            .finish()
            .map(|m| m.trim().to_lowercase());
        let bio = e.check("bio", self.bio.as_deref()).finish();

        let update = || -> Option<ProfileUpdate> {
            Some(ProfileUpdate {
                username: username?,
                fullname: fullname?,
                company_name: company_name?,
                industry: industry?,
                ownership: ownership?,
                phone: phone?,
                company_phone: company_phone?,
                website: website?,
                public_mail: public_mail?,
                bio: bio?,
                address: optional(&self.address),
                city: optional(&self.city),
            })
        };
        match update() {
            Some(u) if e.is_empty() => Ok(u),
            _ => Err(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub company: Company,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}
