//! Registration and credential forms.
//!
//! The declared `role` picks exactly one rule set; there is no structural
//! guessing between overlapping shapes. Every rule of the chosen set runs,
//! and the base account rules run even when the role itself is unusable, so
//! a single response carries the full error report.

use super::repo_types::{MemberType, NewCompany, NewMember, Role};
use crate::validation::{max_size_message, FieldErrors, RawForm, UploadedFile};

pub const PASSWORDS_MUST_MATCH: &str = "Passwords must match";
pub const ROLE_NOT_REGISTRABLE: &str = "Only MEMBER and COMPANY accounts can register";

/// Fields every account carries. `email` is trimmed and lower-cased.
#[derive(Debug, Clone)]
pub struct AccountFields {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct MemberRegistration {
    pub account: AccountFields,
    pub member: NewMember,
}

#[derive(Debug, Clone)]
pub struct CompanyRegistration {
    pub account: AccountFields,
    pub logo: UploadedFile,
    pub company: NewCompany,
}

/// A validated registration, one variant per self-registrable role.
#[derive(Debug, Clone)]
pub enum Registration {
    Member(MemberRegistration),
    Company(CompanyRegistration),
}

impl Registration {
    pub fn role(&self) -> Role {
        match self {
            Registration::Member(_) => Role::Member,
            Registration::Company(_) => Role::Company,
        }
    }

    pub fn account(&self) -> &AccountFields {
        match self {
            Registration::Member(m) => &m.account,
            Registration::Company(c) => &c.account,
        }
    }
}

pub fn validate_registration(
    form: &RawForm,
    logo_max_bytes: usize,
) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let declared = errors.check("role", form.text("role")).choice::<Role>();
    let role = match declared {
        Some(Role::Admin) => {
            errors.add("role", ROLE_NOT_REGISTRABLE);
            None
        }
        other => other,
    };
    let account = account_fields(form, &mut errors);

    let registration = match role {
        Some(Role::Member) => member_fields(form, &mut errors)
            .zip(account)
            .map(|(member, account)| Registration::Member(MemberRegistration { account, member })),
        Some(Role::Company) => company_fields(form, logo_max_bytes, &mut errors)
            .zip(account)
            .map(|((logo, company), account)| {
                Registration::Company(CompanyRegistration {
                    account,
                    logo,
                    company,
                })
            }),
        _ => None,
    };

    match registration {
        Some(r) if errors.is_empty() => Ok(r),
        _ => Err(errors),
    }
}

fn account_fields(form: &RawForm, errors: &mut FieldErrors) -> Option<AccountFields> {
    let username = errors.check("username", form.text("username")).min_len(3).finish();
    let fullname = errors.check("fullname", form.text("fullname")).min_len(3).finish();
    let email = errors
        .check("email", form.text("email"))
        .email()
        .finish()
        .map(|e| e.trim().to_lowercase());
    let password = errors.check("password", form.text("password")).min_len(8).finish();
    let confirmed = errors
        .check("confirmPassword", form.text("confirmPassword"))
        .min_len(8)
        .same_as(form.text("password"), PASSWORDS_MUST_MATCH)
        .finish();

    Some(AccountFields {
        username: username?,
        fullname: fullname?,
        email: email?,
        password: confirmed.and(password)?,
    })
}

fn member_fields(form: &RawForm, errors: &mut FieldErrors) -> Option<NewMember> {
    let member_type = errors
        .check("memberType", form.text("memberType"))
        .choice::<MemberType>();
    let nim = errors.check("nim", form.text("nim")).min_len(10).finish();
    let phone = errors.check("phone", form.text("phone")).min_len(10).finish();

    Some(NewMember {
        member_type: member_type?,
        nim: nim?,
        phone: phone?,
    })
}

fn company_fields(
    form: &RawForm,
    logo_max_bytes: usize,
    errors: &mut FieldErrors,
) -> Option<(UploadedFile, NewCompany)> {
    let too_big = max_size_message("Logo", logo_max_bytes);
    let logo = errors
        .check_file("logo", form.file("logo"))
        .image("Logo must be an image file")
        .max_bytes(logo_max_bytes, &too_big)
        .finish();
    let company_name = errors.check("companyName", form.text("companyName")).min_len(3).finish();
    let industry = errors.check("industry", form.text("industry")).min_len(3).finish();
    let ownership = errors.check("ownership", form.text("ownership")).min_len(3).finish();
    let phone = errors.check("phone", form.text("phone")).min_len(10).finish();
    let company_phone = errors
        .check("companyPhone", form.text("companyPhone"))
        .min_len(10)
        .finish();
    let website = errors.check("website", form.text("website")).url().finish();
    let public_mail = errors
        .check("publicMail", form.text("publicMail"))
        .email()
        .finish()
        .map(|e| e.trim().to_lowercase());
    let bio = errors.check("bio", form.text("bio")).finish();

    Some((
        logo?,
        NewCompany {
            company_name: company_name?,
            industry: industry?,
            ownership: ownership?,
            phone: phone?,
            company_phone: company_phone?,
            website: website?,
            public_mail: public_mail?,
            bio: bio?,
        },
    ))
}

/// Sign-in form: both fields present, email well-formed.
pub fn validate_sign_in(email: &str, password: &str) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    if email.is_empty() {
        errors.add("email", "Email is required");
    }
    let email = errors.check("email", Some(email)).email().finish();
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    match email {
        Some(email) if errors.is_empty() => Ok((email.trim().to_lowercase(), password.to_string())),
        _ => Err(errors),
    }
}

pub fn validate_email(email: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    if email.is_empty() {
        errors.add("email", "Email is required");
        return Err(errors);
    }
    let checked = errors.check("email", Some(email)).email().finish();
    match checked {
        Some(email) => Ok(email.trim().to_lowercase()),
        None => Err(errors),
    }
}

pub fn validate_new_password(password: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let checked = errors.check("password", Some(password)).min_len(8).finish();
    checked.ok_or(errors)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::validation::REQUIRED;

    const MB: usize = 1024 * 1024;

    fn member_form() -> RawForm {
        RawForm::new()
            .with_text("role", "MEMBER")
            .with_text("username", "abc")
            .with_text("fullname", "Ann Lee")
            .with_text("email", "a@b.com")
            .with_text("password", "12345678")
            .with_text("confirmPassword", "12345678")
            .with_text("memberType", "STUDENT")
            .with_text("nim", "1234567890")
            .with_text("phone", "0812345678")
    }

    fn logo(content_type: &str, len: usize) -> UploadedFile {
        UploadedFile::new(Some("logo"), content_type, Bytes::from(vec![1u8; len]))
    }

    fn company_form() -> RawForm {
        RawForm::new()
            .with_text("role", "COMPANY")
            .with_text("username", "acme")
            .with_text("fullname", "Wile Coyote")
            .with_text("email", "HR@Acme.test ")
            .with_text("password", "roadrunner")
            .with_text("confirmPassword", "roadrunner")
            .with_text("companyName", "Acme")
            .with_text("industry", "Manufacturing")
            .with_text("ownership", "Private")
            .with_text("phone", "0811111111")
            .with_text("companyPhone", "0212222222")
            .with_text("website", "https://acme.test")
            .with_text("publicMail", "hello@acme.test")
            .with_text("bio", "")
            .with_file("logo", logo("image/png", 2048))
    }

    #[test]
    fn example_member_submission_is_valid() {
        let reg = validate_registration(&member_form(), MB).expect("valid");
        assert_eq!(reg.role(), Role::Member);
        let Registration::Member(m) = reg else {
            panic!("expected member registration");
        };
        assert_eq!(m.account.username, "abc");
        assert_eq!(m.account.email, "a@b.com");
        assert_eq!(m.member.member_type, MemberType::Student);
        assert_eq!(m.member.nim, "1234567890");
    }

    #[test]
    fn password_mismatch_is_reported_on_confirm_password() {
        let form = member_form().with_text("confirmPassword", "87654321");
        let errors = validate_registration(&form, MB).unwrap_err();
        assert_eq!(
            errors.get("confirmPassword"),
            Some(&[PASSWORDS_MUST_MATCH.to_string()][..])
        );
        assert!(!errors.contains("password"));
    }

    #[test]
    fn missing_role_is_rejected_and_base_fields_still_checked() {
        let form = RawForm::new()
            .with_text("username", "ab")
            .with_text("email", "broken");
        let errors = validate_registration(&form, MB).unwrap_err();
        assert_eq!(errors.get("role"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.contains("username"));
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let form = member_form().with_text("role", "GUEST");
        let errors = validate_registration(&form, MB).unwrap_err();
        assert!(errors.get("role").unwrap()[0].starts_with("Invalid enum value"));
    }

    #[test]
    fn admin_cannot_self_register() {
        let form = member_form().with_text("role", "ADMIN");
        let errors = validate_registration(&form, MB).unwrap_err();
        assert_eq!(errors.get("role"), Some(&[ROLE_NOT_REGISTRABLE.to_string()][..]));
    }

    #[test]
    fn member_rules_collect_every_violation() {
        let form = member_form()
            .with_text("memberType", "LECTURER")
            .with_text("nim", "123")
            .with_text("phone", "08");
        let errors = validate_registration(&form, MB).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["memberType", "nim", "phone"]);
    }

    #[test]
    fn member_role_ignores_company_fields() {
        let form = member_form().with_text("website", "not a url");
        assert!(validate_registration(&form, MB).is_ok());
    }

    #[test]
    fn valid_company_submission() {
        let reg = validate_registration(&company_form(), MB).expect("valid");
        let Registration::Company(c) = reg else {
            panic!("expected company registration");
        };
        assert_eq!(c.account.email, "hr@acme.test");
        assert_eq!(c.company.company_name, "Acme");
        assert_eq!(c.company.bio, "");
        assert_eq!(c.logo.bytes.len(), 2048);
    }

    #[test]
    fn company_without_logo_is_rejected() {
        let mut form = RawForm::new();
        for field in [
            "role", "username", "fullname", "email", "password", "confirmPassword",
            "companyName", "industry", "ownership", "phone", "companyPhone",
            "website", "publicMail", "bio",
        ] {
            form = form.with_text(field, company_form().text(field).unwrap());
        }
        let errors = validate_registration(&form, MB).unwrap_err();
        assert_eq!(errors.get("logo"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn company_logo_must_be_small_image() {
        let form = company_form().with_file("logo", logo("application/pdf", MB + 1));
        let errors = validate_registration(&form, MB).unwrap_err();
        assert_eq!(
            errors.get("logo"),
            Some(
                &[
                    "Logo must be an image file".to_string(),
                    "Logo must be less than or equal to 1 MB".to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn logo_at_exact_limit_is_accepted() {
        let form = company_form().with_file("logo", logo("image/jpeg", MB));
        assert!(validate_registration(&form, MB).is_ok());
    }

    #[test]
    fn company_url_and_public_mail_rules() {
        let form = company_form()
            .with_text("website", "acme dot test")
            .with_text("publicMail", "hello");
        let errors = validate_registration(&form, MB).unwrap_err();
        assert_eq!(errors.get("website"), Some(&["Invalid url".to_string()][..]));
        assert_eq!(errors.get("publicMail"), Some(&["Invalid email".to_string()][..]));
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let errors = validate_sign_in("", "").unwrap_err();
        assert!(errors.contains("email"));
        assert_eq!(errors.get("password"), Some(&["Password is required".to_string()][..]));
        let (email, _) = validate_sign_in(" A@B.com", "x").unwrap();
        assert_eq!(email, "a@b.com");
    }

    #[test]
    fn new_password_min_length() {
        assert!(validate_new_password("short").is_err());
        assert_eq!(validate_new_password("longenough").unwrap(), "longenough");
    }
}
