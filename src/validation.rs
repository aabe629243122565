//! Field-level validation shared by every form the API accepts.
//!
//! Rules never stop at the first failure: each violation is recorded under
//! its field name so the caller gets the complete report in one response.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use bytes::{Bytes, BytesMut};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

pub const REQUIRED: &str = "Required";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Renders a byte limit the way it is shown to users ("1 MB", "100 KB").
pub fn human_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn max_size_message(label: &str, max_bytes: usize) -> String {
    format!("{label} must be less than or equal to {}", human_size(max_bytes))
}

/// Field name -> violation messages, in the order the rules ran.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Starts the rule chain for a required text field.
    pub fn check<'e, 'v>(&'e mut self, field: &'static str, value: Option<&'v str>) -> FieldCheck<'e, 'v> {
        if value.is_none() {
            self.add(field, REQUIRED);
        }
        FieldCheck {
            ok: value.is_some(),
            errors: self,
            field,
            value,
        }
    }

    /// Starts the rule chain for a required file field.
    pub fn check_file<'e, 'v>(
        &'e mut self,
        field: &'static str,
        file: Option<&'v UploadedFile>,
    ) -> FileCheck<'e, 'v> {
        if file.is_none() {
            self.add(field, REQUIRED);
        }
        FileCheck {
            ok: file.is_some(),
            errors: self,
            field,
            file,
        }
    }
}

/// Enumerations that can be chosen from a form value.
pub trait FormChoice: Sized + 'static {
    const CHOICES: &'static [&'static str];

    fn from_form(value: &str) -> Option<Self>;
}

pub struct FieldCheck<'e, 'v> {
    errors: &'e mut FieldErrors,
    field: &'static str,
    value: Option<&'v str>,
    ok: bool,
}

impl<'e, 'v> FieldCheck<'e, 'v> {
    fn fail(&mut self, message: impl Into<String>) {
        self.errors.add(self.field, message);
        self.ok = false;
    }

    pub fn min_len(mut self, min: usize) -> Self {
        if let Some(v) = self.value {
            if v.chars().count() < min {
                self.fail(format!("String must contain at least {min} character(s)"));
            }
        }
        self
    }

    pub fn email(mut self) -> Self {
        if let Some(v) = self.value {
            if !is_valid_email(v.trim()) {
                self.fail("Invalid email");
            }
        }
        self
    }

    pub fn url(mut self) -> Self {
        if let Some(v) = self.value {
            if url::Url::parse(v).is_err() {
                self.fail("Invalid url");
            }
        }
        self
    }

    /// Requires the value to equal `other`; a missing `other` counts as a mismatch.
    pub fn same_as(mut self, other: Option<&str>, message: &str) -> Self {
        if let Some(v) = self.value {
            if other != Some(v) {
                self.fail(message);
            }
        }
        self
    }

    pub fn finish(self) -> Option<String> {
        if self.ok {
            self.value.map(str::to_string)
        } else {
            None
        }
    }

    pub fn choice<T: FormChoice>(mut self) -> Option<T> {
        let v = self.value?;
        match T::from_form(v) {
            Some(choice) if self.ok => Some(choice),
            Some(_) => None,
            None => {
                let expected = T::CHOICES
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(" | ");
                self.fail(format!(
                    "Invalid enum value. Expected {expected}, received '{v}'"
                ));
                None
            }
        }
    }
}

pub struct FileCheck<'e, 'v> {
    errors: &'e mut FieldErrors,
    field: &'static str,
    file: Option<&'v UploadedFile>,
    ok: bool,
}

impl<'e, 'v> FileCheck<'e, 'v> {
    fn fail(&mut self, message: impl Into<String>) {
        self.errors.add(self.field, message);
        self.ok = false;
    }

    pub fn image(mut self, message: &str) -> Self {
        if let Some(f) = self.file {
            if !f.content_type.starts_with("image/") {
                self.fail(message);
            }
        }
        self
    }

    pub fn content_type_in(mut self, allowed: &[&str], message: &str) -> Self {
        if let Some(f) = self.file {
            if !allowed.contains(&f.content_type.as_str()) {
                self.fail(message);
            }
        }
        self
    }

    pub fn max_bytes(mut self, max: usize, message: &str) -> Self {
        if let Some(f) = self.file {
            if f.size > max {
                self.fail(message);
            }
        }
        self
    }

    pub fn finish(self) -> Option<UploadedFile> {
        if self.ok {
            self.file.cloned()
        } else {
            None
        }
    }
}

/// A binary part of a multipart submission.
///
/// `size` is what the client sent. Parts over the read cap keep no bytes,
/// so only `size` says how large they were.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
    pub size: usize,
}

impl UploadedFile {
    pub fn new(file_name: Option<&str>, content_type: &str, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.map(str::to_string),
            content_type: content_type.to_string(),
            size: bytes.len(),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Extension of the client-side file name, lowercased, if it looks like one.
    pub fn extension(&self) -> Option<String> {
        let ext = Path::new(self.file_name.as_deref()?).extension()?.to_str()?;
        if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Flat view of a submitted form: text fields and file fields by name.
#[derive(Debug, Default, Clone)]
pub struct RawForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.insert(name.to_string(), file);
        self
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// Drains a multipart body. Parts carrying a file name are files; an empty
    /// file part (an untouched file input) is treated as absent.
    ///
    /// File parts are kept in memory up to `file_cap` bytes. A larger part is
    /// still drained so the fields after it are read, and comes back with
    /// its size only. If the body limit trips inside a file part, reading
    /// stops and that part is reported as over the cap; the route limit is
    /// always above the cap, so the part could not have fit.
    pub async fn from_multipart(mut mp: Multipart, file_cap: usize) -> Result<Self, MultipartError> {
        let mut form = Self::new();
        while let Some(mut field) = mp.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                form.fields.insert(name, text);
                continue;
            };
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".into());

            let mut kept = BytesMut::new();
            let mut size = 0usize;
            let mut cut_off = false;
            loop {
                match field.chunk().await {
                    Ok(Some(chunk)) => {
                        size += chunk.len();
                        if size <= file_cap {
                            kept.extend_from_slice(&chunk);
                        } else if !kept.is_empty() {
                            kept = BytesMut::new();
                        }
                    }
                    Ok(None) => break,
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        warn!(field = %name, read = size, "body limit reached inside file part");
                        size = size.max(file_cap + 1);
                        kept = BytesMut::new();
                        cut_off = true;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }

            if !(file_name.is_empty() && size == 0) {
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        bytes: kept.freeze(),
                        size,
                    },
                );
            }
            if cut_off {
                break;
            }
        }
        Ok(form)
    }
}
