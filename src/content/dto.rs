use serde::Deserialize;

use super::repo_types::NewPost;
use crate::validation::FieldErrors;

/// Body for creating news or an article.
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostForm {
    pub fn validate(&self) -> Result<NewPost, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = errors.check("title", self.title.as_deref()).min_len(3).finish();
        let content = errors
            .check("content", self.content.as_deref())
            .min_len(10)
            .finish();
        match (title, content) {
            (Some(title), Some(content)) => Ok(NewPost { title, content }),
            _ => Err(errors),
        }
    }
}
