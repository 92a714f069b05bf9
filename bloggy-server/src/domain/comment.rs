use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) post_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreateCommentRequest {
    pub(crate) post_id: i64,
    pub(crate) content: String,
}

impl CreateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.post_id <= 0 {
            return Err(DomainError::Validation {
                field: "post_id",
                message: "must be > 0",
            });
        }
        Ok(Self {
            post_id: self.post_id,
            content: normalize_comment_content(&self.content)?,
        })
    }
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        content: impl Into<String>,
        author_id: i64,
        post_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 || author_id <= 0 || post_id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "ids must be > 0",
            });
        }
        let content = normalize_comment_content(&content.into())?;

        Ok(Self {
            id,
            content,
            author_id,
            post_id,
            created_at,
        })
    }
}

fn normalize_comment_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() || content.len() > 4096 {
        return Err(DomainError::Validation {
            field: "content",
            message: "must be 1..4096 chars",
        });
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Comment, CreateCommentRequest};

    #[test]
    fn create_comment_request_rejects_blank_content() {
        let req = CreateCommentRequest {
            post_id: 1,
            content: "   ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_comment_request_rejects_non_positive_post_id() {
        let req = CreateCommentRequest {
            post_id: 0,
            content: "hello".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_comment_request_trims_content() {
        let req = CreateCommentRequest {
            post_id: 1,
            content: "  hello  ".to_string(),
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.content, "hello");
    }

    #[test]
    fn comment_new_builds_comment() {
        let comment =
            Comment::new(1, "  hello  ", 2, 3, Utc::now()).expect("comment should be created");
        assert_eq!(comment.content, "hello");
        assert_eq!(comment.author_id, 2);
        assert_eq!(comment.post_id, 3);
    }
}
