use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::{Comment, CreateCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::ownership::ensure_owner;

pub(crate) struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_comment(
        &self,
        author_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let new_comment = NewComment {
            content: req.content,
            author_id,
            post_id: req.post_id,
        };
        self.repo.create_comment(new_comment).await
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        let comment = self
            .repo
            .get_comment(comment_id)
            .await?
            .ok_or(DomainError::NotFound(format!("comment id: {comment_id}")))?;

        ensure_owner(comment.author_id, actor_user_id)?;

        let deleted = self.repo.delete_comment(comment_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        Ok(())
    }

    pub(crate) async fn list_comments_by_post(
        &self,
        post_id: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        self.repo.list_comments_by_post(post_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::CommentService;
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::domain::comment::{Comment, CreateCommentRequest};
    use crate::domain::error::DomainError;

    #[derive(Clone)]
    struct FakeCommentRepo {
        created_input: Arc<Mutex<Option<NewComment>>>,
        comment_for_get: Arc<Mutex<Option<Comment>>>,
        deleted_id: Arc<Mutex<Option<i64>>>,
    }

    impl FakeCommentRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                comment_for_get: Arc::new(Mutex::new(None)),
                deleted_id: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl CommentRepository for FakeCommentRepo {
        async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_comment(1, &input.content, input.author_id, input.post_id))
        }

        async fn get_comment(&self, _id: i64) -> Result<Option<Comment>, DomainError> {
            Ok(self
                .comment_for_get
                .lock()
                .expect("comment_for_get mutex poisoned")
                .clone())
        }

        async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
            *self.deleted_id.lock().expect("deleted_id mutex poisoned") = Some(id);
            Ok(true)
        }

        async fn list_comments_by_post(
            &self,
            _post_id: i64,
        ) -> Result<Vec<Comment>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn create_comment_trims_content_and_sets_author() {
        let repo = FakeCommentRepo::new();
        let service = CommentService::new(repo.clone());

        let req = CreateCommentRequest {
            post_id: 3,
            content: "  hello  ".to_string(),
        };

        let created = service
            .create_comment(10, req)
            .await
            .expect("create_comment must succeed");
        assert_eq!(created.content, "hello");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.author_id, 10);
        assert_eq!(input.post_id, 3);
    }

    #[tokio::test]
    async fn delete_comment_returns_forbidden_for_non_author() {
        let repo = FakeCommentRepo::new();
        *repo
            .comment_for_get
            .lock()
            .expect("comment_for_get mutex poisoned") = Some(sample_comment(5, "hi", 99, 3));

        let service = CommentService::new(repo);
        let err = service
            .delete_comment(10, 5)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn delete_comment_deletes_own_comment() {
        let repo = FakeCommentRepo::new();
        *repo
            .comment_for_get
            .lock()
            .expect("comment_for_get mutex poisoned") = Some(sample_comment(5, "hi", 10, 3));

        let service = CommentService::new(repo.clone());
        service
            .delete_comment(10, 5)
            .await
            .expect("delete must succeed");

        let deleted = repo
            .deleted_id
            .lock()
            .expect("deleted_id mutex poisoned")
            .expect("delete must be called");
        assert_eq!(deleted, 5);
    }

    #[tokio::test]
    async fn delete_comment_returns_not_found_when_missing() {
        let service = CommentService::new(FakeCommentRepo::new());
        let err = service
            .delete_comment(10, 5)
            .await
            .expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    fn sample_comment(id: i64, content: &str, author_id: i64, post_id: i64) -> Comment {
        Comment::new(id, content.to_string(), author_id, post_id, Utc::now())
            .expect("sample comment must be valid")
    }
}
