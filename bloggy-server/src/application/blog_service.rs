use crate::data::image_repository::ImageRepository;
use crate::data::post_repository::{
    NewPost, Pagination, PostOrdering, PostPatch, PostRepository,
};
use crate::domain::error::DomainError;
use crate::domain::ownership::ensure_owner;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total: i64,
}

pub(crate) struct BlogService<P: PostRepository, I: ImageRepository> {
    posts: P,
    images: I,
}

impl<P: PostRepository, I: ImageRepository> BlogService<P, I> {
    pub(crate) fn new(posts: P, images: I) -> Self {
        Self { posts, images }
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        self.ensure_image_exists(req.image.as_deref()).await?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            image: req.image,
            author_id,
        };
        self.posts.create_post(new_post).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        self.ensure_image_exists(req.image.as_deref()).await?;

        let original_post = self.get_post(post_id).await?;
        ensure_owner(original_post.author_id, actor_user_id)?;

        let patch = PostPatch {
            title: req.title,
            content: req.content,
            image: req.image,
        };
        self.posts
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let original_post = self.get_post(post_id).await?;
        ensure_owner(original_post.author_id, actor_user_id)?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        page: u32,
        page_size: u32,
        ordering: PostOrdering,
    ) -> Result<ListPostsResult, DomainError> {
        let pagination = Pagination { page, page_size };
        let posts = self.posts.list_posts(pagination, ordering).await?;
        let total = self.posts.total_posts().await?;

        Ok(ListPostsResult {
            posts,
            page,
            page_size,
            total,
        })
    }

    pub(crate) async fn list_posts_by_author(
        &self,
        author_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<ListPostsResult, DomainError> {
        let pagination = Pagination { page, page_size };
        let posts = self
            .posts
            .list_posts_by_author(author_id, pagination)
            .await?;
        let total = self.posts.total_posts_by_author(author_id).await?;

        Ok(ListPostsResult {
            posts,
            page,
            page_size,
            total,
        })
    }

    async fn ensure_image_exists(&self, image: Option<&str>) -> Result<(), DomainError> {
        let Some(filename) = image else {
            return Ok(());
        };
        if self.images.find_by_filename(filename).await?.is_none() {
            return Err(DomainError::Validation {
                field: "image",
                message: "unknown image reference",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::BlogService;
    use crate::data::image_repository::{ImageRepository, NewImage, StoredImage};
    use crate::data::post_repository::{
        NewPost, Pagination, PostOrdering, PostPatch, PostRepository,
    };
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        update_owned_result: Arc<Mutex<Option<Post>>>,
        update_owned_call: Arc<Mutex<Option<(i64, i64, PostPatch)>>>,
        delete_result: Arc<Mutex<bool>>,
        list_result: Arc<Mutex<Vec<Post>>>,
        list_ordering: Arc<Mutex<Option<PostOrdering>>>,
        total_result: Arc<Mutex<i64>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                post_for_get: Arc::new(Mutex::new(None)),
                update_owned_result: Arc::new(Mutex::new(None)),
                update_owned_call: Arc::new(Mutex::new(None)),
                delete_result: Arc::new(Mutex::new(true)),
                list_result: Arc::new(Mutex::new(Vec::new())),
                list_ordering: Arc::new(Mutex::new(None)),
                total_result: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_post(
                1,
                &input.title,
                &input.content,
                input.author_id,
            ))
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned")
                .clone())
        }

        async fn update_post_owned(
            &self,
            post_id: i64,
            owner_id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self
                .update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned") = Some((post_id, owner_id, patch));
            Ok(self
                .update_owned_result
                .lock()
                .expect("update_owned_result mutex poisoned")
                .clone())
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            Ok(*self
                .delete_result
                .lock()
                .expect("delete_result mutex poisoned"))
        }

        async fn list_posts(
            &self,
            _pagination: Pagination,
            ordering: PostOrdering,
        ) -> Result<Vec<Post>, DomainError> {
            *self
                .list_ordering
                .lock()
                .expect("list_ordering mutex poisoned") = Some(ordering);
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn list_posts_by_author(
            &self,
            _author_id: i64,
            _pagination: Pagination,
        ) -> Result<Vec<Post>, DomainError> {
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn total_posts(&self) -> Result<i64, DomainError> {
            Ok(*self
                .total_result
                .lock()
                .expect("total_result mutex poisoned"))
        }

        async fn total_posts_by_author(&self, _author_id: i64) -> Result<i64, DomainError> {
            Ok(*self
                .total_result
                .lock()
                .expect("total_result mutex poisoned"))
        }
    }

    #[derive(Clone)]
    struct FakeImageRepo {
        known: Arc<Mutex<HashSet<String>>>,
    }

    impl FakeImageRepo {
        fn new() -> Self {
            Self {
                known: Arc::new(Mutex::new(HashSet::new())),
            }
        }

        fn with_image(self, filename: &str) -> Self {
            self.known
                .lock()
                .expect("known mutex poisoned")
                .insert(filename.to_string());
            self
        }
    }

    #[async_trait]
    impl ImageRepository for FakeImageRepo {
        async fn record_image(&self, input: NewImage) -> Result<StoredImage, DomainError> {
            Ok(StoredImage {
                id: 1,
                filename: input.filename,
                path: input.path,
                uploaded_by: input.uploaded_by,
                created_at: Utc::now(),
            })
        }

        async fn find_by_filename(
            &self,
            filename: &str,
        ) -> Result<Option<StoredImage>, DomainError> {
            let known = self.known.lock().expect("known mutex poisoned");
            Ok(known.get(filename).map(|name| StoredImage {
                id: 1,
                filename: name.clone(),
                path: format!("uploads/{name}"),
                uploaded_by: 1,
                created_at: Utc::now(),
            }))
        }
    }

    #[tokio::test]
    async fn create_post_normalizes_request_before_repo_call() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone(), FakeImageRepo::new());

        let req = CreatePostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            image: None,
        };

        let created = service
            .create_post(10, req)
            .await
            .expect("create_post must succeed");

        assert_eq!(created.title, "title");
        assert_eq!(created.content, "content");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "title");
        assert_eq!(input.content, "content");
        assert_eq!(input.author_id, 10);
    }

    #[tokio::test]
    async fn create_post_rejects_unknown_image_reference() {
        let service = BlogService::new(FakePostRepo::new(), FakeImageRepo::new());

        let req = CreatePostRequest {
            title: "title".to_string(),
            content: "content".to_string(),
            image: Some("missing.png".to_string()),
        };

        let err = service
            .create_post(10, req)
            .await
            .expect_err("unknown image must be rejected");
        assert!(matches!(
            err,
            DomainError::Validation { field: "image", .. }
        ));
    }

    #[tokio::test]
    async fn create_post_accepts_known_image_reference() {
        let images = FakeImageRepo::new().with_image("cover.png");
        let service = BlogService::new(FakePostRepo::new(), images);

        let req = CreatePostRequest {
            title: "title".to_string(),
            content: "content".to_string(),
            image: Some("cover.png".to_string()),
        };

        service
            .create_post(10, req)
            .await
            .expect("known image must be accepted");
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let service = BlogService::new(FakePostRepo::new(), FakeImageRepo::new());

        let err = service
            .get_post(42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::new();
        *repo
            .post_for_get
            .lock()
            .expect("post_for_get mutex poisoned") = Some(sample_post(7, "title", "body", 99));

        let service = BlogService::new(repo, FakeImageRepo::new());
        let req = UpdatePostRequest {
            title: "new".to_string(),
            content: "body".to_string(),
            image: None,
        };

        let err = service
            .update_post(10, 7, req)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn update_post_uses_update_post_owned_contract() {
        let repo = FakePostRepo::new();
        *repo
            .post_for_get
            .lock()
            .expect("post_for_get mutex poisoned") = Some(sample_post(7, "old", "old", 10));
        *repo
            .update_owned_result
            .lock()
            .expect("update_owned_result mutex poisoned") = Some(sample_post(7, "new", "body", 10));

        let service = BlogService::new(repo.clone(), FakeImageRepo::new());
        let req = UpdatePostRequest {
            title: "  new  ".to_string(),
            content: "  body  ".to_string(),
            image: None,
        };

        let updated = service
            .update_post(10, 7, req)
            .await
            .expect("update must succeed");
        assert_eq!(updated.id, 7);

        let call = repo
            .update_owned_call
            .lock()
            .expect("update_owned_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(call.0, 7);
        assert_eq!(call.1, 10);
        assert_eq!(call.2.title, "new");
        assert_eq!(call.2.content, "body");
    }

    #[tokio::test]
    async fn delete_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::new();
        *repo
            .post_for_get
            .lock()
            .expect("post_for_get mutex poisoned") = Some(sample_post(7, "title", "body", 99));

        let service = BlogService::new(repo, FakeImageRepo::new());
        let err = service
            .delete_post(10, 7)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn list_posts_passes_ordering_and_returns_total() {
        let repo = FakePostRepo::new();
        *repo.list_result.lock().expect("list_result mutex poisoned") =
            vec![sample_post(1, "a", "b", 10)];
        *repo
            .total_result
            .lock()
            .expect("total_result mutex poisoned") = 1;

        let service = BlogService::new(repo.clone(), FakeImageRepo::new());
        let result = service
            .list_posts(1, 10, PostOrdering::MostStarred)
            .await
            .expect("list_posts must succeed");

        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 10);
        assert_eq!(result.total, 1);
        assert_eq!(result.posts.len(), 1);

        let ordering = repo
            .list_ordering
            .lock()
            .expect("list_ordering mutex poisoned")
            .expect("ordering must be captured");
        assert_eq!(ordering, PostOrdering::MostStarred);
    }

    fn sample_post(id: i64, title: &str, content: &str, author_id: i64) -> Post {
        Post::new(
            id,
            title.to_string(),
            content.to_string(),
            author_id,
            None,
            0,
            Utc::now(),
            Utc::now(),
        )
        .expect("sample post must be valid")
    }
}
