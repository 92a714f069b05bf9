use crate::data::star_repository::{StarRepository, StarState};
use crate::domain::error::DomainError;

/// Thin facade over the atomic star persistence contract. All consistency
/// guarantees live in the repository statement; this layer only exposes the
/// operations.
pub(crate) struct StarService<R: StarRepository> {
    repo: R,
}

impl<R: StarRepository> StarService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn star(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError> {
        self.repo.star(user_id, post_id).await
    }

    pub(crate) async fn unstar(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<StarState, DomainError> {
        self.repo.unstar(user_id, post_id).await
    }

    pub(crate) async fn is_starred(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        self.repo.is_starred(user_id, post_id).await
    }

    pub(crate) async fn starred_posts(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        self.repo.starred_post_ids(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::StarService;
    use crate::data::star_repository::{StarRepository, StarState};
    use crate::domain::error::DomainError;

    /// In-memory model of the atomic contract: membership and counter change
    /// together under one lock, mirroring the single-statement guarantee.
    #[derive(Clone)]
    struct FakeStarRepo {
        inner: Arc<Mutex<FakeStarState>>,
    }

    struct FakeStarState {
        posts: HashMap<i64, i64>,
        stars: HashSet<(i64, i64)>,
    }

    impl FakeStarRepo {
        fn with_posts(post_ids: &[i64]) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeStarState {
                    posts: post_ids.iter().map(|id| (*id, 0)).collect(),
                    stars: HashSet::new(),
                })),
            }
        }

        /// Each post's counter must equal the number of users whose starred
        /// set contains it.
        fn assert_invariant(&self) {
            let inner = self.inner.lock().expect("star state mutex poisoned");
            for (post_id, count) in &inner.posts {
                let cardinality = inner
                    .stars
                    .iter()
                    .filter(|(_, starred_post)| starred_post == post_id)
                    .count() as i64;
                assert_eq!(
                    *count, cardinality,
                    "star count for post {post_id} drifted from set cardinality"
                );
            }
        }
    }

    #[async_trait]
    impl StarRepository for FakeStarRepo {
        async fn star(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError> {
            let mut inner = self.inner.lock().expect("star state mutex poisoned");
            if !inner.posts.contains_key(&post_id) {
                return Err(DomainError::NotFound("post".to_string()));
            }
            if inner.stars.insert((user_id, post_id)) {
                *inner.posts.get_mut(&post_id).expect("post exists") += 1;
            }
            Ok(StarState {
                starred: true,
                star_count: inner.posts[&post_id],
            })
        }

        async fn unstar(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError> {
            let mut inner = self.inner.lock().expect("star state mutex poisoned");
            if !inner.posts.contains_key(&post_id) {
                return Err(DomainError::NotFound("post".to_string()));
            }
            if inner.stars.remove(&(user_id, post_id)) {
                *inner.posts.get_mut(&post_id).expect("post exists") -= 1;
            }
            Ok(StarState {
                starred: false,
                star_count: inner.posts[&post_id],
            })
        }

        async fn is_starred(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError> {
            let inner = self.inner.lock().expect("star state mutex poisoned");
            Ok(inner.stars.contains(&(user_id, post_id)))
        }

        async fn starred_post_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
            let inner = self.inner.lock().expect("star state mutex poisoned");
            Ok(inner
                .stars
                .iter()
                .filter(|(starring_user, _)| *starring_user == user_id)
                .map(|(_, post_id)| *post_id)
                .collect())
        }
    }

    #[tokio::test]
    async fn star_then_unstar_restores_original_state() {
        let repo = FakeStarRepo::with_posts(&[1]);
        let service = StarService::new(repo.clone());

        let starred = service.star(10, 1).await.expect("star must succeed");
        assert_eq!(
            starred,
            StarState {
                starred: true,
                star_count: 1
            }
        );
        repo.assert_invariant();

        let unstarred = service.unstar(10, 1).await.expect("unstar must succeed");
        assert_eq!(
            unstarred,
            StarState {
                starred: false,
                star_count: 0
            }
        );
        repo.assert_invariant();
        assert!(!service.is_starred(10, 1).await.expect("is_starred works"));
    }

    #[tokio::test]
    async fn repeated_star_is_idempotent() {
        let repo = FakeStarRepo::with_posts(&[1]);
        let service = StarService::new(repo.clone());

        let first = service.star(10, 1).await.expect("star must succeed");
        let second = service.star(10, 1).await.expect("star must succeed");

        assert_eq!(first, second);
        assert_eq!(second.star_count, 1);
        repo.assert_invariant();
    }

    #[tokio::test]
    async fn repeated_unstar_is_idempotent() {
        let repo = FakeStarRepo::with_posts(&[1]);
        let service = StarService::new(repo.clone());

        service.star(10, 1).await.expect("star must succeed");
        service.unstar(10, 1).await.expect("unstar must succeed");
        let again = service.unstar(10, 1).await.expect("unstar must succeed");

        assert_eq!(again.star_count, 0);
        repo.assert_invariant();
    }

    #[tokio::test]
    async fn toggle_pairs_return_to_original_count_for_many_users() {
        let repo = FakeStarRepo::with_posts(&[1, 2]);
        let service = StarService::new(repo.clone());

        // Seed a baseline so the round trip does not start from zero.
        for user_id in 1..=3 {
            service.star(user_id, 1).await.expect("star must succeed");
        }
        let baseline = service.star(3, 1).await.expect("star must succeed").star_count;

        for user_id in 4..=8 {
            service.star(user_id, 1).await.expect("star must succeed");
            repo.assert_invariant();
            service.unstar(user_id, 1).await.expect("unstar must succeed");
            repo.assert_invariant();
        }

        let final_state = service.star(3, 1).await.expect("star must succeed");
        assert_eq!(final_state.star_count, baseline);
    }

    #[tokio::test]
    async fn starring_different_posts_tracks_separate_counters() {
        let repo = FakeStarRepo::with_posts(&[1, 2]);
        let service = StarService::new(repo.clone());

        service.star(10, 1).await.expect("star must succeed");
        service.star(10, 2).await.expect("star must succeed");
        service.star(11, 2).await.expect("star must succeed");
        repo.assert_invariant();

        let mut starred = service.starred_posts(10).await.expect("list works");
        starred.sort_unstable();
        assert_eq!(starred, vec![1, 2]);

        let state = service.star(11, 2).await.expect("star must succeed");
        assert_eq!(state.star_count, 2);
    }

    #[tokio::test]
    async fn star_unknown_post_is_not_found() {
        let service = StarService::new(FakeStarRepo::with_posts(&[]));

        let err = service.star(10, 404).await.expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service.unstar(10, 404).await.expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
