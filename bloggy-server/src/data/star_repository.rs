use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Outcome of a star mutation: the caller's final membership state and the
/// post's counter after the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StarState {
    pub(crate) starred: bool,
    pub(crate) star_count: i64,
}

/// Star persistence contract. Implementations MUST mutate set membership and
/// the post's counter in one atomic conditional operation, so that
/// `star_count` always equals the number of users whose starred set contains
/// the post. Application code must not emulate this with separate writes.
#[async_trait]
pub(crate) trait StarRepository: Send + Sync {
    /// Adds the post to the user's starred set and increments the counter iff
    /// the membership was absent. Idempotent.
    async fn star(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError>;
    /// Removes the post from the user's starred set and decrements the counter
    /// iff the membership was present. Idempotent.
    async fn unstar(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError>;
    async fn is_starred(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError>;
    async fn starred_post_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError>;
}
