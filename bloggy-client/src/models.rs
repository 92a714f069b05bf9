use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public user model.
pub struct User {
    /// User identifier.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Whether the email address has been verified.
    pub is_verified: bool,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public post model.
pub struct Post {
    /// Post identifier.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Author identifier.
    pub author_id: i64,
    /// Stored-image reference, if the post carries one.
    pub image: Option<String>,
    /// Number of users who starred the post.
    pub star_count: i64,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public comment model.
pub struct Comment {
    /// Comment identifier.
    pub id: i64,
    /// Comment body.
    pub content: String,
    /// Author identifier.
    pub author_id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Response after a successful registration. The account still needs email
/// verification before it can log in.
pub struct RegisterResponse {
    /// Human-readable status message.
    pub message: String,
    /// The created user.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Response after a successful login.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// The authenticated user.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Paginated post listing.
pub struct ListPostsResponse {
    /// Posts on the current page.
    pub posts: Vec<Post>,
    /// Page number (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total number of posts.
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Star state after a star/unstar call.
pub struct StarState {
    /// Whether the current user now stars the post.
    pub starred: bool,
    /// The post's star count.
    pub stars: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A stored image upload.
pub struct Upload {
    /// Stored filename; reference this from posts.
    pub filename: String,
    /// Server-side storage path.
    pub path: String,
}
