//! Client library for the bloggy-server REST API.
//!
//! [`BloggyClient`] keeps the JWT obtained from `login` and automatically
//! presents it on protected operations. Registration does not yield a token:
//! the account has to verify its email address first.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BloggyClientError, BloggyClientResult};
pub use models::{
    AuthResponse, Comment, ListPostsResponse, Post, RegisterResponse, StarState, Upload, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Client for the bloggy-server REST API with token management.
pub struct BloggyClient {
    http: HttpClient,
    token: Option<String>,
}

impl BloggyClient {
    /// Creates a client for the given base URL, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
            token: None,
        }
    }

    /// Sets the JWT manually.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Returns the stored JWT, if any.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Clears the stored JWT (client-side logout).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn token(&self) -> BloggyClientResult<&str> {
        self.token.as_deref().ok_or(BloggyClientError::Unauthorized)
    }

    /// Registers a user; a verification email is sent to the given address.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BloggyClientResult<RegisterResponse> {
        self.http.register(username, email, password).await
    }

    /// Logs in and stores the returned JWT for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> BloggyClientResult<AuthResponse> {
        let auth = self.http.login(email, password).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    /// Redeems an email-verification token.
    pub async fn verify_email(&self, token: &str) -> BloggyClientResult<()> {
        self.http.verify_email(token).await
    }

    /// Fetches the authenticated user's own record.
    pub async fn me(&self) -> BloggyClientResult<User> {
        self.http.me(self.token()?).await
    }

    /// Looks up a username by user id.
    pub async fn username_of(&self, user_id: i64) -> BloggyClientResult<String> {
        self.http.username_of(user_id).await
    }

    /// Lists the ids of posts the authenticated user has starred.
    pub async fn my_starred_posts(&self) -> BloggyClientResult<Vec<i64>> {
        self.http.my_starred_posts(self.token()?).await
    }

    /// Creates a post, optionally referencing an uploaded image.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        image: Option<&str>,
    ) -> BloggyClientResult<Post> {
        self.http
            .create_post(self.token()?, title, content, image)
            .await
    }

    /// Fetches a post by id.
    pub async fn get_post(&self, id: i64) -> BloggyClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Updates one of the authenticated user's posts.
    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        image: Option<&str>,
    ) -> BloggyClientResult<Post> {
        self.http
            .update_post(self.token()?, id, title, content, image)
            .await
    }

    /// Deletes one of the authenticated user's posts.
    pub async fn delete_post(&self, id: i64) -> BloggyClientResult<()> {
        self.http.delete_post(self.token()?, id).await
    }

    /// Lists posts with pagination, newest first.
    pub async fn list_posts(&self, page: u32, limit: u32) -> BloggyClientResult<ListPostsResponse> {
        self.http.list_posts(page, limit).await
    }

    /// Lists posts ordered by star count descending.
    pub async fn list_most_starred_posts(
        &self,
        page: u32,
        limit: u32,
    ) -> BloggyClientResult<ListPostsResponse> {
        self.http.list_most_starred_posts(page, limit).await
    }

    /// Lists posts by a given author, newest first.
    pub async fn list_posts_by_author(
        &self,
        author_id: i64,
        page: u32,
        limit: u32,
    ) -> BloggyClientResult<ListPostsResponse> {
        self.http.list_posts_by_author(author_id, page, limit).await
    }

    /// Stars a post. Idempotent.
    pub async fn star_post(&self, id: i64) -> BloggyClientResult<StarState> {
        self.http.star_post(self.token()?, id).await
    }

    /// Removes the star from a post. Idempotent.
    pub async fn unstar_post(&self, id: i64) -> BloggyClientResult<StarState> {
        self.http.unstar_post(self.token()?, id).await
    }

    /// Reports whether the authenticated user starred the given post.
    pub async fn is_post_starred(&self, id: i64) -> BloggyClientResult<bool> {
        self.http.is_post_starred(self.token()?, id).await
    }

    /// Lists comments for a post, oldest first.
    pub async fn comments_for_post(&self, post_id: i64) -> BloggyClientResult<Vec<Comment>> {
        self.http.comments_for_post(post_id).await
    }

    /// Creates a comment on a post.
    pub async fn create_comment(&self, post_id: i64, content: &str) -> BloggyClientResult<Comment> {
        self.http
            .create_comment(self.token()?, post_id, content)
            .await
    }

    /// Deletes one of the authenticated user's comments.
    pub async fn delete_comment(&self, id: i64) -> BloggyClientResult<()> {
        self.http.delete_comment(self.token()?, id).await
    }

    /// Uploads an image and returns the stored reference.
    pub async fn upload_image(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> BloggyClientResult<Upload> {
        self.http
            .upload_image(self.token()?, filename, content_type, data)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::{BloggyClient, BloggyClientError};

    #[tokio::test]
    async fn protected_calls_without_token_fail_locally() {
        let client = BloggyClient::new("http://127.0.0.1:8080");
        let err = client
            .create_post("title", "content", None)
            .await
            .expect_err("must fail without token");
        assert!(matches!(err, BloggyClientError::Unauthorized));
    }

    #[test]
    fn token_round_trip() {
        let mut client = BloggyClient::new("http://127.0.0.1:8080");
        assert!(client.get_token().is_none());

        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));

        client.clear_token();
        assert!(client.get_token().is_none());
    }
}
