use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BloggyClientError, BloggyClientResult};
use crate::models::{
    AuthResponse, Comment, ListPostsResponse, Post, RegisterResponse, StarState, Upload, User,
};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    image: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UpdatePostRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    image: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateCommentRequestDto<'a> {
    post_id: i64,
    content: &'a str,
}

#[derive(Serialize)]
struct ListPostsQuery {
    page: u32,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: i64,
    username: String,
    email: String,
    is_verified: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponseDto {
    message: String,
    user: UserDto,
}

#[derive(Debug, Deserialize)]
struct AuthResponseDto {
    access_token: String,
    user: UserDto,
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    #[allow(dead_code)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct UsernameDto {
    username: String,
}

#[derive(Debug, Deserialize)]
struct StarredPostsDto {
    post_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct PostDto {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    image: Option<String>,
    star_count: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct ListPostsResponseDto {
    posts: Vec<PostDto>,
    page: u32,
    limit: u32,
    total: i64,
}

#[derive(Debug, Deserialize)]
struct StarStateDto {
    starred: bool,
    stars: i64,
}

#[derive(Debug, Deserialize)]
struct StarredDto {
    starred: bool,
}

#[derive(Debug, Deserialize)]
struct CommentDto {
    id: i64,
    content: String,
    author_id: i64,
    post_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct ListCommentsResponseDto {
    comments: Vec<CommentDto>,
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    filename: String,
    path: String,
}

impl From<UserDto> for User {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            is_verified: value.is_verified,
            created_at: value.created_at,
        }
    }
}

impl From<RegisterResponseDto> for RegisterResponse {
    fn from(value: RegisterResponseDto) -> Self {
        Self {
            message: value.message,
            user: value.user.into(),
        }
    }
}

impl From<AuthResponseDto> for AuthResponse {
    fn from(value: AuthResponseDto) -> Self {
        Self {
            access_token: value.access_token,
            user: value.user.into(),
        }
    }
}

impl From<PostDto> for Post {
    fn from(value: PostDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            author_id: value.author_id,
            image: value.image,
            star_count: value.star_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<ListPostsResponseDto> for ListPostsResponse {
    fn from(value: ListPostsResponseDto) -> Self {
        Self {
            posts: value.posts.into_iter().map(Post::from).collect(),
            page: value.page,
            limit: value.limit,
            total: value.total.max(0) as u64,
        }
    }
}

impl From<StarStateDto> for StarState {
    fn from(value: StarStateDto) -> Self {
        Self {
            starred: value.starred,
            stars: value.stars,
        }
    }
}

impl From<CommentDto> for Comment {
    fn from(value: CommentDto) -> Self {
        Self {
            id: value.id,
            content: value.content,
            author_id: value.author_id,
            post_id: value.post_id,
            created_at: value.created_at,
        }
    }
}

impl From<UploadResponseDto> for Upload {
    fn from(value: UploadResponseDto) -> Self {
        Self {
            filename: value.filename,
            path: value.path,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP client for the bloggy-server REST API.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client for the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn decode_error(response: reqwest::Response) -> BloggyClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        BloggyClientError::from_http_status(status, Some(message))
    }

    /// Sends a prepared request and decodes the JSON body on success.
    async fn execute<TRes>(request: RequestBuilder) -> BloggyClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(BloggyClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(BloggyClientError::from_reqwest)
    }

    /// Sends a prepared request and discards the body on success.
    async fn execute_no_content(request: RequestBuilder) -> BloggyClientResult<()> {
        let response = request
            .send()
            .await
            .map_err(BloggyClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(())
    }

    /// Registers a user. The account must verify its email before logging in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BloggyClientResult<RegisterResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        let dto: RegisterResponseDto = Self::execute(
            self.request(Method::POST, "/api/auth/register", None)
                .json(&payload),
        )
        .await?;
        Ok(dto.into())
    }

    /// Logs a user in and returns the JWT plus user data.
    pub async fn login(&self, email: &str, password: &str) -> BloggyClientResult<AuthResponse> {
        let payload = LoginRequestDto { email, password };
        let dto: AuthResponseDto = Self::execute(
            self.request(Method::POST, "/api/auth/login", None)
                .json(&payload),
        )
        .await?;
        Ok(dto.into())
    }

    /// Redeems an email-verification token.
    pub async fn verify_email(&self, token: &str) -> BloggyClientResult<()> {
        let _: MessageDto = Self::execute(self.request(
            Method::GET,
            &format!("/api/auth/verify/{token}"),
            None,
        ))
        .await?;
        Ok(())
    }

    /// Fetches the authenticated user's own record.
    pub async fn me(&self, token: &str) -> BloggyClientResult<User> {
        let dto: UserDto =
            Self::execute(self.request(Method::GET, "/api/users/me", Some(token))).await?;
        Ok(dto.into())
    }

    /// Looks up a username by user id.
    pub async fn username_of(&self, user_id: i64) -> BloggyClientResult<String> {
        let dto: UsernameDto = Self::execute(self.request(
            Method::GET,
            &format!("/api/users/{user_id}/username"),
            None,
        ))
        .await?;
        Ok(dto.username)
    }

    /// Lists the ids of posts starred by the authenticated user.
    pub async fn my_starred_posts(&self, token: &str) -> BloggyClientResult<Vec<i64>> {
        let dto: StarredPostsDto =
            Self::execute(self.request(Method::GET, "/api/users/me/starred", Some(token))).await?;
        Ok(dto.post_ids)
    }

    /// Creates a post, optionally referencing an uploaded image.
    pub async fn create_post(
        &self,
        token: &str,
        title: &str,
        content: &str,
        image: Option<&str>,
    ) -> BloggyClientResult<Post> {
        let payload = CreatePostRequestDto {
            title,
            content,
            image,
        };
        let dto: PostDto = Self::execute(
            self.request(Method::POST, "/api/posts", Some(token))
                .json(&payload),
        )
        .await?;
        Ok(dto.into())
    }

    /// Fetches a post by id.
    pub async fn get_post(&self, id: i64) -> BloggyClientResult<Post> {
        let dto: PostDto =
            Self::execute(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await?;
        Ok(dto.into())
    }

    /// Updates a post owned by the authenticated user.
    pub async fn update_post(
        &self,
        token: &str,
        id: i64,
        title: &str,
        content: &str,
        image: Option<&str>,
    ) -> BloggyClientResult<Post> {
        let payload = UpdatePostRequestDto {
            title,
            content,
            image,
        };
        let dto: PostDto = Self::execute(
            self.request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
                .json(&payload),
        )
        .await?;
        Ok(dto.into())
    }

    /// Deletes a post owned by the authenticated user.
    pub async fn delete_post(&self, token: &str, id: i64) -> BloggyClientResult<()> {
        Self::execute_no_content(self.request(
            Method::DELETE,
            &format!("/api/posts/{id}"),
            Some(token),
        ))
        .await
    }

    /// Lists posts, newest first.
    pub async fn list_posts(&self, page: u32, limit: u32) -> BloggyClientResult<ListPostsResponse> {
        let query = ListPostsQuery { page, limit };
        let dto: ListPostsResponseDto =
            Self::execute(self.request(Method::GET, "/api/posts", None).query(&query)).await?;
        Ok(dto.into())
    }

    /// Lists posts ordered by star count descending.
    pub async fn list_most_starred_posts(
        &self,
        page: u32,
        limit: u32,
    ) -> BloggyClientResult<ListPostsResponse> {
        let query = ListPostsQuery { page, limit };
        let dto: ListPostsResponseDto = Self::execute(
            self.request(Method::GET, "/api/posts/most-starred", None)
                .query(&query),
        )
        .await?;
        Ok(dto.into())
    }

    /// Lists posts by a given author, newest first.
    pub async fn list_posts_by_author(
        &self,
        author_id: i64,
        page: u32,
        limit: u32,
    ) -> BloggyClientResult<ListPostsResponse> {
        let query = ListPostsQuery { page, limit };
        let dto: ListPostsResponseDto = Self::execute(
            self.request(Method::GET, &format!("/api/posts/author/{author_id}"), None)
                .query(&query),
        )
        .await?;
        Ok(dto.into())
    }

    /// Stars a post for the authenticated user. Idempotent.
    pub async fn star_post(&self, token: &str, id: i64) -> BloggyClientResult<StarState> {
        let dto: StarStateDto = Self::execute(self.request(
            Method::POST,
            &format!("/api/posts/{id}/star"),
            Some(token),
        ))
        .await?;
        Ok(dto.into())
    }

    /// Removes the authenticated user's star from a post. Idempotent.
    pub async fn unstar_post(&self, token: &str, id: i64) -> BloggyClientResult<StarState> {
        let dto: StarStateDto = Self::execute(self.request(
            Method::DELETE,
            &format!("/api/posts/{id}/star"),
            Some(token),
        ))
        .await?;
        Ok(dto.into())
    }

    /// Reports whether the authenticated user starred the given post.
    pub async fn is_post_starred(&self, token: &str, id: i64) -> BloggyClientResult<bool> {
        let dto: StarredDto = Self::execute(self.request(
            Method::GET,
            &format!("/api/posts/{id}/starred"),
            Some(token),
        ))
        .await?;
        Ok(dto.starred)
    }

    /// Lists comments for a post, oldest first.
    pub async fn comments_for_post(&self, post_id: i64) -> BloggyClientResult<Vec<Comment>> {
        let dto: ListCommentsResponseDto = Self::execute(self.request(
            Method::GET,
            &format!("/api/comments/post/{post_id}"),
            None,
        ))
        .await?;
        Ok(dto.comments.into_iter().map(Comment::from).collect())
    }

    /// Creates a comment on a post.
    pub async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        content: &str,
    ) -> BloggyClientResult<Comment> {
        let payload = CreateCommentRequestDto { post_id, content };
        let dto: CommentDto = Self::execute(
            self.request(Method::POST, "/api/comments", Some(token))
                .json(&payload),
        )
        .await?;
        Ok(dto.into())
    }

    /// Deletes a comment owned by the authenticated user.
    pub async fn delete_comment(&self, token: &str, id: i64) -> BloggyClientResult<()> {
        Self::execute_no_content(self.request(
            Method::DELETE,
            &format!("/api/comments/{id}"),
            Some(token),
        ))
        .await
    }

    /// Uploads an image (multipart field `file`) and returns its reference.
    pub async fn upload_image(
        &self,
        token: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> BloggyClientResult<Upload> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(BloggyClientError::from_reqwest)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let dto: UploadResponseDto = Self::execute(
            self.request(Method::POST, "/api/uploads", Some(token))
                .multipart(form),
        )
        .await?;
        Ok(dto.into())
    }
}
