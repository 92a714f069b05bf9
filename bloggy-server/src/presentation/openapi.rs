use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{
    AuthResponseDto, LoginDto, MessageDto, RegisterDto, RegisterResponseDto, UserDto,
};
use crate::presentation::handlers::comments::{
    CommentDto, CreateCommentDto, ListCommentsResponseDto,
};
use crate::presentation::handlers::posts::{
    CreatePostDto, ListPostsResponseDto, PaginationQuery, PostDto, StarStateDto, StarredDto,
    UpdatePostDto,
};
use crate::presentation::handlers::uploads::UploadResponseDto;
use crate::presentation::handlers::users::{StarredPostsDto, UsernameDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::verify_email,
        crate::presentation::handlers::users::get_username,
        crate::presentation::handlers::users::get_me,
        crate::presentation::handlers::users::get_my_starred_posts,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::list_most_starred_posts,
        crate::presentation::handlers::posts::list_posts_by_author,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::star_post,
        crate::presentation::handlers::posts::unstar_post,
        crate::presentation::handlers::posts::is_post_starred,
        crate::presentation::handlers::comments::list_comments_by_post,
        crate::presentation::handlers::comments::create_comment,
        crate::presentation::handlers::comments::delete_comment,
        crate::presentation::handlers::uploads::upload_image
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            RegisterResponseDto,
            AuthResponseDto,
            MessageDto,
            UserDto,
            UsernameDto,
            StarredPostsDto,
            CreatePostDto,
            UpdatePostDto,
            PaginationQuery,
            PostDto,
            ListPostsResponseDto,
            StarStateDto,
            StarredDto,
            CreateCommentDto,
            CommentDto,
            ListCommentsResponseDto,
            UploadResponseDto
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and email verification"),
        (name = "users", description = "User endpoints"),
        (name = "posts", description = "Post and star endpoints"),
        (name = "comments", description = "Comment endpoints"),
        (name = "uploads", description = "Image upload endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
