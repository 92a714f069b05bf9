use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::star_service::StarService;
use crate::application::upload_service::UploadService;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::image_repository::PostgresImageRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::star_repository::PostgresStarRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::tokens::TokenService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) blog_service: Arc<BlogService<PostgresPostRepository, PostgresImageRepository>>,
    pub(crate) comment_service: Arc<CommentService<PostgresCommentRepository>>,
    pub(crate) star_service: Arc<StarService<PostgresStarRepository>>,
    pub(crate) upload_service: Arc<UploadService<PostgresImageRepository>>,
    pub(crate) session_tokens: Arc<TokenService>,
}
