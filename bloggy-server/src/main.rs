use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::blog_service::BlogService;
use application::comment_service::CommentService;
use application::star_service::StarService;
use application::upload_service::UploadService;
use data::repositories::postgres::comment_repository::PostgresCommentRepository;
use data::repositories::postgres::image_repository::PostgresImageRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::star_repository::PostgresStarRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::mailer::Mailer;
use infrastructure::settings::Settings;
use infrastructure::tokens::TokenService;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let session_tokens = Arc::new(TokenService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));
    let email_tokens = Arc::new(TokenService::new(
        &settings.email_token_secret,
        settings.email_token_ttl_seconds,
    ));
    let mailer = Mailer::new(&settings.smtp, &settings.verification_base_url)?;

    let auth_service = Arc::new(AuthService::new(
        PostgresUserRepository::new(pool.clone()),
        session_tokens.clone(),
        email_tokens,
        mailer,
    ));
    let blog_service = Arc::new(BlogService::new(
        PostgresPostRepository::new(pool.clone()),
        PostgresImageRepository::new(pool.clone()),
    ));
    let comment_service = Arc::new(CommentService::new(PostgresCommentRepository::new(
        pool.clone(),
    )));
    let star_service = Arc::new(StarService::new(PostgresStarRepository::new(pool.clone())));
    let upload_service = Arc::new(UploadService::new(
        PostgresImageRepository::new(pool),
        &settings.upload_dir,
        settings.upload_max_bytes,
    ));

    let state = AppState {
        auth_service,
        blog_service,
        comment_service,
        star_service,
        upload_service,
        session_tokens,
    };

    server::run_http(&settings, state).await
}
