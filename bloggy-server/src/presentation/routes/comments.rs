use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    create_comment, delete_comment, list_comments_by_post,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/post/{post_id}", get(list_comments_by_post));

    let protected = Router::new()
        .route("/", post(create_comment))
        .route("/{id}", delete(delete_comment))
        .layer(middleware::from_fn_with_state(
            state.session_tokens.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
