use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    create_post, delete_post, get_post, is_post_starred, list_most_starred_posts, list_posts,
    list_posts_by_author, star_post, unstar_post, update_post,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/most-starred", get(list_most_starred_posts))
        .route("/author/{author_id}", get(list_posts_by_author))
        .route("/{id}", get(get_post));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{id}", put(update_post).delete(delete_post))
        .route("/{id}/star", post(star_post).delete(unstar_post))
        .route("/{id}/starred", get(is_post_starred))
        .layer(middleware::from_fn_with_state(
            state.session_tokens.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
