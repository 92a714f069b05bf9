use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::users::{get_me, get_my_starred_posts, get_username};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/{id}/username", get(get_username));

    let protected = Router::new()
        .route("/me", get(get_me))
        .route("/me/starred", get(get_my_starred_posts))
        .layer(middleware::from_fn_with_state(
            state.session_tokens.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
