//! Identity Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::domain::repository::TraderRepository;
use crate::presentation::handlers::{self, IdentityAppState};
use crate::presentation::middleware::require_trader;

/// Create the Identity router for any repository implementation
///
/// `/signup` and `/login` are public; everything else requires a token.
pub fn identity_router<R>(state: IdentityAppState<R>) -> Router
where
    R: TraderRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/users/me", get(handlers::me::<R>))
        .route("/trader/me", get(handlers::me::<R>))
        .route("/trader", get(handlers::list_traders::<R>))
        .route_layer(from_fn_with_state(state.clone(), require_trader::<R>));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
