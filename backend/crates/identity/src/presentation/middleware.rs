//! Identity Middleware
//!
//! Authentication for protected routes.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::AccountAddress;
use kernel::id::TraderId;
use platform::header::{extract_client_ip, extract_token};

use crate::application::CheckTokenUseCase;
use crate::domain::repository::TraderRepository;
use crate::error::IdentityError;
use crate::presentation::handlers::IdentityAppState;

/// The authenticated trader, placed in request extensions by
/// [`require_trader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTrader {
    pub trader_id: TraderId,
    pub name: String,
    pub account: AccountAddress,
}

impl<S> FromRequestParts<S> for CurrentTrader
where
    S: Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentTrader>()
            .cloned()
            .ok_or(IdentityError::MissingToken)
    }
}

/// Middleware that requires a valid bearer token
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_trader<R>(
    State(state): State<IdentityAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, IdentityError>
where
    R: TraderRepository + Send + Sync + 'static,
{
    let token = extract_token(req.headers(), &state.config.token_header).ok_or_else(|| {
        let direct_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        let client_ip = extract_client_ip(req.headers(), direct_ip);
        tracing::debug!(client_ip = ?client_ip, path = %req.uri().path(), "Missing token");
        IdentityError::MissingToken
    })?;

    let trader = CheckTokenUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&token)
        .await?;

    req.extensions_mut().insert(CurrentTrader {
        trader_id: trader.trader_id,
        name: trader.name.original().to_string(),
        account: trader.account,
    });

    Ok(next.run(req).await)
}
