//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::application::config::IdentityConfig;
use crate::application::{
    AuthenticatedOutput, ListTradersUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::repository::TraderRepository;
use crate::error::IdentityResult;
use crate::presentation::dto::{
    AuthResponse, LoginRequest, MeResponse, MessageResponse, SignUpRequest, TraderResponse,
};
use crate::presentation::middleware::CurrentTrader;

/// Shared state for identity handlers and the authentication middleware
pub struct IdentityAppState<R>
where
    R: TraderRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<IdentityConfig>,
}

impl<R> IdentityAppState<R>
where
    R: TraderRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, config: IdentityConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

impl<R> Clone for IdentityAppState<R>
where
    R: TraderRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

fn auth_response(output: AuthenticatedOutput) -> AuthResponse {
    AuthResponse {
        token: output.token,
        expires_at: output.expires_at,
        trader: TraderResponse::from(&output.trader),
    }
}

/// POST /signup
pub async fn sign_up<R>(
    State(state): State<IdentityAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> IdentityResult<Json<AuthResponse>>
where
    R: TraderRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            name: req.username,
            password: req.password,
            account: req.account,
        })
        .await?;

    Ok(Json(auth_response(output)))
}

/// POST /login
pub async fn login<R>(
    State(state): State<IdentityAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> IdentityResult<Json<AuthResponse>>
where
    R: TraderRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            name: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(auth_response(output)))
}

/// POST /logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(current: CurrentTrader) -> Json<MessageResponse> {
    tracing::info!(trader_id = %current.trader_id, "Trader logged out");
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

/// GET /users/me, GET /trader/me
pub async fn me<R>(
    State(state): State<IdentityAppState<R>>,
    current: CurrentTrader,
) -> IdentityResult<Json<MeResponse>>
where
    R: TraderRepository + Send + Sync + 'static,
{
    let trader = ListTradersUseCase::new(state.repo.clone())
        .get(current.trader_id)
        .await?;

    Ok(Json(MeResponse {
        trader: TraderResponse::from(&trader),
    }))
}

/// GET /trader
pub async fn list_traders<R>(
    State(state): State<IdentityAppState<R>>,
) -> IdentityResult<Json<Vec<TraderResponse>>>
where
    R: TraderRepository + Send + Sync + 'static,
{
    let traders = ListTradersUseCase::new(state.repo.clone()).all().await?;
    Ok(Json(traders.iter().map(TraderResponse::from).collect()))
}
