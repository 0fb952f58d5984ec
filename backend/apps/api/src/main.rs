//! API Server Entry Point
//!
//! Wires the identity, catalog, ledger and purchase routers onto one
//! server. Start-up failures are `anyhow` errors; request errors are each
//! crate's own error type rendered through `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, http,
    http::{Method, header},
    middleware::from_fn_with_state,
};
use catalog::{CatalogAppState, IpfsContentStore, PgListingRepository, catalog_router};
use identity::{IdentityAppState, PgTraderRepository, identity_router, require_trader};
use ledger::{JsonRpcLedger, LedgerAppState, ledger_router};
use purchase::{PgPurchaseOrderRepository, PurchaseAppState, purchase_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,identity=info,catalog=info,ledger=info,purchase=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Collaborators
    let token_header = config.identity.token_header.clone();
    let identity_state =
        IdentityAppState::new(PgTraderRepository::new(pool.clone()), config.identity.clone());
    let traders = Arc::new(PgTraderRepository::new(pool.clone()));
    let listings = Arc::new(PgListingRepository::new(pool.clone()));
    let orders = Arc::new(PgPurchaseOrderRepository::new(pool.clone()));
    let content = Arc::new(IpfsContentStore::new(&config.catalog)?);
    let ledger_config = Arc::new(config.ledger.clone());
    let gateway = Arc::new(JsonRpcLedger::new(config.ledger.clone())?);

    tracing::info!(
        rpc_url = %ledger_config.rpc_url,
        token_contract = ?ledger_config.token_contract,
        ipfs_api_url = %config.catalog.ipfs_api_url,
        reward_policy = %config.purchase.reward_policy,
        "Gateways configured"
    );

    let authenticated = from_fn_with_state(
        identity_state.clone(),
        require_trader::<PgTraderRepository>,
    );

    let catalog = catalog_router(CatalogAppState::new(
        listings.clone(),
        content,
        config.catalog.clone(),
    ))
    .route_layer(authenticated.clone());

    let ledger = ledger_router(LedgerAppState::new(gateway.clone(), ledger_config))
        .route_layer(authenticated.clone());

    let purchase = purchase_router(PurchaseAppState::new(
        orders,
        traders,
        listings,
        gateway,
        config.purchase.clone(),
    ))
    .route_layer(authenticated);

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            http::HeaderName::try_from(token_header.as_str())?,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(identity_router(identity_state))
        .merge(catalog)
        .merge(ledger)
        .merge(purchase)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
