//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{any, get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use weapp::{WeappClient, WeappOptions};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{
    PostgresCacheStore, PostgresCouponRepository, PostgresStoreRepository, PostgresUserRepository,
    ServerDeps, WeappAdapter,
};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{coupons, health_handler, store, users};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

/// Build the API router over a dependency container.
///
/// Kept separate from `build_app` so tests can mount the same routes over
/// in-memory dependencies.
pub fn api_router(deps: Arc<ServerDeps>) -> Router {
    let auth_deps = deps.clone();

    Router::new()
        // Mini-program user endpoints
        .route("/api/verification-codes", post(users::send_code))
        .route("/api/weapp/users", post(users::weapp_store))
        .route("/api/coupons/:id/receive", post(coupons::receive))
        // Merchant endpoints; verbs are deliberately unconstrained
        .route("/api/store/getCode", any(store::get_code_handler))
        .route("/api/store/login", any(store::login_handler))
        .route("/api/store/register", any(store::register_handler))
        .route("/api/store/me", any(store::me_handler))
        .route("/api/store/logout", any(store::logout_handler))
        .route("/api/store/refresh", any(store::refresh_handler))
        .route("/api/store/store", any(store::update_handler))
        .route("/api/store/coupon/publish", any(store::publish_coupon_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(auth_deps.clone(), req, next)
        }))
        .layer(Extension(deps))
}

/// Build the Axum application with production adapters wired in.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let weapp_client = Arc::new(WeappClient::new(WeappOptions {
        app_id: config.weapp_app_id.clone(),
        app_secret: config.weapp_app_secret.clone(),
    }));

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        config.token_ttl_minutes,
    ));

    let deps = Arc::new(ServerDeps::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresStoreRepository::new(pool.clone())),
        Arc::new(PostgresCouponRepository::new(pool.clone())),
        Arc::new(PostgresCacheStore::new(pool.clone())),
        Arc::new(WeappAdapter::new(weapp_client)),
        jwt_service,
        config.weapp_bind_issues_token,
    ));

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting: 10 requests per second per IP with bursts of 20,
    // mostly to keep code issuance from being farmed
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    api_router(deps)
        .layer(rate_limit_layer)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        .layer(Extension(AppState {
            db_pool: pool.clone(),
        }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
