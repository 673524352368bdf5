//! Application state and router builder.
//!
//! [`AppState`] carries the database pool, the configuration, and the
//! external collaborators (object storage, speech synthesis, payment
//! gateway) as injected trait objects, so nothing in the request path
//! reaches for a global client.
//!
//! # Example
//!
//! ```no_run
//! use quillcast_api::{app::AppState, config::Config};
//! use quillcast_api::clients::{
//!     payments::StripeGateway, storage::HttpBlobStorage, tts::TranslateTts,
//! };
//! use sqlx::PgPool;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let http = reqwest::Client::new();
//!
//! let state = AppState::new(
//!     pool,
//!     config.clone(),
//!     Arc::new(HttpBlobStorage::new(
//!         http.clone(),
//!         &config.storage.endpoint,
//!         &config.storage.access_key,
//!         &config.storage.public_url,
//!     )),
//!     Arc::new(TranslateTts::new(http.clone(), &config.tts.endpoint)),
//!     Arc::new(StripeGateway::new(http, &config.payment.secret_key)),
//! );
//! let app = quillcast_api::app::build_router(state);
//! # Ok(())
//! # }
//! ```

use crate::{
    clients::{payments::PaymentGateway, storage::ObjectStorage, tts::SpeechSynthesizer},
    config::Config,
    middleware::security::apply_security_headers,
};
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use quillcast_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Upload size ceiling: the upload filter admits large media files.
const MAX_UPLOAD_BYTES: usize = 3000 * 1024 * 1024;

/// Shared application state, cloned per request via Axum's `State`
/// extractor. Everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// HTTP client for document downloads
    pub http: reqwest::Client,

    /// Object storage collaborator
    pub storage: Arc<dyn ObjectStorage>,

    /// Speech synthesis collaborator
    pub tts: Arc<dyn SpeechSynthesizer>,

    /// Payment gateway collaborator
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Creates new application state with injected collaborators.
    pub fn new(
        db: PgPool,
        config: Config,
        storage: Arc<dyn ObjectStorage>,
        tts: Arc<dyn SpeechSynthesizer>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
            storage,
            tts,
            payments,
        }
    }

    /// Gets the JWT secret for token operations.
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router.
///
/// # Routes
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// ├── /users
/// │   ├── POST   /create                   # Register (public)
/// │   ├── GET    /                         # List users (auth)
/// │   ├── GET    /:id                      # Get user (auth)
/// │   ├── PUT    /update                   # Update profile, multipart (auth)
/// │   └── DELETE /:id                      # Delete another user (auth)
/// ├── /auth
/// │   ├── POST /login
/// │   └── POST /refresh
/// ├── /manuscript
/// │   ├── POST   /create                   # Ingestion pipeline, multipart (auth)
/// │   ├── GET    /                         # Search & listing
/// │   ├── GET    /analytics                # Analytics, multipart document
/// │   ├── GET    /:id                      # Single manuscript
/// │   ├── DELETE /search/:id               # Delete one recent search
/// │   └── DELETE /deleteSearch             # Clear recent searches
/// ├── /payment
/// │   ├── POST /create-payment-intent      # (auth)
/// │   └── GET  /payments                   # (auth)
/// ├── /review
/// │   ├── POST /                           # Create review
/// │   ├── GET  /                           # All reviews
/// │   └── GET  /:id                        # Reviews for one manuscript
/// └── /notification
///     └── GET /?email=                     # Notifications by user email
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/create", post(routes::users::create_user))
        .merge(
            Router::new()
                .route("/", get(routes::users::get_users))
                .route("/update", put(routes::users::update_user))
                .route(
                    "/:id",
                    get(routes::users::get_single_user).delete(routes::users::delete_user),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    jwt_auth_layer,
                )),
        );

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let manuscript_routes = Router::new()
        .route("/", get(routes::manuscripts::get_manuscripts))
        .route("/analytics", get(routes::manuscripts::get_analytics))
        .route("/:id", get(routes::manuscripts::get_manuscript))
        .route("/search/:id", delete(routes::manuscripts::delete_search))
        .route("/deleteSearch", delete(routes::manuscripts::delete_all_searches))
        .merge(
            Router::new()
                .route("/create", post(routes::manuscripts::create_manuscript))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    jwt_auth_layer,
                )),
        );

    let payment_routes = Router::new()
        .route(
            "/create-payment-intent",
            post(routes::payments::create_payment_intent),
        )
        .route("/payments", get(routes::payments::get_payments))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let review_routes = Router::new()
        .route(
            "/",
            post(routes::reviews::create_review).get(routes::reviews::get_reviews),
        )
        .route("/:id", get(routes::reviews::get_reviews_for_manuscript));

    let notification_routes =
        Router::new().route("/", get(routes::notifications::get_notifications));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/users", user_routes)
        .nest("/auth", auth_routes)
        .nest("/manuscript", manuscript_routes)
        .nest("/payment", payment_routes)
        .nest("/review", review_routes)
        .nest("/notification", notification_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn(move |req, next| {
            apply_security_headers(production, req, next)
        }))
        .with_state(state)
}

/// JWT authentication middleware layer.
///
/// Validates the Bearer token from the Authorization header and injects an
/// [`AuthContext`] into request extensions.
pub async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    req.extensions_mut()
        .insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
