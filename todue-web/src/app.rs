/// Application state, router builder, and session middleware
///
/// This module defines the shared application state, the session-resolution
/// middleware, and the function that assembles the Axum router.
///
/// # Example
///
/// ```no_run
/// use todue_web::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = todue_web::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use sqlx::PgPool;
use std::sync::Arc;
use todue_shared::auth::session::Session;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "todue_session";

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Key for signing the session cookie, derived from `SESSION_SECRET`
    cookie_key: Key,
}

impl AppState {
    /// Creates new application state
    ///
    /// The cookie signing key is derived from the configured session
    /// secret; `Config::from_env` has already rejected secrets under
    /// 32 characters.
    pub fn new(db: PgPool, config: Config) -> Self {
        let cookie_key = Key::derive_from(config.session.secret.as_bytes());
        Self {
            db,
            config: Arc::new(config),
            cookie_key,
        }
    }
}

// Lets SignedCookieJar extract its key from the shared state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Authenticated identity injected into request extensions
///
/// Present on every request that reaches a protected handler. Handlers
/// extract it with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user
    pub user_id: Uuid,

    /// The session token backing this request (needed for logout)
    pub session_token: String,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health          # Health check (public)
/// ├── POST /register        # Create account (public)
/// ├── POST /login           # Establish session (public)
/// ├── GET|POST /logout      # Revoke session
/// ├── GET  /                # List todos (ascending due time)
/// ├── POST /                # Create todo
/// ├── GET  /update/:id      # Fetch one todo (edit form source)
/// ├── POST /update/:id      # Update content/due time
/// ├── GET  /complete/:id    # Toggle completed
/// └── GET  /delete/:id      # Delete todo
/// ```
///
/// Everything below `/logout` requires a live session; anonymous requests
/// are redirected to `/login` by [`session_auth_layer`] before any store
/// access happens.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no session required
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Owner-scoped todo routes plus logout, all behind the session layer
    let protected_routes = Router::new()
        .route("/", get(routes::todos::index).post(routes::todos::create))
        .route(
            "/update/:id",
            get(routes::todos::edit).post(routes::todos::update),
        )
        .route("/complete/:id", get(routes::todos::complete))
        .route("/delete/:id", get(routes::todos::delete))
        .route(
            "/logout",
            get(routes::auth::logout).post(routes::auth::logout),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Session authentication middleware
///
/// Reads the signed session cookie, resolves it against the server-side
/// session store, and injects [`CurrentUser`] into request extensions.
/// A missing, tampered, unknown, or expired cookie all resolve the same
/// way: the request is anonymous and gets redirected to the login flow
/// before any todo store access occurs.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    // A tampered signature makes the cookie vanish from the jar
    let jar = SignedCookieJar::from_headers(req.headers(), state.cookie_key.clone());

    let token = match jar.get(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Redirect::to("/login").into_response(),
    };

    let session = match Session::resolve(&state.db, &token).await {
        Ok(Some(session)) => session,
        Ok(None) => return Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            return crate::error::AppError::InternalError(format!("Session lookup failed: {}", e))
                .into_response();
        }
    };

    req.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        session_token: session.token,
    });

    next.run(req).await
}
