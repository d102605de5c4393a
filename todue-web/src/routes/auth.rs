/// Authentication endpoints
///
/// Registration, login, and logout. All three drive the credential store
/// and session store in `todue-shared`; the session itself travels as a
/// signed cookie managed here.
///
/// # Endpoints
///
/// - `POST /register` - Create account, redirect to login
/// - `POST /login` - Verify credentials, establish session, redirect home
/// - `GET|POST /logout` - Revoke session, redirect to login

use crate::{
    app::{AppState, CurrentUser, SESSION_COOKIE},
    error::{AppError, AppResult, ValidationErrorDetail},
};
use axum::{
    extract::{Extension, State},
    response::Redirect,
    Form,
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::Deserialize;
use todue_shared::{
    auth::{password, session::Session},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Registration form
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Desired login name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1 and 255 characters"
    ))]
    pub username: String,

    /// Raw password (validated against the configured policy)
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Nickname must be at most 255 characters"))]
    pub nickname: Option<String>,
}

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Login name
    pub username: String,

    /// Raw password
    pub password: String,
}

/// Maps validator failures into the 400 validation error shape
fn validation_details(e: validator::ValidationErrors) -> AppError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    AppError::ValidationError(errors)
}

/// Register a new account
///
/// Hashes the password with Argon2id and inserts the user. The database's
/// unique constraint is the only duplicate check, so two concurrent
/// registrations of the same name cannot both succeed.
///
/// # Errors
///
/// - `400 Bad Request`: empty username, password under the configured
///   minimum, or username already taken
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    form.validate().map_err(validation_details)?;

    state
        .config
        .password_policy()
        .validate(&form.password)
        .map_err(|msg| AppError::validation("password", msg))?;

    let password_hash = password::hash_password(&form.password)?;

    // Unique violation on username maps to DuplicateUsername in error.rs
    let user = User::create(
        &state.db,
        CreateUser {
            username: form.username,
            password_hash,
            nickname: form.nickname,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Redirect::to("/login"))
}

/// Log in and establish a session
///
/// An unknown username and a wrong password fail identically so account
/// existence does not leak. On success a server-side session row is
/// created and its token is set as a signed, http-only cookie.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let user = User::find_by_username(&state.db, &form.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid = password::verify_password(&form.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let session = Session::create(&state.db, user.id, state.config.session_ttl()).await?;

    // Lax keeps the cookie off cross-site subrequests and form posts
    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((jar.add(cookie), Redirect::to("/")))
}

/// Log out, revoking the session
///
/// Deletes the server-side session row and clears the cookie. Reachable
/// via both GET and POST.
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<(SignedCookieJar, Redirect)> {
    Session::revoke(&state.db, &current.session_token).await?;

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();

    tracing::info!(user_id = %current.user_id, "User logged out");

    Ok((jar.remove(removal), Redirect::to("/login")))
}
