use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::crypto::Credential;
use crate::db::{NewUser, SessionRepository, User, UserRepository};
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            title: user.title,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: AccountResponse,
    pub token: String,
    pub expires_at: i64,
}

/// Usernames are lowercase ASCII letters, digits, `_` and `-`.
pub fn validate_username(username: &str) -> Result<String, AppError> {
    let username = username.trim().to_lowercase();

    if username.len() < 3 || username.len() > 32 {
        return Err(AppError::Validation(
            "username must be 3-32 characters".to_string(),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "username must be lowercase, alphanumeric, and can include dashes or underscores"
                .to_string(),
        ));
    }

    Ok(username)
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::Validation("invalid email address".to_string())),
    }
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

async fn open_session(state: &AppState, user: User) -> Result<SessionResponse, AppError> {
    let session = SessionRepository::create(
        &state.db,
        &user.id,
        state.clock.now().timestamp(),
        state.config.session_expiry_hours,
    )
    .await?;

    Ok(SessionResponse {
        user: user.into(),
        token: session.token,
        expires_at: session.expires_at,
    })
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let Json(req) = payload?;
    let (Some(username), Some(email), Some(password), Some(name)) = (
        required(req.username),
        required(req.email),
        required(req.password),
        required(req.name),
    ) else {
        return Err(AppError::Validation("missing required fields".to_string()));
    };

    let username = validate_username(&username)?;
    let email = normalize_email(&email)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if UserRepository::exists(&state.db, &username, &email).await? {
        return Err(AppError::Conflict(
            "username or email already exists".to_string(),
        ));
    }

    let credential = Credential::derive(&password)?;
    let title = required(req.title);

    let user = UserRepository::create(
        &state.db,
        NewUser {
            username: &username,
            email: &email,
            name: name.trim(),
            title: title.as_deref().map(str::trim),
            password_hash: &credential.hash,
            password_salt: &credential.salt,
        },
        state.clock.now().timestamp(),
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "user signed up");

    let response = open_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(req) = payload?;
    let (Some(email), Some(password)) = (required(req.email), req.password) else {
        return Err(AppError::Validation("missing email or password".to_string()));
    };

    let user = UserRepository::get_by_email(&state.db, &email.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::Auth("invalid credentials".to_string()))?;

    let credential = Credential::from_stored(&user.password_hash, &user.password_salt)?;
    if !credential.verify(&password)? {
        return Err(AppError::Auth("invalid credentials".to_string()));
    }

    Ok(Json(open_session(&state, user).await?))
}

/// POST /api/auth/logout (requires auth)
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, AppError> {
    SessionRepository::delete(&state.db, &current.token).await?;

    Ok(Json(serde_json::json!({"success": true})))
}

/// GET /api/auth/me (requires auth)
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<AccountResponse>, AppError> {
    let user = UserRepository::get_by_id(&state.db, &current.user_id)
        .await?
        .ok_or_else(|| AppError::Auth("unauthorized".to_string()))?;

    Ok(Json(user.into()))
}
