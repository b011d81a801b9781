//! Handlers for the `/users` resource (registration and login).
//!
//! Identity is owned by an external provider. Registration receives the
//! provider's user-created payload; login exchanges a known user id for an
//! access token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::types::UserId;
use helpdesk_db::models::user::{CreateUser, User};
use helpdesk_db::repositories::UserRepo;
use helpdesk_events::{PlatformEvent, EVENT_USER_SIGNUP};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Identity-provider "user created" payload for `POST /users/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub data: ProviderUser,
}

#[derive(Debug, Deserialize)]
pub struct ProviderUser {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<ProviderEmail>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderEmail {
    pub email_address: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

// ---------------------------------------------------------------------------
// POST /users/register
// ---------------------------------------------------------------------------

/// Create a local user for a newly signed-up identity and publish
/// `user.signup` so the welcome mailer can greet them.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let ProviderUser {
        id,
        username,
        email_addresses,
    } = input.data;

    if id.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation("id is required".into())));
    }
    let email = email_addresses
        .into_iter()
        .map(|e| e.email_address)
        .find(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("email is required".into())))?;

    if UserRepo::exists(&state.pool, &id).await? {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            id,
            name: username.unwrap_or_default(),
            email,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    state.event_bus.publish(
        PlatformEvent::new(EVENT_USER_SIGNUP)
            .with_source("user", &user.id)
            .with_actor(user.id.clone())
            .with_payload(serde_json::json!({ "email": user.email })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

// ---------------------------------------------------------------------------
// POST /users/login
// ---------------------------------------------------------------------------

/// Issue an access token for a registered user id.
///
/// No credential is checked here: callers are authenticated by the upstream
/// identity provider, and this endpoint trusts the user id it hands over.
/// Anyone able to reach it with a known id gets that user's role.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_id(&state.pool, &input.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                id: input.user_id.clone(),
            })
        })?;

    let jwt = &state.config.jwt;
    let access_token = generate_access_token(&user.id, user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user,
    }))
}
