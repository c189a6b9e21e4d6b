use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::constants::*;
use crate::database::{Db, is_unique_violation};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::models::{LoginPayload, MessageResponse, RegisterPayload, TokenResponse, User};
use crate::state::AppState;
use crate::utils::{validate_password, validate_username};

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal("failed to hash password", e))
}

pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| ApiError::internal("stored password hash is invalid", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Inserts a new user. A taken username surfaces as [`ApiError::UserExists`]
/// through the UNIQUE constraint rather than a separate lookup.
pub async fn create_user(db: &Db, username: &str, password: &str) -> ApiResult<User> {
    let hash = hash_password(password)?;
    let id = Uuid::new_v4().to_string();
    let conn = db.write().await;

    conn.execute(
        "INSERT INTO users (id, username, password) VALUES (?, ?, ?)",
        (id.as_str(), username, hash.as_str()),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::UserExists
        } else {
            ApiError::storage(StatusCode::BAD_REQUEST, "registering user", e)
        }
    })?;

    Ok(User {
        id,
        username: username.to_string(),
        password_hash: hash,
    })
}

pub async fn get_user_by_username(db: &Db, username: &str) -> ApiResult<Option<User>> {
    let conn = db.read().await;
    let lookup_failed = |e: libsql::Error| ApiError::internal("failed to look up user", e);

    let mut rows = conn
        .query(
            "SELECT id, username, password FROM users WHERE username = ?",
            [username],
        )
        .await
        .map_err(lookup_failed)?;

    if let Some(row) = rows.next().await.map_err(lookup_failed)? {
        let id: String = row.get(0).map_err(lookup_failed)?;
        let username: String = row.get(1).map_err(lookup_failed)?;
        let password_hash: String = row.get(2).map_err(lookup_failed)?;
        Ok(Some(User {
            id,
            username,
            password_hash,
        }))
    } else {
        Ok(None)
    }
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;

    let user = create_user(&state.db, &payload.username, &payload.password).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(MSG_USER_REGISTERED)),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password cannot be empty"));
    }

    let user = get_user_by_username(&state.db, &payload.username)
        .await?
        .ok_or(ApiError::InvalidUser)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "login rejected: wrong password");
        return Err(ApiError::InvalidPassword);
    }

    let token = state
        .tokens
        .sign(&user.id)
        .map_err(|e| ApiError::internal("failed to sign token", e))?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
