use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_cookies::Cookies;

use crate::{
    auth::{
        authenticate,
        cookie::{clear_cookie, session_cookie, session_token},
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::AppError,
    models::user::{AuthResponse, CreateUser, LoginPayload, User},
    response::ApiResponse,
    validation::ValidatedJson,
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> Result<Response, AppError> {
    let email = normalize_email(&payload.email);

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password_blocking(payload.password).await?;
    let user = state
        .store
        .create_user(payload.name.trim(), &email, &password_hash)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "User already exists"))?;

    tracing::info!(user_id = %user.id, "user registered");
    signed_in(&state, &cookies, StatusCode::CREATED, "User registered successfully", user)
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<Response, AppError> {
    let user = state
        .store
        .find_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await {
        return Err(AppError::InvalidCredentials);
    }

    signed_in(&state, &cookies, StatusCode::OK, "Login successful", user)
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> ApiResponse<()> {
    cookies.add(clear_cookie(state.config.secure_cookies()));
    ApiResponse::message("Logout successful")
}

/// Fresh profile for the cookie's identity; a user deleted since the token
/// was issued counts as unauthenticated.
pub async fn me(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let identity = authenticate(session_token(&cookies).as_deref(), &state.tokens)?;
    let user = state
        .store
        .find_user_by_id(&identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(ApiResponse::ok(AuthResponse { user }))
}

fn signed_in(
    state: &AppState,
    cookies: &Cookies,
    status: StatusCode,
    message: &str,
    user: User,
) -> Result<Response, AppError> {
    let token = state.tokens.issue(&user.id, &user.email)?;
    cookies.add(session_cookie(token, state.config.secure_cookies()));
    Ok((
        status,
        Json(ApiResponse::with_message(message, AuthResponse { user })),
    )
        .into_response())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
