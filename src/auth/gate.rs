use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use super::{
    cookie::session_token,
    token::{AuthUser, TokenCodec},
};
use crate::{error::AppError, AppState};

/// Resolves the caller from the session token.
///
/// A missing cookie and an invalid, expired or forged token all produce the
/// same `Unauthorized` error.
pub fn authenticate(token: Option<&str>, codec: &TokenCodec) -> Result<AuthUser, AppError> {
    let token = token.ok_or(AppError::Unauthorized)?;
    codec.verify(token).map_err(|_| AppError::Unauthorized)
}

/// Axum middleware guarding protected routes. On success the resolved
/// [`AuthUser`] is available to handlers as `Extension<AuthUser>`.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(session_token(&cookies).as_deref(), &state.tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(path = %request.uri().path(), "rejected unauthenticated request");
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn no_token_is_rejected() {
        let codec = TokenCodec::new("gate-secret");
        let err = authenticate(None, &codec).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new("gate-secret");
        let token = codec
            .issue_at("u1", "u1@x.com", Utc::now() - Duration::days(8))
            .unwrap();
        let err = authenticate(Some(token.as_str()), &codec).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn fresh_token_is_accepted() {
        let codec = TokenCodec::new("gate-secret");
        let token = codec.issue("u1", "u1@x.com").unwrap();
        let user = authenticate(Some(token.as_str()), &codec).unwrap();
        assert_eq!(user.user_id, "u1");
    }
}
