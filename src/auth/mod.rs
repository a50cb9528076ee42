//! Session authentication module.
//!
//! Sessions are delegated to an external identity provider: the provider
//! mints a token of the form `<user_id>.<hex hmac-sha256 signature>` using a
//! secret shared with this backend. The middleware verifies the signature
//! (constant-time) and injects the resolved [`AuthUser`] into the request.
//!
//! Without a configured secret the server runs in dev mode and trusts a plain
//! `x-user-id` header. Either way, a request that yields no user identifier
//! is rejected with 401.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header carrying the signed session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Dev-mode header carrying a raw user id.
pub const USER_ID_HEADER: &str = "x-user-id";

type HmacSha256 = Hmac<Sha256>;

/// An authenticated caller, resolved by the session middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

/// Session authentication layer function that takes the shared secret as a
/// parameter.
pub async fn session_auth_layer(
    secret: Option<String>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_user(secret.as_deref(), request.headers()) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => unauthorized_response("Missing or invalid session"),
    }
}

/// Resolve the calling user from request headers, if the session is valid.
fn resolve_user(secret: Option<&str>, headers: &HeaderMap) -> Option<AuthUser> {
    let Some(secret) = secret else {
        // Dev mode: trust the raw user-id header
        let id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        return Some(AuthUser { id: id.to_string() });
    };

    // Session header first, then Authorization bearer token
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })?;

    verify_session_token(secret, token).map(|id| AuthUser { id })
}

/// Mint a session token for a user. This mirrors what the identity provider
/// does on its side of the shared secret; the backend only needs it for tests
/// and local tooling.
pub fn mint_session_token(secret: &str, user_id: &str) -> String {
    format!("{}.{}", user_id, sign(secret, user_id))
}

/// Verify a session token, returning the embedded user id on success.
pub fn verify_session_token(secret: &str, token: &str) -> Option<String> {
    let (user_id, signature) = token.rsplit_once('.')?;
    if user_id.is_empty() {
        return None;
    }

    let expected = sign(secret, user_id);
    if constant_time_compare(signature, &expected) {
        Some(user_id.to_string())
    } else {
        None
    }
}

/// HMAC-SHA256 over the user id, hex-encoded.
fn sign(secret: &str, user_id: &str) -> String {
    // HMAC accepts keys of any length, so this cannot fail
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(user_id.as_bytes());
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
