//! JWT authentication middleware.
//!
//! Extracts the token from `Authorization: Bearer <token>`, verifies it
//! against the auth service (signature, expiry, token kind, session
//! revocation) and stores the `Claims` in request extensions for handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use auth::service::AuthService;
use brandhub_core::{ServiceError, TokenKind};

/// Exact paths reachable without a token.
const SYSTEM_PUBLIC: &[&str] = &["/health", "/version"];

/// Middleware that requires a valid access token on every non-public path.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("missing authorization token".into()))?;

    let claims = auth.verify_token(token, TokenKind::Access).map_err(|e| {
        debug!(path = %request.uri().path(), error = %e, "token rejected");
        ServiceError::from(e)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Check if a request path is public (no auth required).
pub fn is_public_path(path: &str) -> bool {
    SYSTEM_PUBLIC.contains(&path)
        || auth::api::PUBLIC_PATHS.contains(&path)
        || portal::api::PUBLIC_PREFIXES
            .iter()
            .any(|p| path == *p || path.starts_with(&format!("{}/", p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/auth/login"));
        assert!(is_public_path("/auth/register"));
        assert!(is_public_path("/portal/v1/brands"));
        assert!(is_public_path("/portal/v1/brands/fishman"));

        assert!(!is_public_path("/portal/v1/brandsx"));
        assert!(!is_public_path("/auth/me"));
        assert!(!is_public_path("/auth/logout"));
        assert!(!is_public_path("/portal/v1/orders"));
    }
}
