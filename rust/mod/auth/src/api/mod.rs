mod me;
mod session;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the auth API router.
///
/// Routes are relative; the binary nests them under `/auth` and runs the
/// JWT middleware in front of everything except the public entry points.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .merge(session::routes())
        .merge(me::routes())
        .merge(users::routes())
        .with_state(svc)
}

/// Paths under `/auth` reachable without a token.
pub const PUBLIC_PATHS: &[&str] = &["/auth/register", "/auth/login", "/auth/refresh"];
