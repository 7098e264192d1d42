use axum::extract::{Extension, State};
use axum::routing::get;
use axum::{Json, Router};

use brandhub_core::{Claims, ServiceError};

use crate::api::AppState;
use crate::model::{User, UserPatch};

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me).patch(update_me))
}

/// GET /auth/me: the caller's own profile.
async fn me(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(svc.get_user(&claims.sub)?))
}

async fn update_me(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(svc.update_user(&claims, &claims.sub, patch)?))
}
