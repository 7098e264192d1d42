use axum::extract::{Extension, Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use brandhub_core::{Claims, ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{User, UserFilters, UserPatch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).patch(update_user))
}

// Spelled out instead of `#[serde(flatten)]`: flattened query strings lose
// their numeric types.
#[derive(Deserialize)]
struct UserQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    q: Option<String>,
    role: Option<brandhub_core::Role>,
    source: Option<brandhub_core::Source>,
}

impl UserQuery {
    fn split(self) -> (ListParams, UserFilters) {
        let defaults = ListParams::default();
        let params = ListParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(0),
            q: self.q,
        };
        (params, UserFilters { role: self.role, source: self.source })
    }
}

async fn list_users(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<UserQuery>,
) -> Result<Json<ListResult<User>>, ServiceError> {
    claims.require_admin()?;
    let (params, filters) = q.split();
    Ok(Json(svc.list_users(&params, &filters)?))
}

async fn get_user(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<User>, ServiceError> {
    if !claims.can_access(&id) {
        return Err(ServiceError::NotFound(format!("users/{}", id)));
    }
    Ok(Json(svc.get_user(&id)?))
}

async fn update_user(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ServiceError> {
    claims.require_admin()?;
    Ok(Json(svc.update_user(&claims, &id, patch)?))
}
