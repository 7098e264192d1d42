use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use brandhub_core::ServiceError;

use crate::api::AppState;
use crate::model::BrandProfile;

/// Public: the client picks its theme before anyone logs in.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list))
        .route("/brands/{source}", get(get_one))
}

async fn list(State(svc): State<AppState>) -> Json<Vec<BrandProfile>> {
    Json(svc.brands())
}

async fn get_one(
    State(svc): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<BrandProfile>, ServiceError> {
    Ok(Json(svc.brand(&source)?))
}
