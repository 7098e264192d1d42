use axum::extract::{Extension, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use brandhub_core::{Claims, ServiceError, Source};

use crate::api::AppState;
use crate::model::DashboardSummary;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(summary))
}

#[derive(Deserialize)]
struct DashboardQuery {
    source: Option<Source>,
}

async fn summary(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, ServiceError> {
    Ok(Json(svc.dashboard(&claims, q.source)?))
}
