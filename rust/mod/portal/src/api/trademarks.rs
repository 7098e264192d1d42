use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use brandhub_core::{Claims, ListResult, ServiceError};

use crate::api::{AppState, RecordQuery};
use crate::model::*;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trademarks", get(list).post(create))
        .route("/trademarks/stages", get(stages))
        .route("/trademarks/{id}", get(get_one).patch(update).delete(remove))
        .route("/trademarks/{id}/advance", post(advance))
        .route("/trademarks/{id}/refuse", post(refuse))
}

async fn list(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<RecordQuery>,
) -> Result<Json<ListResult<TrademarkSuggestion>>, ServiceError> {
    let (params, filter) = q.split();
    Ok(Json(svc.list_trademarks(&claims, &filter, &params)?))
}

async fn stages(State(svc): State<AppState>) -> Json<Vec<StageInfo>> {
    Json(svc.trademark_stages())
}

async fn create(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateTrademark>,
) -> Result<(StatusCode, Json<TrademarkSuggestion>), ServiceError> {
    let tm = svc.create_trademark(&claims, input)?;
    Ok((StatusCode::CREATED, Json(tm)))
}

async fn get_one(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<TrademarkSuggestion>, ServiceError> {
    Ok(Json(svc.get_trademark(&claims, &id)?))
}

async fn update(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateTrademark>,
) -> Result<Json<TrademarkSuggestion>, ServiceError> {
    Ok(Json(svc.update_trademark(&claims, &id, patch)?))
}

async fn remove(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_trademark(&claims, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn advance(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    input: Option<Json<AdvanceTrademark>>,
) -> Result<Json<TrademarkSuggestion>, ServiceError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    Ok(Json(svc.advance_trademark(&claims, &id, input)?))
}

async fn refuse(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<ReasonInput>,
) -> Result<Json<TrademarkSuggestion>, ServiceError> {
    Ok(Json(svc.refuse_trademark(&claims, &id, input)?))
}
