use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use brandhub_core::{Claims, ListResult, ServiceError};

use crate::api::{AppState, RecordQuery};
use crate::model::*;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(place))
        .route("/orders/{id}", get(get_one))
        .route("/orders/{id}/advance", post(advance))
        .route("/orders/{id}/cancel", post(cancel))
}

async fn list(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<RecordQuery>,
) -> Result<Json<ListResult<OrderView>>, ServiceError> {
    let (params, filter) = q.split();
    let result = svc.list_orders(&claims, &filter, &params)?;
    Ok(Json(ListResult {
        items: result.items.into_iter().map(OrderView::from).collect(),
        total: result.total,
    }))
}

async fn place(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<PlaceOrder>,
) -> Result<(StatusCode, Json<OrderView>), ServiceError> {
    let order = svc.place_order(&claims, input)?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

async fn get_one(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ServiceError> {
    Ok(Json(svc.get_order(&claims, &id)?.into()))
}

async fn advance(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    input: Option<Json<NoteInput>>,
) -> Result<Json<OrderView>, ServiceError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    Ok(Json(svc.advance_order(&claims, &id, input)?.into()))
}

async fn cancel(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<ReasonInput>,
) -> Result<Json<OrderView>, ServiceError> {
    Ok(Json(svc.cancel_order(&claims, &id, input)?.into()))
}
