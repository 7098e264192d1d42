use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use brandhub_core::{Claims, ListResult, ServiceError};

use crate::api::{AppState, RecordQuery};
use crate::model::*;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/brand-requests", get(list).post(create))
        .route("/brand-requests/{id}", get(get_one).patch(update).delete(remove))
        .route("/brand-requests/{id}/approve", post(approve))
        .route("/brand-requests/{id}/request-payment", post(request_payment))
        .route("/brand-requests/{id}/mark-paid", post(mark_paid))
        .route("/brand-requests/{id}/reject", post(reject))
}

async fn list(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<RecordQuery>,
) -> Result<Json<ListResult<BrandRequest>>, ServiceError> {
    let (params, filter) = q.split();
    Ok(Json(svc.list_brand_requests(&claims, &filter, &params)?))
}

async fn create(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<BrandRequest>), ServiceError> {
    let req = svc.create_brand_request(&claims, input)?;
    Ok((StatusCode::CREATED, Json(req)))
}

async fn get_one(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<BrandRequest>, ServiceError> {
    Ok(Json(svc.get_brand_request(&claims, &id)?))
}

async fn update(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateBrandRequest>,
) -> Result<Json<BrandRequest>, ServiceError> {
    Ok(Json(svc.update_brand_request(&claims, &id, patch)?))
}

async fn remove(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_brand_request(&claims, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<BrandRequest>, ServiceError> {
    Ok(Json(svc.approve_brand_request(&claims, &id, input)?))
}

async fn request_payment(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    input: Option<Json<NoteInput>>,
) -> Result<Json<BrandRequest>, ServiceError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    Ok(Json(svc.request_payment(&claims, &id, input)?))
}

async fn mark_paid(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    input: Option<Json<MarkPaidInput>>,
) -> Result<Json<BrandRequest>, ServiceError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    Ok(Json(svc.mark_paid(&claims, &id, input)?))
}

async fn reject(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<ReasonInput>,
) -> Result<Json<BrandRequest>, ServiceError> {
    Ok(Json(svc.reject_brand_request(&claims, &id, input)?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::testing::{call, router_as};
    use crate::service::testing::{admin, customer, fixture};

    #[tokio::test]
    async fn lifecycle_over_http() {
        let f = fixture();
        let c = router_as(&f, &customer("c1"));
        let a = router_as(&f, &admin());

        let (status, req) = call(
            c.clone(),
            "POST",
            "/v1/brand-requests",
            Some(json!({"molecule": "Paracetamol", "strength": "650 mg", "quantity": 2000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(req["status"], "PENDING");
        assert_eq!(req["ownerId"], "c1");
        let id = req["id"].as_str().unwrap().to_string();

        let (status, err) = call(
            c.clone(),
            "POST",
            &format!("/v1/brand-requests/{}/approve", id),
            Some(json!({"quotedPrice": 4.5})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(err["code"], "PERMISSION_DENIED");

        let (status, req) = call(
            a.clone(),
            "POST",
            &format!("/v1/brand-requests/{}/approve", id),
            Some(json!({"quotedPrice": 4.5, "currency": "usd"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(req["currency"], "USD");

        // No body is fine for actions with only an optional note.
        let (status, req) = call(a.clone(), "POST", &format!("/v1/brand-requests/{}/request-payment", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(req["status"], "REQUESTED_PAYMENT");

        let (status, err) = call(
            a.clone(),
            "POST",
            &format!("/v1/brand-requests/{}/reject", id),
            Some(json!({"reason": "too late"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["code"], "INVALID_TRANSITION");

        let (status, list) = call(c.clone(), "GET", "/v1/brand-requests?status=REQUESTED_PAYMENT&limit=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["total"], 1);
        assert_eq!(list["items"][0]["history"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_and_not_found() {
        let f = fixture();
        let c = router_as(&f, &customer("c1"));
        let (_, req) = call(
            c.clone(),
            "POST",
            "/v1/brand-requests",
            Some(json!({"molecule": "Azithromycin", "quantity": 10})),
        )
        .await;
        let uri = format!("/v1/brand-requests/{}", req["id"].as_str().unwrap());

        let (status, _) = call(router_as(&f, &customer("c2")), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(c.clone(), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(c, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
