use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use brandhub_core::{Claims, ServiceError};

use crate::api::AppState;
use crate::model::Badges;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(badges))
        .route("/notifications/seen", post(mark_all_seen))
        .route("/notifications/{section}/seen", post(mark_seen))
}

async fn badges(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Badges>, ServiceError> {
    Ok(Json(svc.badges(&claims)?))
}

async fn mark_seen(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(section): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.mark_seen(&claims, &section)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_seen(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ServiceError> {
    svc.mark_all_seen(&claims)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::testing::{call, router_as};
    use crate::service::testing::{admin, customer, fixture};

    #[tokio::test]
    async fn badges_flow() {
        let f = fixture();
        let c = router_as(&f, &customer("c1"));
        let a = router_as(&f, &admin());
        call(c.clone(), "POST", "/v1/trademarks", Some(json!({"names": ["Coldex"]}))).await;

        let (status, b) = call(a.clone(), "GET", "/v1/notifications", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(b["sections"]["trademarks"], 1);
        assert_eq!(b["total"], 1);

        let (status, _) = call(a.clone(), "POST", "/v1/notifications/trademarks/seen", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, b) = call(a.clone(), "GET", "/v1/notifications", None).await;
        assert_eq!(b["total"], 0);

        let (status, err) = call(a.clone(), "POST", "/v1/notifications/inbox/seen", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "VALIDATION_FAILED");

        let (status, _) = call(a, "POST", "/v1/notifications/seen", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
