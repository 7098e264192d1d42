mod brand_requests;
mod brands;
mod dashboard;
mod notifications;
mod orders;
mod packing_designs;
mod trademarks;

use std::sync::Arc;

use axum::Router;
use serde::Deserialize;

use brandhub_core::{ListParams, Source};

use crate::service::{PortalService, RecordFilter};

/// Shared application state.
pub type AppState = Arc<PortalService>;

/// Build the portal API router.
///
/// Everything lives under `/v1`; the binary nests the result under
/// `/portal`.
pub fn build_router(svc: Arc<PortalService>) -> Router {
    let v1 = Router::new()
        .merge(brand_requests::routes())
        .merge(trademarks::routes())
        .merge(packing_designs::routes())
        .merge(orders::routes())
        .merge(notifications::routes())
        .merge(dashboard::routes())
        .merge(brands::routes());
    Router::new().nest("/v1", v1).with_state(svc)
}

/// Path prefixes under `/portal` reachable without a token.
pub const PUBLIC_PREFIXES: &[&str] = &["/portal/v1/brands"];

/// Query string accepted by every collection list.
///
/// Spelled out instead of flattening `ListParams`: flattened query strings
/// lose their numeric types.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    q: Option<String>,
    status: Option<String>,
    source: Option<Source>,
    owner_id: Option<String>,
}

impl RecordQuery {
    pub(crate) fn split(self) -> (ListParams, RecordFilter) {
        let defaults = ListParams::default();
        let params = ListParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(0),
            q: self.q,
        };
        let filter = RecordFilter {
            status: self.status,
            source: self.source,
            owner_id: self.owner_id,
        };
        (params, filter)
    }
}

/// Test helpers shared by the route tests.
#[cfg(test)]
pub(crate) mod testing {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::{Extension, Router};
    use tower::ServiceExt;

    use brandhub_core::Claims;

    use super::build_router;
    use crate::service::testing::Fixture;

    /// The portal router as `claims` sees it. The binary's middleware
    /// inserts the claims; here a layer does.
    pub fn router_as(f: &Fixture, claims: &Claims) -> Router {
        build_router(f.svc.clone()).layer(Extension(claims.clone()))
    }

    pub async fn call(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
            None => Body::empty(),
        };
        let resp = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null));
        (status, json)
    }
}
