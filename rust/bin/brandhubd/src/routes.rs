//! Route registration: collects all module routes + system endpoints.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use auth::service::AuthService;

use crate::auth_middleware;

/// Multipart framing on top of the largest accepted file.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Build the complete router.
pub fn build_router(
    auth: Arc<AuthService>,
    module_routes: Vec<(&str, Router)>,
    max_upload_bytes: usize,
) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // Mount each module's routes under /{module_name}.
    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    app.layer(middleware::from_fn_with_state(auth, auth_middleware::auth_middleware))
        .layer(DefaultBodyLimit::max(max_upload_bytes + BODY_OVERHEAD))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "brandhubd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use auth::service::AuthConfig;
    use auth::AuthModule;
    use brandhub_blob::FileStore;
    use brandhub_core::Module;
    use brandhub_kv::RedbStore;
    use brandhub_sql::SqliteStore;
    use portal::service::PortalConfig;
    use portal::PortalModule;

    use super::*;

    fn app(dir: &std::path::Path) -> Router {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(RedbStore::open(&dir.join("data.redb")).unwrap());
        let blob = Arc::new(FileStore::open(&dir.join("blobs")).unwrap());
        let auth_module = AuthModule::new(sql.clone(), AuthConfig::default()).unwrap();
        let portal_module = PortalModule::new(sql, kv, blob, PortalConfig::default()).unwrap();
        build_router(
            auth_module.service().clone(),
            vec![
                (auth_module.name(), auth_module.routes()),
                (portal_module.name(), portal_module.routes()),
            ],
            PortalConfig::default().max_upload_bytes,
        )
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn public_and_protected_routes() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _) = send(&app, "GET", "/portal/v1/brands", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/portal/v1/orders", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = send(&app, "GET", "/portal/v1/orders", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_login_and_use_portal() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, _) = send(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({
                "name": "Ravi",
                "email": "ravi@example.com",
                "password": "pharma-5678",
                "source": "veerix",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, tokens) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({"email": "ravi@example.com", "password": "pharma-5678"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let access = tokens["accessToken"].as_str().unwrap().to_string();
        let refresh = tokens["refreshToken"].as_str().unwrap().to_string();

        let (status, req) = send(
            &app,
            "POST",
            "/portal/v1/brand-requests",
            Some(&access),
            Some(serde_json::json!({"molecule": "Pantoprazole", "quantity": 300})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(req["ownerName"], "Ravi");
        assert_eq!(req["source"], "veerix");

        // A refresh token is not an access token.
        let (status, _) = send(&app, "GET", "/portal/v1/brand-requests", Some(&refresh), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "POST", "/auth/logout", Some(&access), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", "/portal/v1/brand-requests", Some(&access), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
