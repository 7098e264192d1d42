use axum::extract::{Extension, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use brandhub_core::{Claims, ListResult, ServiceError};

use crate::api::{AppState, RecordQuery};
use crate::model::*;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/packing-designs", get(list).post(create))
        .route("/packing-designs/{id}", get(get_one).delete(remove))
        .route("/packing-designs/{id}/files", post(upload))
        .route("/packing-designs/{id}/files/{file}", get(download))
        .route("/packing-designs/{id}/advance", post(advance))
        .route("/packing-designs/{id}/request-changes", post(request_changes))
        .route("/packing-designs/{id}/advance-post-print", post(advance_post_print))
}

async fn list(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<RecordQuery>,
) -> Result<Json<ListResult<PackingDesignView>>, ServiceError> {
    let (params, filter) = q.split();
    let result = svc.list_packing_designs(&claims, &filter, &params)?;
    Ok(Json(ListResult {
        items: result.items.into_iter().map(PackingDesignView::from).collect(),
        total: result.total,
    }))
}

async fn create(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreatePackingDesign>,
) -> Result<(StatusCode, Json<PackingDesignView>), ServiceError> {
    let design = svc.create_packing_design(&claims, input)?;
    Ok((StatusCode::CREATED, Json(design.into())))
}

async fn get_one(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<PackingDesignView>, ServiceError> {
    Ok(Json(svc.get_packing_design(&claims, &id)?.into()))
}

async fn remove(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_packing_design(&claims, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Multipart upload; every part named `file` is stored.
async fn upload(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PackingDesignView>), ServiceError> {
    let mut design = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("file").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ServiceError::Validation(e.body_text()))?;
        design = Some(svc.upload_design_file(&claims, &id, &file_name, content_type.as_deref(), &data)?);
    }
    let design = design.ok_or_else(|| ServiceError::Validation("multipart field \"file\" is required".into()))?;
    Ok((StatusCode::CREATED, Json(design.into())))
}

async fn download(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, file)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let (meta, data) = svc.get_design_file(&claims, &id, &file)?;
    let disposition = format!("attachment; filename=\"{}\"", meta.name);
    Ok((
        [
            (header::CONTENT_TYPE, meta.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    ))
}

async fn advance(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    input: Option<Json<NoteInput>>,
) -> Result<Json<PackingDesignView>, ServiceError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    Ok(Json(svc.advance_packing_design(&claims, &id, input)?.into()))
}

async fn request_changes(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<FeedbackInput>,
) -> Result<Json<PackingDesignView>, ServiceError> {
    Ok(Json(svc.request_design_changes(&claims, &id, input)?.into()))
}

async fn advance_post_print(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    input: Option<Json<NoteInput>>,
) -> Result<Json<PackingDesignView>, ServiceError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    Ok(Json(svc.advance_post_print(&claims, &id, input)?.into()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::testing::{call, router_as};
    use crate::service::testing::{admin, customer, fixture};

    fn multipart_body(boundary: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
        body
    }

    #[tokio::test]
    async fn upload_download_and_track() {
        let f = fixture();
        let c = router_as(&f, &customer("c1"));
        let a = router_as(&f, &admin());

        let (status, design) = call(
            c.clone(),
            "POST",
            "/v1/packing-designs",
            Some(json!({"productName": "Painora 650", "brandName": "Painora"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(design["trackingLabel"], "Design Received");
        let id = design["id"].as_str().unwrap().to_string();

        let boundary = "X-BOUNDARY";
        let req = Request::builder()
            .method("POST")
            .uri(format!("/v1/packing-designs/{}/files", id))
            .header("content-type", format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(multipart_body(boundary, "carton front.png", b"\x89PNG")))
            .unwrap();
        let resp = c.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let design: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let key = design["files"][0]["key"].as_str().unwrap();
        assert_eq!(design["files"][0]["name"], "carton_front.png");
        let segment = key.rsplit('/').next().unwrap();

        let req = Request::builder()
            .uri(format!("/v1/packing-designs/{}/files/{}", id, segment))
            .body(Body::empty())
            .unwrap();
        let resp = a.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "image/png");
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"\x89PNG");

        let advance = format!("/v1/packing-designs/{}/advance", id);
        call(a.clone(), "POST", &advance, None).await;
        call(a.clone(), "POST", &advance, None).await;
        let (status, design) = call(c.clone(), "POST", &advance, Some(json!({"note": "looks good"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(design["trackingLabel"], "Approved by Customer");

        let (status, design) = call(a.clone(), "POST", &advance, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(design["postPrintStep"], 0);
        assert_eq!(design["postPrintLabel"], "Printing");

        let (status, _) = call(c, "DELETE", &format!("/v1/packing-designs/{}", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn upload_without_file_part() {
        let f = fixture();
        let c = router_as(&f, &customer("c1"));
        let (_, design) = call(c.clone(), "POST", "/v1/packing-designs", Some(json!({"productName": "X"}))).await;
        let req = Request::builder()
            .method("POST")
            .uri(format!("/v1/packing-designs/{}/files", design["id"].as_str().unwrap()))
            .header("content-type", "multipart/form-data; boundary=B")
            .body(Body::from("--B--\r\n"))
            .unwrap();
        let resp = c.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
