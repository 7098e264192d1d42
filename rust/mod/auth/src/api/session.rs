use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use brandhub_core::{Claims, ServiceError};

use crate::api::AppState;
use crate::model::{LoginRequest, RefreshRequest, RegisterInput, TokenPair, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

/// POST /auth/register: customer self-registration.
async fn register(
    State(svc): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<User>), ServiceError> {
    let user = svc.register(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(svc): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ServiceError> {
    Ok(Json(svc.login(&body.email, &body.password)?))
}

async fn refresh(
    State(svc): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ServiceError> {
    Ok(Json(svc.refresh_tokens(&body.refresh_token)?))
}

async fn logout(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ServiceError> {
    svc.revoke_session(&claims.sid)?;
    Ok(StatusCode::NO_CONTENT)
}
