use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    http::HeaderMap,
    routing::post,
};

use crate::{
    dto::admin::{
        ActionResponse, BulkUploadRequest, BulkUploadResponse, InitDatabaseRequest, LoginRequest,
        LoginResponse, QuestionsRequest, QuestionsResponse,
    },
    error::AppError,
    services::admin_service,
    state::SharedState,
};

/// Resolve the client address used as the rate-limit identifier.
///
/// Behind a reverse proxy the socket peer is the proxy itself, so the
/// first `x-forwarded-for` entry wins when present.
fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Key accepted", body = LoginResponse),
        (status = 401, description = "Invalid admin key"),
        (status = 429, description = "Too many attempts"),
    )
)]
/// Verify the admin key and mint a dashboard token.
pub async fn login(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let ip = client_ip(&headers, &addr);
    Ok(Json(admin_service::login(&state, &ip, request).await?))
}

#[utoipa::path(
    post,
    path = "/admin/questions",
    tag = "admin",
    request_body = QuestionsRequest,
    responses(
        (status = 200, description = "Action applied", body = QuestionsResponse),
        (status = 401, description = "Invalid admin key"),
        (status = 429, description = "Too many requests"),
    )
)]
/// Inspect or mutate the question pool.
pub async fn questions(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let ip = client_ip(&headers, &addr);
    Ok(Json(admin_service::questions(&state, &ip, request).await?))
}

#[utoipa::path(
    post,
    path = "/admin/bulk-upload",
    tag = "admin",
    request_body = BulkUploadRequest,
    responses(
        (status = 200, description = "Batch merged", body = BulkUploadResponse),
        (status = 400, description = "Invalid batch"),
        (status = 401, description = "Invalid admin key"),
        (status = 429, description = "Too many uploads"),
    )
)]
/// Merge a batch of questions into the pool.
pub async fn bulk_upload(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<BulkUploadRequest>,
) -> Result<Json<BulkUploadResponse>, AppError> {
    let ip = client_ip(&headers, &addr);
    Ok(Json(
        admin_service::bulk_upload(&state, &ip, request).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/admin/init-database",
    tag = "admin",
    request_body = InitDatabaseRequest,
    responses(
        (status = 200, description = "Schema initialized", body = ActionResponse),
        (status = 401, description = "Invalid admin key"),
        (status = 503, description = "Backend unreachable"),
    )
)]
/// Initialize the active backend's schema.
pub async fn init_database(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<InitDatabaseRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let ip = client_ip(&headers, &addr);
    Ok(Json(
        admin_service::init_database(&state, &ip, &request.admin_key).await?,
    ))
}

/// Configure the admin routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/admin/login", post(login))
        .route("/admin/questions", post(questions))
        .route("/admin/bulk-upload", post(bulk_upload))
        .route("/admin/init-database", post(init_database))
}
