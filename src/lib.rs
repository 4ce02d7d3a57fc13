pub mod config;
pub mod extract;
pub mod middleware;
pub mod modules;
pub mod services;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::auth::interface::UserStore;
use modules::auth::schema::ErrorResponse;
use modules::auth::auth_routes;
use modules::property::interface::PropertyStore;
use modules::property::property_routes;
use services::jwt::JwtService;
use services::mail::Mailer;
use services::security::security_headers;
use services::uploads::ImageUploader;

pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub properties: Arc<dyn PropertyStore>,
    pub jwt_service: JwtService,
    pub mailer: Arc<dyn Mailer>,
    pub uploader: Arc<dyn ImageUploader>,
    pub frontend_url: String,
}

pub async fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/property", property_routes(state.clone()))
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 1024 * 10)) // 10MB max body, images included
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct BannerResponse {
    success: bool,
    message: &'static str,
}

async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        success: true,
        message: "Torii Gate Server",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("ROUTE NOT FOUND")),
    )
}
