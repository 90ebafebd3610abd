//! # hub-api
//!
//! HTTP surface for content-hub search: the advanced search endpoint, a
//! health check, and the OpenAPI document.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use hub_db::Database;
use hub_search::AdvancedSearchEngine;

pub use error::ApiError;

/// Request bodies are not used by any route.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Content Hub Search API",
        description = "Access-controlled advanced search over community content"
    ),
    paths(
        handlers::search::advanced_search,
        handlers::health::health_check,
    ),
    components(schemas(
        handlers::search::AdvancedSearchResponse,
        handlers::health::HealthResponse,
        hub_search::SearchResults,
        hub_search::SearchResultItem,
        hub_search::AuthorItem,
        hub_core::ContentType,
        hub_core::Visibility,
        error::ErrorResponse,
        error::ErrorBody,
        error::ErrorDetails,
    )),
    tags(
        (name = "Search", description = "Advanced content search"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AdvancedSearchEngine>,
    /// Used for health probes. Absent when running without a database.
    pub db: Option<Database>,
}

impl AppState {
    pub fn new(engine: AdvancedSearchEngine, db: Option<Database>) -> Self {
        Self {
            engine: Arc::new(engine),
            db,
        }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router. CORS is layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .route(
            "/api/v1/search/advanced",
            get(handlers::search::advanced_search),
        )
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
