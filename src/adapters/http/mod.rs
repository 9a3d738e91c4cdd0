//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter; [`api_router`] assembles
//! them with the real-time channel and the shared middleware stack.

pub mod aptitude;
pub mod error;
pub mod health;
pub mod middleware;
pub mod roadmap;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::adapters::websocket::{websocket_router, LiveSessionState};
use crate::application::{AptitudeEngine, GetRoadmapHandler};
use crate::ports::RoadmapRepository;

pub use aptitude::{aptitude_routes, AptitudeAppState};
pub use error::ErrorResponse;
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use roadmap::{roadmap_routes, RoadmapAppState};

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Full application router.
///
/// ```text
/// GET  /health
/// POST /api/aptitude/start
/// GET  /api/aptitude/:id
/// POST /api/aptitude/:id/respond
/// POST /api/aptitude/:id/complete
/// GET  /api/aptitude/:id/live          (WebSocket)
/// GET  /api/roadmaps/:id
/// POST /api/roadmaps/:id/feedback-update
/// ```
pub fn api_router(
    engine: Arc<AptitudeEngine>,
    roadmaps: Arc<dyn RoadmapRepository>,
    validator: AuthState,
    settings: &HttpSettings,
) -> Router {
    let roadmap_state = RoadmapAppState::new(
        Arc::new(GetRoadmapHandler::new(roadmaps)),
        engine.feedback_applier(),
    );

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/aptitude", aptitude_routes(AptitudeAppState::new(engine.clone())))
        .nest("/api/roadmaps", roadmap_routes(roadmap_state))
        .merge(websocket_router(LiveSessionState::new(engine)))
        .layer(from_fn_with_state(validator, auth_middleware))
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}
