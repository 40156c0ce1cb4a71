//! HTTP API

pub mod registry;
pub mod response;
pub mod routes;
pub mod sanitize;
pub mod server;
pub mod translator;
pub mod validation;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::audio::AudioBackend;
use crate::constants::MAX_BODY_BYTES;

pub use registry::{RegistryReport, RouteEntry, ROUTES};
pub use response::ApiResponse;
pub use server::WebServer;

/// Dependencies handed to route registration, fixed once the server starts
#[derive(Clone, Default)]
pub struct ApiContext {
    audio: Option<Arc<dyn AudioBackend>>,
}

impl ApiContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, backend: Arc<dyn AudioBackend>) -> Self {
        self.audio = Some(backend);
        self
    }

    pub fn audio(&self) -> Option<&Arc<dyn AudioBackend>> {
        self.audio.as_ref()
    }
}

/// Mount `entries` and wrap them in the global middleware stack.
///
/// Outermost first: CORS, access log, panic catcher, 405 envelope, body
/// limit, routes. Unknown paths go to the translator as not-found errors.
pub fn build_app(ctx: &ApiContext, entries: &[RouteEntry]) -> (Router, RegistryReport) {
    let (router, report) = registry::mount(Router::new(), entries, ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router
        .fallback(translator::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::map_response(translator::method_not_allowed))
        .layer(CatchPanicLayer::custom(translator::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    (app, report)
}
