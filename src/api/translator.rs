//! Central error translator
//!
//! The only place an error becomes an HTTP response. Application errors are
//! reported with their own status and message; anything else is logged in
//! full and answered with a generic 500.

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;

use crate::api::response::ApiResponse;
use crate::error::{AppError, Error};

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.as_app_error() {
            Some(app) => {
                if app.is_operational() {
                    tracing::warn!(status = app.status_code().as_u16(), "Request failed: {}", app);
                } else {
                    tracing::error!(status = app.status_code().as_u16(), "Request failed: {}", error_chain(&self));
                }
                let body = ApiResponse::error(app.message()).with_errors(app.details());
                (app.status_code(), Json(body)).into_response()
            }
            None => {
                tracing::error!("Unhandled error: {}", error_chain(&self));
                internal_error()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        Error::from(self).into_response()
    }
}

/// `err: cause: cause...`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(INTERNAL_SERVER_ERROR)),
    )
        .into_response()
}

/// Router fallback for paths no registered endpoint serves
pub async fn not_found(uri: Uri) -> Error {
    tracing::debug!("No route for {}", uri);
    AppError::not_found().into()
}

/// Response mapper giving the router's bare 405s the error envelope.
/// The `Allow` header is kept.
pub async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rendered = AppError::new("Method Not Allowed", StatusCode::METHOD_NOT_ALLOWED).into_response();
    if let Some(allow) = allow {
        rendered.headers_mut().insert(header::ALLOW, allow);
    }
    rendered
}

/// Panic hook for `CatchPanicLayer`
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {}", detail);
    internal_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AudioError, ConfigError, ValidationFailure};
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn render(err: Error) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_app_error_keeps_status_and_message() {
        let (status, body) = render(AppError::new("Gone fishing", StatusCode::SERVICE_UNAVAILABLE).into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({"status": false, "message": "Gone fishing"}));
    }

    #[tokio::test]
    async fn test_validation_error_lists_failures() {
        let failure = ValidationFailure::new("name", "required", "Name is required");
        let (status, body) = render(AppError::validation(vec![failure]).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "name");
    }

    #[tokio::test]
    async fn test_unrecognized_error_is_generic() {
        let (status, body) = render(AudioError::CpalError("ALSA lib pcm.c:2666 secret".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"status": false, "message": INTERNAL_SERVER_ERROR}));
    }

    #[tokio::test]
    async fn test_not_found_and_unauthorized() {
        let (status, body) = render(AppError::not_found().into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Resource not found");

        let (status, _) = render(AppError::unauthorized().into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = ConfigError::Prompt(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed"));
        let chain = error_chain(&err);
        assert!(chain.starts_with("Prompt failed"));
        assert!(chain.ends_with(": stdin closed"));
    }

    #[tokio::test]
    async fn test_bare_method_not_allowed_gets_envelope() {
        let bare = axum::http::Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(header::ALLOW, "GET,HEAD")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = method_not_allowed(bare).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET,HEAD");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": false, "message": "Method Not Allowed"}));

        let ok = (StatusCode::OK, "fine").into_response();
        assert_eq!(method_not_allowed(ok).await.status(), StatusCode::OK);
    }

    #[test]
    fn test_panic_payload_is_not_echoed() {
        let response = handle_panic(Box::new("index out of bounds".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
