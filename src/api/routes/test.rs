//! Diagnostic endpoint: `/api/test`

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::response::ApiResponse;
use crate::api::sanitize::strip_markup;
use crate::api::validation::{string_or_number, FieldRules, Rule, Validate, Validated};
use crate::api::ApiContext;
use crate::error::{AppError, RouteError};
use crate::Result;

pub fn router(_ctx: &ApiContext) -> std::result::Result<Router, RouteError> {
    Ok(Router::new().route("/", get(get_test).post(post_test)))
}

/// Body of `POST /api/test`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPayload {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

impl Validate for TestPayload {
    const RULES: &'static [FieldRules] = &[
        FieldRules {
            field: "name",
            trim: true,
            rules: &[
                Rule::Required("Name is required"),
                Rule::IsString("Name must be a string"),
                Rule::MinLength(2, "Name must be at least 2 characters long"),
            ],
        },
        FieldRules {
            field: "value",
            trim: false,
            rules: &[
                Rule::Required("Value is required"),
                Rule::Numeric("Value must be a number"),
            ],
        },
    ];

    fn sanitize(self) -> std::result::Result<Self, AppError> {
        let name = strip_markup(&self.name).trim().to_string();
        let value = strip_markup(&self.value).trim().to_string();
        tracing::debug!(%name, %value, "Sanitized input");

        if name.is_empty() || value.is_empty() {
            return Err(AppError::bad_request(
                "Sanitized input is empty. Please provide valid data.",
            ));
        }
        Ok(Self { name, value })
    }
}

async fn get_test() -> Json<ApiResponse> {
    Json(ApiResponse::message("audio-device-api backend is working!"))
}

async fn post_test(
    Validated(payload): Validated<TestPayload>,
) -> Result<(StatusCode, Json<ApiResponse<TestPayload>>)> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Data received successfully", payload)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, value: &str) -> TestPayload {
        TestPayload {
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_sanitize_strips_markup() {
        let clean = payload("<b>Bob</b>", "42").sanitize().unwrap();
        assert_eq!(clean, payload("Bob", "42"));
    }

    #[test]
    fn test_sanitize_rejects_pure_markup() {
        let err = payload("<script>x</script>", "42").sanitize().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Sanitized input is empty. Please provide valid data.");
    }
}
