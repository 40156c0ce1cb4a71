//! Playback device endpoints: `/api/audio/v1`

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::ApiResponse;
use crate::api::validation::{lenient_integer, FieldRules, Rule, Validate, Validated};
use crate::api::ApiContext;
use crate::audio::{AudioBackend, Device, DeviceSelector};
use crate::error::{AudioError, RouteError};
use crate::Result;

type Backend = Arc<dyn AudioBackend>;

pub fn router(ctx: &ApiContext) -> std::result::Result<Router, RouteError> {
    let backend = ctx
        .audio()
        .cloned()
        .ok_or_else(|| RouteError::Unavailable("audio backend is not available".into()))?;

    Ok(Router::new()
        .route("/list", get(list_devices))
        .route("/default", get(get_default_device))
        .route("/set", post(set_default_device))
        .route("/set-by-id", post(set_default_device_by_id))
        .with_state(backend))
}

/// Run a backend call off the async workers
async fn blocking<T, F>(backend: Backend, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn AudioBackend) -> std::result::Result<T, AudioError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || call(backend.as_ref())).await??)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceRequest {
    #[serde(deserialize_with = "lenient_integer")]
    pub device_index: u32,
}

impl Validate for SetDeviceRequest {
    const RULES: &'static [FieldRules] = &[FieldRules {
        field: "deviceIndex",
        trim: false,
        rules: &[
            Rule::Required("Device index is required"),
            Rule::IntMin(0, "Device index must be a positive integer"),
            Rule::IntMax(u32::MAX as i64, "Device index is out of range"),
        ],
    }];
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceByIdRequest {
    pub device_id: String,
}

impl Validate for SetDeviceByIdRequest {
    const RULES: &'static [FieldRules] = &[FieldRules {
        field: "deviceId",
        trim: true,
        rules: &[
            Rule::Required("Device ID is required"),
            Rule::IsString("Device ID must be a string"),
        ],
    }];
}

#[derive(Debug, Serialize)]
pub struct SelectedIndex {
    #[serde(rename = "Index")]
    pub index: u32,
}

#[derive(Debug, Serialize)]
pub struct SelectedId {
    #[serde(rename = "ID")]
    pub id: String,
}

async fn list_devices(State(backend): State<Backend>) -> Result<Json<ApiResponse<Vec<Device>>>> {
    let devices = blocking(backend, |audio| audio.list_devices()).await?;
    Ok(Json(ApiResponse::ok("Audio devices retrieved successfully", devices)))
}

async fn get_default_device(State(backend): State<Backend>) -> Result<Json<ApiResponse<Device>>> {
    let device = blocking(backend, |audio| audio.default_device()).await?;
    Ok(Json(ApiResponse::ok("Default playback device retrieved", device)))
}

async fn set_default_device(
    State(backend): State<Backend>,
    Validated(req): Validated<SetDeviceRequest>,
) -> Result<Json<ApiResponse<SelectedIndex>>> {
    let index = req.device_index;
    blocking(backend, move |audio| audio.set_device(&DeviceSelector::Index(index))).await?;
    Ok(Json(ApiResponse::ok(
        "Default playback device set successfully",
        SelectedIndex { index },
    )))
}

async fn set_default_device_by_id(
    State(backend): State<Backend>,
    Validated(req): Validated<SetDeviceByIdRequest>,
) -> Result<Json<ApiResponse<SelectedId>>> {
    let selector = DeviceSelector::Id(req.device_id.clone());
    blocking(backend, move |audio| audio.set_device(&selector)).await?;
    Ok(Json(ApiResponse::ok(
        "Default playback device set successfully",
        SelectedId { id: req.device_id },
    )))
}
