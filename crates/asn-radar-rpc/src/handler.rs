//! JSON-RPC request handlers.

use crate::server::AppState;
use asn_radar_core::{now_ms, AsnLookupService, AsnRadarError, AsnStatsResponse, SettingsUpdate};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}", method);

    match dispatch_method(&state.service, method, &params).await {
        Ok(value) => (StatusCode::OK, Json(JsonRpcResponse::success(id, value))),
        Err(e) => {
            if matches!(e, AsnRadarError::MethodNotFound { .. }) {
                warn!("{}", e);
            } else {
                error!("RPC error for {}: {}", method, e);
            }
            let code = e.to_rpc_error_code();
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, code, e.to_string())),
            )
        }
    }
}

/// ASN parameter as a string. Bare numbers are accepted too.
fn require_asn_param(params: &Value) -> asn_radar_core::Result<String> {
    match params.get("asn") {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AsnRadarError::InvalidParams {
            message: "Missing required parameter: asn".to_string(),
        }),
    }
}

/// Dispatch a method call to the lookup service.
async fn dispatch_method(
    service: &AsnLookupService,
    method: &str,
    params: &Value,
) -> asn_radar_core::Result<Value> {
    match method {
        "health_check" => Ok(json!({"status": "ok"})),

        // Lookups
        "radar_asn_stats" | "RADAR_ASN_STATS" => {
            let asn = require_asn_param(params)?;
            let result = service.lookup(&asn).await;
            Ok(serde_json::to_value(AsnStatsResponse::from_result(
                result,
                now_ms(),
            ))?)
        }

        // Settings
        "get_settings" => Ok(serde_json::to_value(service.settings())?),

        "set_settings" => {
            let update: SettingsUpdate =
                serde_json::from_value(params.clone()).map_err(|e| {
                    AsnRadarError::InvalidParams {
                        message: e.to_string(),
                    }
                })?;
            Ok(serde_json::to_value(service.update_settings(update))?)
        }

        // Diagnostics
        "cache_keys" => Ok(json!({"keys": service.cache().cached_keys()})),

        "clear_cache" => Ok(json!({"cleared": service.cache().clear_cache()})),

        _ => Err(AsnRadarError::MethodNotFound {
            method: method.to_string(),
        }),
    }
}
