use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::admission::AdmissionGate;
use crate::signature::compute_signature;
use crate::types::{DeviceQueryResponse, DeviceRecord, DeviceStatus, ErrorBody};

pub struct ServiceState {
    pub shared_secret: String,
    pub max_batch_size: usize,
    pub gate: AdmissionGate,
}

/// Builds the mock query service.
///
/// Middleware order is load-bearing: the admission gate runs before
/// signature validation, which runs before payload-shape validation in
/// the handler. A rate-limited request is rejected without ever touching
/// its signature.
pub fn app(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/device/real/query", post(query_devices))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            validate_signature,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), admit_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn admit_request(
    State(state): State<Arc<ServiceState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.gate.try_admit(Instant::now()) {
        debug!("Request rejected by admission gate");
        return reject(
            StatusCode::TOO_MANY_REQUESTS,
            "Too Many Requests. Limit: 1 req/sec.",
        );
    }
    next.run(request).await
}

async fn validate_signature(
    State(state): State<Arc<ServiceState>>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let signature = headers.get("signature").and_then(|v| v.to_str().ok());
    let timestamp = headers.get("timestamp").and_then(|v| v.to_str().ok());

    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "Missing signature or timestamp header",
        );
    };

    let expected = compute_signature(request.uri().path(), &state.shared_secret, timestamp);
    // Exact match only. Prefix or case-insensitive comparisons would
    // accept digests the client never computed.
    if signature != expected {
        return reject(StatusCode::UNAUTHORIZED, "Invalid Signature");
    }

    next.run(request).await
}

async fn query_devices(
    State(state): State<Arc<ServiceState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let Some(sn_list) = body.get("sn_list").and_then(|v| v.as_array()) else {
        return reject(StatusCode::BAD_REQUEST, "sn_list must be an array");
    };
    if sn_list.len() > state.max_batch_size {
        return reject(
            StatusCode::BAD_REQUEST,
            &format!("Batch size exceeded (Max {})", state.max_batch_size),
        );
    }

    let data: Vec<DeviceRecord> = sn_list
        .iter()
        .map(|sn| synthesize_record(sn.as_str().unwrap_or_default()))
        .collect();

    Json(DeviceQueryResponse { data }).into_response()
}

/// Fabricates one reading per serial. Values are random; only the shape
/// of the response is contractual.
fn synthesize_record(sn: &str) -> DeviceRecord {
    let power = rand::random::<f64>() * 5.0;
    let status = if rand::random::<f64>() > 0.1 {
        DeviceStatus::Online
    } else {
        DeviceStatus::Offline
    };
    DeviceRecord {
        sn: sn.to_string(),
        power: format!("{power:.2} kW"),
        status,
        last_updated: Utc::now(),
    }
}

fn reject(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
