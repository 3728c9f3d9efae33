use std::sync::atomic::Ordering;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;

use super::context::SharedContext;
use super::handler::ingest;

pub fn router(ctx: SharedContext) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(hello))
        .route("/sensor-data", post(sensor_data))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

async fn root() -> &'static str {
    "Main"
}

async fn hello() -> Json<Value> {
    log::info!("Test endpoint called");
    Json(json!({ "message": "Hello, world!" }))
}

async fn sensor_data(
    State(ctx): State<SharedContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match parse_payload(&headers, &body) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Rejecting sensor data with malformed JSON: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid JSON body").into_response();
        }
    };
    log::debug!("Received sensor data: {}", payload);

    match ingest(&ctx, &payload).await {
        Ok(()) => {
            let saved = ctx.saved_count.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Saved {} reading(s) since last failure", saved);
            Json(json!({ "message": "Data saved!" })).into_response()
        }
        Err(e) => {
            log::error!("Unable to save data: {}", e);
            ctx.saved_count.store(0, Ordering::Relaxed);
            (StatusCode::INTERNAL_SERVER_ERROR, "Unable to save data").into_response()
        }
    }
}

/// Bodies without a JSON content type, or empty bodies, count as an empty mapping
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Result<Value, serde_json::Error> {
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
