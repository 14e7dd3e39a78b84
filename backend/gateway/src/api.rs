//! Axum REST API handlers.
//!
//! Exposes the parameter codec and process id derivation to clients that
//! cannot link this crate directly.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;
use crate::params::{self, GetResponse, NewProcess, ProcessRecord};
use crate::process_id::{self, EntityKind, EntityRef};

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessIdQuery {
    /// `G…`/`C…` strkey, or a hex ed25519 key / contract hash.
    pub entity: String,
    /// Required only to tell hex keys apart; defaults to `account`.
    pub kind: Option<EntityKind>,
    pub index: u32,
    /// Hex genesis marker, as returned by the registry's `get_genesis`.
    pub genesis: String,
    pub chain_id: u32,
}

/// Body of `POST /params/decode`: the positional tuple or the record
/// `get` returns.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DecodeRequest {
    Positional(GetResponse),
    Record(ProcessRecord),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessIdResponse {
    pub process_id: String,
}

// ─────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────

/// All routes, without middleware layers.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/params/encode", post(encode_params))
        .route("/params/decode", post(decode_params))
        .route("/process-id", get(derive_process_id))
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /params/encode`
///
/// Named creation parameters in, positional `create` arguments out.
pub async fn encode_params(Json(request): Json<NewProcess>) -> Response {
    match params::encode_create_params(&request) {
        Ok(args) => (StatusCode::OK, Json(args)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /params/decode`
///
/// Positional or field-keyed process record in, named view out.
pub async fn decode_params(Json(request): Json<DecodeRequest>) -> Response {
    let decoded = match &request {
        DecodeRequest::Positional(response) => params::decode_get_response(response),
        DecodeRequest::Record(record) => params::decode_process_record(record),
    };
    match decoded {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /process-id?entity=…&index=…&genesis=…&chainId=…[&kind=account|contract]`
pub async fn derive_process_id(Query(query): Query<ProcessIdQuery>) -> Response {
    let derived = EntityRef::parse(&query.entity, query.kind).and_then(|entity| {
        let genesis = process_id::decode_32(&query.genesis, "genesis")?;
        Ok(process_id::process_id(&entity, query.index, &genesis, query.chain_id))
    });

    match derived {
        Ok(id) => (
            StatusCode::OK,
            Json(ProcessIdResponse {
                process_id: hex::encode(id),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: GatewayError) -> Response {
    let status = match e {
        GatewayError::InvalidParams(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}
