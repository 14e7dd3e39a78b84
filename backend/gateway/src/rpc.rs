//! Soroban RPC client — polls `getEvents` and decodes registry events.
//!
//! ## Resilience
//!
//! * Transport failures, HTTP 429 and soft JSON-RPC errors are retried with
//!   exponential back-off, from [`INITIAL_BACKOFF_SECS`] up to
//!   [`MAX_BACKOFF_SECS`].
//! * Invalid-request / unknown-method errors are returned immediately.
//! * Every wait honours the caller's [`CancellationToken`].

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{GatewayError, Result};
use crate::events::{EventKind, RegistryEvent};
use crate::params::ProcessStatus;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC codes that will not go away on retry.
const HARD_ERROR_CODES: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<EventsPage>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// One page of `getEvents` results.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Topic list, one JSON-encoded `{"type":…,"value":…}` entry per topic
    pub topic: Vec<String>,
    /// Event data
    pub value: Value,
    pub contract_id: Option<String>,
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    pub ledger_closed_at: Option<String>,
    pub in_successful_contract_call: Option<bool>,
}

/// Where to read the next page from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStart {
    Ledger(u32),
    Cursor(String),
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch one page of registry events, retrying transient failures.
///
/// Returns `Ok(None)` if `cancel` fired while waiting.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start: &PageStart,
    limit: u32,
    cancel: &CancellationToken,
) -> Result<Option<EventsPage>> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start, limit),
    });
    let mut backoff = Backoff::new();

    loop {
        let reason = match client.post(rpc_url).json(&body).send().await {
            Err(e) => format!("request failed: {e}"),
            Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                "rate-limited".to_string()
            }
            Ok(resp) => {
                let reply: RpcResponse = resp.json().await?;
                match (reply.result, reply.error) {
                    (_, Some(err)) if HARD_ERROR_CODES.contains(&err.code) => {
                        return Err(GatewayError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    (_, Some(err)) => format!("soft error {} {}", err.code, err.message),
                    (Some(page), None) => {
                        debug!(
                            "Fetched {} events (latest_ledger={:?})",
                            page.events.len(),
                            page.latest_ledger
                        );
                        return Ok(Some(page));
                    }
                    (None, None) => {
                        return Err(GatewayError::EventParse(
                            "Empty result from getEvents".to_string(),
                        ))
                    }
                }
            }
        };

        let wait = backoff.next_delay();
        warn!("RPC {reason} (will retry in {}s)", wait.as_secs());
        tokio::select! {
            _ = cancel.cancelled() => return Ok(None),
            _ = tokio::time::sleep(wait) => {}
        }
    }
}

fn build_params(contract_id: &str, start: &PageStart, limit: u32) -> Value {
    let mut params = json!({
        "filters": [{ "type": "contract", "contractIds": [contract_id] }],
        "pagination": { "limit": limit },
    });
    match start {
        PageStart::Cursor(cursor) => params["pagination"]["cursor"] = json!(cursor),
        PageStart::Ledger(ledger) => params["startLedger"] = json!(ledger),
    }
    params
}

/// Doubling delay capped at [`MAX_BACKOFF_SECS`].
#[derive(Debug)]
struct Backoff {
    current: u64,
}

impl Backoff {
    fn new() -> Self {
        Backoff {
            current: INITIAL_BACKOFF_SECS,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.current);
        self.current = (self.current * 2).min(MAX_BACKOFF_SECS);
        delay
    }
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events into [`RegistryEvent`]s.
///
/// Events from failed contract calls are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<RegistryEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<RegistryEvent> {
    let kind = EventKind::from_topic(&topic_value(raw.topic.first()?));

    let process_id = if kind.is_process_event() {
        raw.topic.get(1).map(|t| topic_value(t))
    } else {
        None
    };
    let (actor, detail) = decode_data(&raw.value, kind);

    Some(RegistryEvent {
        event_type: kind.as_str().to_string(),
        process_id,
        actor,
        detail,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp: raw
            .ledger_closed_at
            .as_deref()
            .and_then(parse_iso_to_unix)
            .unwrap_or(0),
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Split event data into `(actor, detail)` according to the payload
/// struct the contract publishes for `kind`.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::ProcessCreated => (
            extract_field(value, &["entity"]),
            extract_field(value, &["census_uri"]),
        ),
        EventKind::StatusUpdated => {
            let status = extract_field(value, &["status"])
                .and_then(|s| s.parse::<u32>().ok())
                .and_then(|code| ProcessStatus::from_u32(code).ok())
                .map(|s| s.as_str().to_string());
            (extract_field(value, &["entity"]), status)
        }
        EventKind::QuestionIndexUpdated => (
            extract_field(value, &["entity"]),
            extract_field(value, &["question_index"]),
        ),
        EventKind::CensusUpdated => (
            extract_field(value, &["entity"]),
            extract_field(value, &["census_uri"]),
        ),
        EventKind::ResultsPublished => (None, extract_field(value, &["results"])),
        EventKind::GenesisUpdated | EventKind::ChainIdUpdated => (None, scalar(value)),
        EventKind::ValidatorAdded
        | EventKind::ValidatorRemoved
        | EventKind::OracleAdded
        | EventKind::OracleRemoved => (scalar(value), None),
        EventKind::OwnershipTransferred => (
            extract_field(value, &["new_owner"]),
            extract_field(value, &["previous_owner"]),
        ),
        EventKind::Unknown => (None, None),
    }
}

/// Render a bare string/number, or the `value` of a typed JSON wrapper.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => value.get("value").and_then(scalar),
        _ => None,
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(scalar))
}

/// Extract the payload of a topic entry.
/// The RPC may return `{"type":"symbol","value":"created"}` or just the raw string.
fn topic_value(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| scalar(&v))
        .unwrap_or_else(|| raw.to_string())
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
