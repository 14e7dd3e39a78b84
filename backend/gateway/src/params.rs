//! Parameter codec for the process registry.
//!
//! The registry takes and returns its process parameters as grouped,
//! positional tuples. This module maps between those tuples and named
//! structures:
//!
//! * [`encode_create_params`] — [`NewProcess`] → [`CreateArgs`]
//! * [`decode_get_response`] — [`GetResponse`] → [`ProcessView`]
//!
//! Both are pure. The codec only checks that required fields are present and
//! well-formed; whether the registry accepts the values is decided on-chain.
//!
//! Binary fields travel as base64 in the named structures and as hex in the
//! positional ones (the form Soroban tooling uses for `Bytes` arguments).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::errors::{GatewayError, Result};

// ─────────────────────────────────────────────────────────
// Flag wrappers
// ─────────────────────────────────────────────────────────

/// Process mode bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessMode(u32);

impl ProcessMode {
    pub const AUTO_START: u32 = 1 << 0;
    pub const INTERRUPTIBLE: u32 = 1 << 1;
    pub const DYNAMIC_CENSUS: u32 = 1 << 2;
    pub const ALLOW_VOTE_OVERWRITE: u32 = 1 << 3;
    pub const ENCRYPTED_METADATA: u32 = 1 << 4;

    pub fn new(bits: u32) -> Self {
        ProcessMode(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_auto_start(&self) -> bool {
        self.0 & Self::AUTO_START != 0
    }

    pub fn is_interruptible(&self) -> bool {
        self.0 & Self::INTERRUPTIBLE != 0
    }

    pub fn has_dynamic_census(&self) -> bool {
        self.0 & Self::DYNAMIC_CENSUS != 0
    }

    pub fn allows_vote_overwrite(&self) -> bool {
        self.0 & Self::ALLOW_VOTE_OVERWRITE != 0
    }

    pub fn has_encrypted_metadata(&self) -> bool {
        self.0 & Self::ENCRYPTED_METADATA != 0
    }
}

/// Envelope type bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeType(u32);

impl EnvelopeType {
    pub const SERIAL: u32 = 1 << 0;
    pub const ANONYMOUS: u32 = 1 << 1;
    pub const ENCRYPTED_VOTES: u32 = 1 << 2;

    pub fn new(bits: u32) -> Self {
        EnvelopeType(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_serial(&self) -> bool {
        self.0 & Self::SERIAL != 0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 & Self::ANONYMOUS != 0
    }

    pub fn has_encrypted_votes(&self) -> bool {
        self.0 & Self::ENCRYPTED_VOTES != 0
    }
}

/// Lifecycle status as stored by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Open,
    Ended,
    Canceled,
    Paused,
}

impl ProcessStatus {
    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Open),
            1 => Ok(Self::Ended),
            2 => Ok(Self::Canceled),
            3 => Ok(Self::Paused),
            other => Err(GatewayError::InvalidParams(format!(
                "unknown process status {other}"
            ))),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            Self::Open => 0,
            Self::Ended => 1,
            Self::Canceled => 2,
            Self::Paused => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Ended => "ended",
            Self::Canceled => "canceled",
            Self::Paused => "paused",
        }
    }

    pub fn is_open(&self) -> bool {
        *self == Self::Open
    }

    pub fn is_paused(&self) -> bool {
        *self == Self::Paused
    }

    pub fn is_ended(&self) -> bool {
        *self == Self::Ended
    }

    pub fn is_canceled(&self) -> bool {
        *self == Self::Canceled
    }

    /// `true` for `Ended` and `Canceled`; no further status changes happen.
    pub fn is_terminal(&self) -> bool {
        self.is_ended() || self.is_canceled()
    }
}

// ─────────────────────────────────────────────────────────
// create
// ─────────────────────────────────────────────────────────

/// Named creation request, as accepted from JSON clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProcess {
    pub mode: Option<u32>,
    pub envelope_type: Option<u32>,
    pub census_origin: Option<u32>,
    /// Census token contract; omitted means the zero identity.
    pub token_address: Option<String>,
    pub metadata: Option<String>,
    pub census_root: Option<String>,
    pub census_uri: Option<String>,
    pub start_block: Option<u32>,
    pub block_count: Option<u32>,
    pub question_count: Option<u32>,
    pub max_count: Option<u32>,
    pub max_value: Option<u32>,
    pub max_vote_overwrites: Option<u32>,
    pub unique_values: Option<bool>,
    pub max_total_cost: Option<u32>,
    pub cost_exponent: Option<u32>,
    pub namespace: Option<u32>,
    /// Base64-encoded signature over the parameters.
    pub params_signature: Option<String>,
}

/// Positional arguments of the registry's `create`, after the entity.
///
/// Serializes as nested JSON arrays in call order:
/// `[[mode, envelopeType, censusOrigin], token, [metadata, censusRoot, censusUri],
///   [startBlock, blockCount], [questionCount, maxCount, maxValue, maxVoteOverwrites],
///   [maxTotalCost, costExponent, namespace], uniqueValues, paramsSignatureHex]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateArgs(
    pub (u32, u32, u32),
    pub Option<String>,
    pub (String, String, String),
    pub (u32, u32),
    pub (u32, u32, u32, u32),
    pub (u32, u32, u32),
    pub bool,
    pub String,
);

/// Lay out `params` in the registry's `create` argument order.
pub fn encode_create_params(params: &NewProcess) -> Result<CreateArgs> {
    let mode = required(params.mode, "mode")?;
    let envelope_type = required(params.envelope_type, "envelopeType")?;
    let metadata = required_str(&params.metadata, "metadata")?;
    let census_root = required_str(&params.census_root, "censusRoot")?;
    let census_uri = required_str(&params.census_uri, "censusUri")?;
    let start_block = required(params.start_block, "startBlock")?;
    let block_count = required(params.block_count, "blockCount")?;
    let question_count = required(params.question_count, "questionCount")?;
    let max_count = required(params.max_count, "maxCount")?;
    let max_value = required(params.max_value, "maxValue")?;

    let token = params
        .token_address
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    let signature = match params.params_signature.as_deref() {
        Some(encoded) if !encoded.is_empty() => BASE64.decode(encoded).map_err(|e| {
            GatewayError::InvalidParams(format!("paramsSignature is not valid base64: {e}"))
        })?,
        _ => Vec::new(),
    };

    Ok(CreateArgs(
        (mode, envelope_type, params.census_origin.unwrap_or(0)),
        token,
        (metadata, census_root, census_uri),
        (start_block, block_count),
        (
            question_count,
            max_count,
            max_value,
            params.max_vote_overwrites.unwrap_or(0),
        ),
        (
            params.max_total_cost.unwrap_or(0),
            params.cost_exponent.unwrap_or(0),
            params.namespace.unwrap_or(0),
        ),
        params.unique_values.unwrap_or(false),
        hex::encode(signature),
    ))
}

fn required<T: Copy>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| GatewayError::InvalidParams(format!("{name} is required")))
}

fn required_str(value: &Option<String>, name: &str) -> Result<String> {
    match value.as_deref() {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(GatewayError::InvalidParams(format!("{name} is required"))),
    }
}

// ─────────────────────────────────────────────────────────
// get
// ─────────────────────────────────────────────────────────

/// Positional form of a stored process record.
///
/// `[[mode, envelopeType, censusOrigin], [entity, token],
///   [metadata, censusRoot, censusUri], [startBlock, blockCount], status,
///   [questionIndex, questionCount, maxCount, maxValue, maxVoteOverwrites],
///   [maxTotalCost, costExponent, namespace], uniqueValues,
///   paramsSignatureHex, results]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponse(
    pub (u32, u32, u32),
    pub (String, Option<String>),
    pub (String, String, String),
    pub (u32, u32),
    pub u32,
    pub (u32, u32, u32, u32, u32),
    pub (u32, u32, u32),
    pub bool,
    pub String,
    pub String,
);

/// Named view of a process record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessView {
    pub mode: ProcessMode,
    pub envelope_type: EnvelopeType,
    pub census_origin: u32,
    pub entity_address: String,
    pub token_address: Option<String>,
    pub metadata: String,
    pub census_root: String,
    pub census_uri: String,
    pub start_block: u32,
    pub block_count: u32,
    pub status: ProcessStatus,
    pub question_index: u32,
    pub question_count: u32,
    pub max_count: u32,
    pub max_value: u32,
    pub max_vote_overwrites: u32,
    pub max_total_cost: u32,
    pub cost_exponent: u32,
    pub namespace: u32,
    pub unique_values: bool,
    /// Base64-encoded, mirroring [`NewProcess::params_signature`].
    pub params_signature: String,
    /// Empty until published.
    pub results: String,
}

impl ProcessView {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Map a positional record onto [`ProcessView`].
pub fn decode_get_response(response: &GetResponse) -> Result<ProcessView> {
    let GetResponse(
        (mode, envelope_type, census_origin),
        (entity, token),
        (metadata, census_root, census_uri),
        (start_block, block_count),
        status,
        (question_index, question_count, max_count, max_value, max_vote_overwrites),
        (max_total_cost, cost_exponent, namespace),
        unique_values,
        signature_hex,
        results,
    ) = response;

    let signature = hex::decode(signature_hex.trim_start_matches("0x")).map_err(|e| {
        GatewayError::InvalidParams(format!("params signature is not valid hex: {e}"))
    })?;

    Ok(ProcessView {
        mode: ProcessMode::new(*mode),
        envelope_type: EnvelopeType::new(*envelope_type),
        census_origin: *census_origin,
        entity_address: entity.clone(),
        token_address: token.clone(),
        metadata: metadata.clone(),
        census_root: census_root.clone(),
        census_uri: census_uri.clone(),
        start_block: *start_block,
        block_count: *block_count,
        status: ProcessStatus::from_u32(*status)?,
        question_index: *question_index,
        question_count: *question_count,
        max_count: *max_count,
        max_value: *max_value,
        max_vote_overwrites: *max_vote_overwrites,
        max_total_cost: *max_total_cost,
        cost_exponent: *cost_exponent,
        namespace: *namespace,
        unique_values: *unique_values,
        params_signature: BASE64.encode(signature),
        results: results.clone(),
    })
}

/// A `get` result as Soroban RPC clients render it: the registry's
/// `Process` record keyed by field name, addresses as strkeys and byte
/// fields as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: String,
    pub index: u32,
    pub entity: String,
    pub mode: u32,
    pub envelope_type: u32,
    pub census_origin: u32,
    pub token: Option<String>,
    pub metadata: String,
    pub census_root: String,
    pub census_uri: String,
    pub start_block: u32,
    pub block_count: u32,
    pub status: u32,
    pub question_index: u32,
    pub question_count: u32,
    pub max_count: u32,
    pub max_value: u32,
    pub max_vote_overwrites: u32,
    pub unique_values: bool,
    pub max_total_cost: u32,
    pub cost_exponent: u32,
    pub namespace: u32,
    pub params_signature: String,
    pub results: String,
}

impl From<&ProcessRecord> for GetResponse {
    fn from(r: &ProcessRecord) -> Self {
        GetResponse(
            (r.mode, r.envelope_type, r.census_origin),
            (r.entity.clone(), r.token.clone()),
            (r.metadata.clone(), r.census_root.clone(), r.census_uri.clone()),
            (r.start_block, r.block_count),
            r.status,
            (
                r.question_index,
                r.question_count,
                r.max_count,
                r.max_value,
                r.max_vote_overwrites,
            ),
            (r.max_total_cost, r.cost_exponent, r.namespace),
            r.unique_values,
            r.params_signature.clone(),
            r.results.clone(),
        )
    }
}

/// Map a record returned by the registry's `get` onto [`ProcessView`].
pub fn decode_process_record(record: &ProcessRecord) -> Result<ProcessView> {
    decode_get_response(&GetResponse::from(record))
}
