//! Off-chain process id derivation.
//!
//! Reproduces the registry's
//! `sha256(entity_xdr || index_be32 || genesis || chain_id_be32)` so clients
//! can know a process id before `create` is submitted. Callers must use the
//! registry's *current* genesis and chain id; ids computed against stale
//! values will not match.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use stellar_strkey::Strkey;

use crate::errors::{GatewayError, Result};

/// `ScValType::Address`
const SCV_ADDRESS: u32 = 18;
/// `ScAddressType::Account`
const SC_ADDRESS_TYPE_ACCOUNT: u32 = 0;
/// `ScAddressType::Contract`
const SC_ADDRESS_TYPE_CONTRACT: u32 = 1;
/// `PublicKeyType::Ed25519`
const PUBLIC_KEY_TYPE_ED25519: u32 = 0;

/// The two kinds of address an entity can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    /// A Stellar account, identified by its raw ed25519 public key.
    Account([u8; 32]),
    /// A contract, identified by its contract hash.
    Contract([u8; 32]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Contract,
}

/// Length of a `G…` or `C…` strkey.
const STRKEY_LEN: usize = 56;

impl EntityRef {
    /// Accept either a strkey or a hex key. `kind` only matters for hex;
    /// for a strkey it must agree with the strkey's own type when given.
    pub fn parse(raw: &str, kind: Option<EntityKind>) -> Result<Self> {
        let raw = raw.trim();
        if raw.len() != STRKEY_LEN {
            return Self::from_hex(kind.unwrap_or(EntityKind::Account), raw);
        }

        let entity = Self::from_strkey(raw)?;
        match kind {
            Some(expected) if expected != entity.kind() => Err(GatewayError::InvalidParams(
                format!("entity strkey is not of kind {expected:?}"),
            )),
            _ => Ok(entity),
        }
    }

    /// Parse a `G…` account or `C…` contract strkey.
    pub fn from_strkey(raw: &str) -> Result<Self> {
        match Strkey::from_string(raw) {
            Ok(Strkey::PublicKeyEd25519(key)) => Ok(EntityRef::Account(key.0)),
            Ok(Strkey::Contract(contract)) => Ok(EntityRef::Contract(contract.0)),
            Ok(_) => Err(GatewayError::InvalidParams(
                "entity strkey must be an account (G…) or a contract (C…)".to_string(),
            )),
            Err(e) => Err(GatewayError::InvalidParams(format!(
                "entity is not a valid strkey: {e}"
            ))),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Account(_) => EntityKind::Account,
            EntityRef::Contract(_) => EntityKind::Contract,
        }
    }

    pub fn from_hex(kind: EntityKind, key_hex: &str) -> Result<Self> {
        let key = decode_32(key_hex, "entity key")?;
        Ok(match kind {
            EntityKind::Account => EntityRef::Account(key),
            EntityKind::Contract => EntityRef::Contract(key),
        })
    }

    /// XDR of the entity as an `ScVal::Address`, which is what the registry
    /// hashes.
    pub fn to_xdr(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(44);
        out.extend_from_slice(&SCV_ADDRESS.to_be_bytes());
        match self {
            EntityRef::Account(key) => {
                out.extend_from_slice(&SC_ADDRESS_TYPE_ACCOUNT.to_be_bytes());
                out.extend_from_slice(&PUBLIC_KEY_TYPE_ED25519.to_be_bytes());
                out.extend_from_slice(key);
            }
            EntityRef::Contract(hash) => {
                out.extend_from_slice(&SC_ADDRESS_TYPE_CONTRACT.to_be_bytes());
                out.extend_from_slice(hash);
            }
        }
        out
    }
}

/// Derive the id of `entity`'s `index`-th process.
pub fn process_id(entity: &EntityRef, index: u32, genesis: &[u8; 32], chain_id: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(entity.to_xdr());
    hasher.update(index.to_be_bytes());
    hasher.update(genesis);
    hasher.update(chain_id.to_be_bytes());
    hasher.finalize().into()
}

/// Decode a 32-byte value from hex, with or without a `0x` prefix.
pub fn decode_32(raw: &str, what: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(raw.trim().trim_start_matches("0x"))
        .map_err(|e| GatewayError::InvalidParams(format!("{what} is not valid hex: {e}")))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| GatewayError::InvalidParams(format!("{what} must be 32 bytes, got {}", b.len())))
}
