//! Deterministic process identifiers.
//!
//! `id = sha256(entity_xdr || index_be32 || genesis || chain_id_be32)`
//!
//! `entity_xdr` is the XDR encoding of the entity as an `ScVal::Address`.
//! Anyone who knows the entity, its next sequence index and the registry's
//! current genesis/chain id can compute the id before submitting `create`.
//! Changing genesis or chain id changes every id derived afterwards but never
//! touches records already stored.

use soroban_sdk::{xdr::ToXdr, Address, BytesN, Env};

pub fn derive(
    env: &Env,
    entity: &Address,
    index: u32,
    genesis: &BytesN<32>,
    chain_id: u32,
) -> BytesN<32> {
    let mut preimage = entity.clone().to_xdr(env);
    preimage.extend_from_array(&index.to_be_bytes());
    preimage.extend_from_array(&genesis.to_array());
    preimage.extend_from_array(&chain_id.to_be_bytes());
    env.crypto().sha256(&preimage).to_bytes()
}
