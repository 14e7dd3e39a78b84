//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the registry:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type            | Description                          |
//! |----------------|-----------------|--------------------------------------|
//! | `Owner`        | `Address`       | Registry owner                       |
//! | `Genesis`      | `BytesN<32>`    | Genesis marker mixed into process ids|
//! | `ChainId`      | `u32`           | Chain id mixed into process ids      |
//! | `Validators`   | `Vec<Address>`  | Validator set                        |
//! | `Oracles`      | `Vec<Address>`  | Oracle set (may publish results)     |
//! | `ProcessCount` | `u32`           | Highest assigned process index       |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                 | Type            | Description                     |
//! |---------------------|-----------------|---------------------------------|
//! | `ProcIndex(id)`     | `u32`           | Process id → list index         |
//! | `ProcConfig(index)` | `ProcessConfig` | Immutable process configuration |
//! | `ProcState(index)`  | `ProcessState`  | Mutable process state           |
//! | `EntityCount(addr)` | `u32`           | Processes created by an entity  |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Process indices start at 1. Index 0 is never written, and a missing
//! `ProcIndex` entry is the only "not found" signal.

use soroban_sdk::{contracttype, Address, BytesN, Env, Vec};

use crate::types::{Process, ProcessConfig, ProcessState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    Genesis,
    ChainId,
    Validators,
    Oracles,
    ProcessCount,
    ProcIndex(BytesN<32>),
    ProcConfig(u32),
    ProcState(u32),
    EntityCount(Address),
}

/// Which of the two administrative address lists to operate on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddressList {
    Validators,
    Oracles,
}

impl AddressList {
    fn key(self) -> DataKey {
        match self {
            AddressList::Validators => DataKey::Validators,
            AddressList::Oracles => DataKey::Oracles,
        }
    }
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn get_genesis(env: &Env) -> Option<BytesN<32>> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Genesis)
}

pub fn set_genesis(env: &Env, genesis: &BytesN<32>) {
    env.storage().instance().set(&DataKey::Genesis, genesis);
    bump_instance(env);
}

pub fn get_chain_id(env: &Env) -> Option<u32> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::ChainId)
}

pub fn set_chain_id(env: &Env, chain_id: u32) {
    env.storage().instance().set(&DataKey::ChainId, &chain_id);
    bump_instance(env);
}

pub fn load_list(env: &Env, list: AddressList) -> Vec<Address> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&list.key())
        .unwrap_or_else(|| Vec::new(env))
}

pub fn save_list(env: &Env, list: AddressList, items: &Vec<Address>) {
    env.storage().instance().set(&list.key(), items);
    bump_instance(env);
}

/// Number of processes stored so far (also the highest assigned index).
pub fn get_process_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ProcessCount)
        .unwrap_or(0)
}

/// Atomically reads, increments, and stores the process counter.
/// Returns the list index for the *new* process (post-increment value,
/// so the first process lands at index 1).
pub fn next_process_index(env: &Env) -> u32 {
    let next = get_process_count(env) + 1;
    env.storage().instance().set(&DataKey::ProcessCount, &next);
    next
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_entity_count(env: &Env, entity: &Address) -> u32 {
    let key = DataKey::EntityCount(entity.clone());
    let count: Option<u32> = env.storage().persistent().get(&key);
    match count {
        Some(count) => {
            bump_persistent(env, &key);
            count
        }
        None => 0,
    }
}

pub fn set_entity_count(env: &Env, entity: &Address, count: u32) {
    let key = DataKey::EntityCount(entity.clone());
    env.storage().persistent().set(&key, &count);
    bump_persistent(env, &key);
}

/// Resolve a process id to its list index, if it was ever created.
pub fn find_index(env: &Env, id: &BytesN<32>) -> Option<u32> {
    let key = DataKey::ProcIndex(id.clone());
    let index: Option<u32> = env.storage().persistent().get(&key);
    if index.is_some() {
        bump_persistent(env, &key);
    }
    index
}

/// Save the lookup entry, immutable config and initial state of a new process.
pub fn save_process(env: &Env, config: &ProcessConfig, state: &ProcessState) {
    let index_key = DataKey::ProcIndex(config.id.clone());
    let config_key = DataKey::ProcConfig(config.index);
    let state_key = DataKey::ProcState(config.index);

    env.storage().persistent().set(&index_key, &config.index);
    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &index_key);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Process` by combining config and state.
pub fn load_process(env: &Env, index: u32) -> Option<Process> {
    let config = load_process_config(env, index)?;
    let state = load_process_state(env, index)?;
    Some(Process::from_parts(config, state))
}

pub fn load_process_config(env: &Env, index: u32) -> Option<ProcessConfig> {
    let key = DataKey::ProcConfig(index);
    let config: Option<ProcessConfig> = env.storage().persistent().get(&key);
    if config.is_some() {
        bump_persistent(env, &key);
    }
    config
}

pub fn load_process_state(env: &Env, index: u32) -> Option<ProcessState> {
    let key = DataKey::ProcState(index);
    let state: Option<ProcessState> = env.storage().persistent().get(&key);
    if state.is_some() {
        bump_persistent(env, &key);
    }
    state
}

/// Save only the mutable process state.
pub fn save_process_state(env: &Env, index: u32, state: &ProcessState) {
    let key = DataKey::ProcState(index);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}
