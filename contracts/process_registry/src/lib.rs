//! # Process Registry Contract
//!
//! A Soroban contract that keeps the authoritative list of voting processes.
//! Entities create processes and drive their lifecycle; owner-managed oracles
//! publish results back onto the record.
//!
//! | Phase          | Entry Point(s)                                                   |
//! |----------------|------------------------------------------------------------------|
//! | Bootstrap      | [`ProcessRegistry::init`], `transfer_ownership`                  |
//! | Registry admin | `set_genesis`, `set_chain_id`, `add/remove_validator`, `add/remove_oracle` |
//! | Creation       | [`ProcessRegistry::create`]                                      |
//! | Lifecycle      | `set_status`, `increment_question_index`, `set_census`           |
//! | Results        | [`ProcessRegistry::set_results`] (oracle only)                   |
//! | Queries        | `get`, `get_results`, `get_process_id`, `get_next_process_id`, … |
//!
//! ## Architecture
//!
//! Authorization lives in [`access`], storage in [`storage`], identifier
//! derivation in [`process_id`] and event payloads in [`events`]. This file
//! holds the public entry points and the lifecycle rules.
//!
//! Every failed guard aborts the invocation with a typed [`Error`]; Soroban
//! discards all storage writes of an aborted invocation.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, Address, Bytes, BytesN, Env, String,
    Vec,
};

mod access;
pub mod events;
pub mod process_id;
mod storage;
mod types;

#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_lifecycle;

use storage::AddressList;
pub use types::{envelope, has_flag, mode, Census, Process, ProcessStatus};
use types::{ProcessConfig, ProcessState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized      = 1,
    NotInitialized          = 2,
    NotOwner                = 3,
    NotEntity               = 4,
    NotOracle               = 5,
    NotInterruptible        = 6,
    InvalidStatusTransition = 7,
    ProcessNotLive          = 8,
    NotSerial               = 9,
    NotDynamicCensus        = 10,
    EmptyMetadata           = 11,
    EmptyCensus             = 12,
    EmptyResults            = 13,
    InvalidQuestionCount    = 14,
    InvalidMaxCount         = 15,
    InvalidMaxValue         = 16,
    MissingStartBlock       = 17,
    InvalidMode             = 18,
    InvalidEnvelopeType     = 19,
    InvalidVoteOverwrites   = 20,
    DuplicateEntry          = 21,
    EntryMismatch           = 22,
    ProcessNotFound         = 23,
    ProcessCanceled         = 24,
    ResultsAlreadySet       = 25,
    ValueUnchanged          = 26,
}

/// Coarse rejection category of an [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Authorization,
    InvalidStateTransition,
    PreconditionViolation,
    NotFound,
    AlreadySet,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::NotOwner | Error::NotEntity | Error::NotOracle => ErrorClass::Authorization,
            Error::NotInterruptible
            | Error::InvalidStatusTransition
            | Error::ProcessNotLive
            | Error::ProcessCanceled => ErrorClass::InvalidStateTransition,
            Error::ProcessNotFound => ErrorClass::NotFound,
            Error::AlreadyInitialized | Error::ResultsAlreadySet | Error::ValueUnchanged => {
                ErrorClass::AlreadySet
            }
            Error::NotInitialized
            | Error::NotSerial
            | Error::NotDynamicCensus
            | Error::EmptyMetadata
            | Error::EmptyCensus
            | Error::EmptyResults
            | Error::InvalidQuestionCount
            | Error::InvalidMaxCount
            | Error::InvalidMaxValue
            | Error::MissingStartBlock
            | Error::InvalidMode
            | Error::InvalidEnvelopeType
            | Error::InvalidVoteOverwrites
            | Error::DuplicateEntry
            | Error::EntryMismatch => ErrorClass::PreconditionViolation,
        }
    }
}

#[contract]
pub struct ProcessRegistry;

#[contractimpl]
impl ProcessRegistry {
    // ─────────────────────────────────────────────────────────
    // Initialisation & ownership
    // ─────────────────────────────────────────────────────────

    /// Initialise the registry with its owner and id-derivation inputs.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    pub fn init(env: Env, owner: Address, genesis: BytesN<32>, chain_id: u32) {
        owner.require_auth();
        if storage::has_owner(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        storage::set_owner(&env, &owner);
        storage::set_genesis(&env, &genesis);
        storage::set_chain_id(&env, chain_id);
    }

    /// Hand the registry over to `new_owner`. The previous owner loses all
    /// owner rights immediately.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) {
        let previous = access::require_owner(&env, &caller);
        storage::set_owner(&env, &new_owner);
        events::ownership_transferred(&env, &previous, &new_owner);
    }

    pub fn get_owner(env: Env) -> Address {
        storage::get_owner(&env).unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    // ─────────────────────────────────────────────────────────
    // Registry configuration (owner only)
    // ─────────────────────────────────────────────────────────

    /// Replace the genesis marker used for future process ids.
    ///
    /// Ids of processes already created stay valid; only ids derived after
    /// this call change.
    pub fn set_genesis(env: Env, caller: Address, genesis: BytesN<32>) {
        access::require_owner(&env, &caller);
        if Self::get_genesis(env.clone()) == genesis {
            panic_with_error!(&env, Error::ValueUnchanged);
        }
        storage::set_genesis(&env, &genesis);
        events::genesis_updated(&env, &genesis);
    }

    /// Replace the chain id used for future process ids.
    pub fn set_chain_id(env: Env, caller: Address, chain_id: u32) {
        access::require_owner(&env, &caller);
        if Self::get_chain_id(env.clone()) == chain_id {
            panic_with_error!(&env, Error::ValueUnchanged);
        }
        storage::set_chain_id(&env, chain_id);
        events::chain_id_updated(&env, chain_id);
    }

    pub fn add_validator(env: Env, caller: Address, validator: Address) {
        access::require_owner(&env, &caller);
        access::add_member(&env, AddressList::Validators, &validator);
        events::validator_added(&env, &validator);
    }

    /// Remove `validator`, which must currently sit at `index` in
    /// [`get_validators`](Self::get_validators).
    pub fn remove_validator(env: Env, caller: Address, index: u32, validator: Address) {
        access::require_owner(&env, &caller);
        access::remove_member(&env, AddressList::Validators, index, &validator);
        events::validator_removed(&env, &validator);
    }

    pub fn add_oracle(env: Env, caller: Address, oracle: Address) {
        access::require_owner(&env, &caller);
        access::add_member(&env, AddressList::Oracles, &oracle);
        events::oracle_added(&env, &oracle);
    }

    /// Remove `oracle`, which must currently sit at `index` in
    /// [`get_oracles`](Self::get_oracles).
    pub fn remove_oracle(env: Env, caller: Address, index: u32, oracle: Address) {
        access::require_owner(&env, &caller);
        access::remove_member(&env, AddressList::Oracles, index, &oracle);
        events::oracle_removed(&env, &oracle);
    }

    pub fn get_genesis(env: Env) -> BytesN<32> {
        storage::get_genesis(&env).unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    pub fn get_chain_id(env: Env) -> u32 {
        storage::get_chain_id(&env).unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }

    pub fn get_validators(env: Env) -> Vec<Address> {
        storage::load_list(&env, AddressList::Validators)
    }

    pub fn get_oracles(env: Env) -> Vec<Address> {
        storage::load_list(&env, AddressList::Oracles)
    }

    pub fn is_validator(env: Env, address: Address) -> bool {
        access::is_member(&env, AddressList::Validators, &address)
    }

    pub fn is_oracle(env: Env, address: Address) -> bool {
        access::is_member(&env, AddressList::Oracles, &address)
    }

    // ─────────────────────────────────────────────────────────
    // Process creation
    // ─────────────────────────────────────────────────────────

    /// Create a new voting process owned by `entity` and return its id.
    ///
    /// Arguments are grouped the same way the off-chain parameter codec lays
    /// them out:
    ///
    /// - `mode_envelope_origin`: `(mode, envelope_type, census_origin)`
    /// - `token`: census token, `None` for the zero identity
    /// - `metadata_census`: `(metadata, census_root, census_uri)`
    /// - `start_block_count`: `(start_block, block_count)`
    /// - `question_shape`: `(question_count, max_count, max_value, max_vote_overwrites)`
    /// - `cost_namespace`: `(max_total_cost, cost_exponent, namespace)`
    ///
    /// The process starts `Paused` when `mode::AUTO_START` is set (it waits
    /// for its start block) and `Open` otherwise.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        env: Env,
        entity: Address,
        mode_envelope_origin: (u32, u32, u32),
        token: Option<Address>,
        metadata_census: (String, String, String),
        start_block_count: (u32, u32),
        question_shape: (u32, u32, u32, u32),
        cost_namespace: (u32, u32, u32),
        unique_values: bool,
        params_signature: Bytes,
    ) -> BytesN<32> {
        entity.require_auth();

        let (mode, envelope_type, census_origin) = mode_envelope_origin;
        let (metadata, census_root, census_uri) = metadata_census;
        let (start_block, block_count) = start_block_count;
        let (question_count, max_count, max_value, max_vote_overwrites) = question_shape;
        let (max_total_cost, cost_exponent, namespace) = cost_namespace;

        if mode & !types::mode::ALL != 0 {
            panic_with_error!(&env, Error::InvalidMode);
        }
        if envelope_type & !types::envelope::ALL != 0 {
            panic_with_error!(&env, Error::InvalidEnvelopeType);
        }
        if metadata.len() == 0 {
            panic_with_error!(&env, Error::EmptyMetadata);
        }
        if census_root.len() == 0 || census_uri.len() == 0 {
            panic_with_error!(&env, Error::EmptyCensus);
        }
        if question_count == 0 {
            panic_with_error!(&env, Error::InvalidQuestionCount);
        }
        if max_count == 0 {
            panic_with_error!(&env, Error::InvalidMaxCount);
        }
        if max_value == 0 {
            panic_with_error!(&env, Error::InvalidMaxValue);
        }
        let auto_start = has_flag(mode, types::mode::AUTO_START);
        if auto_start && start_block == 0 {
            panic_with_error!(&env, Error::MissingStartBlock);
        }
        if max_vote_overwrites > 0 && !has_flag(mode, types::mode::ALLOW_VOTE_OVERWRITE) {
            panic_with_error!(&env, Error::InvalidVoteOverwrites);
        }

        let genesis = Self::get_genesis(env.clone());
        let chain_id = Self::get_chain_id(env.clone());

        let sequence = storage::get_entity_count(&env, &entity);
        let id = process_id::derive(&env, &entity, sequence, &genesis, chain_id);
        let index = storage::next_process_index(&env);

        let config = ProcessConfig {
            id: id.clone(),
            index,
            entity: entity.clone(),
            mode,
            envelope_type,
            census_origin,
            token,
            metadata,
            start_block,
            block_count,
            question_count,
            max_count,
            max_value,
            max_vote_overwrites,
            unique_values,
            max_total_cost,
            cost_exponent,
            namespace,
            params_signature,
        };
        let state = ProcessState {
            status: if auto_start {
                ProcessStatus::Paused
            } else {
                ProcessStatus::Open
            },
            question_index: 0,
            census_root,
            census_uri,
            results: String::from_str(&env, ""),
        };

        storage::save_process(&env, &config, &state);
        storage::set_entity_count(&env, &entity, sequence + 1);

        events::process_created(&env, &entity, &id, &state.census_uri);
        id
    }

    // ─────────────────────────────────────────────────────────
    // Lifecycle (entity only)
    // ─────────────────────────────────────────────────────────

    /// Move the process to `status`.
    ///
    /// Requires the `INTERRUPTIBLE` mode flag and an edge in the lifecycle
    /// graph (see [`ProcessStatus::can_transition_to`]).
    pub fn set_status(env: Env, caller: Address, process_id: BytesN<32>, status: ProcessStatus) {
        let (config, state) = load_parts(&env, &process_id);
        access::require_entity(&env, &caller, &config);
        transition(&env, &config, state, status);
    }

    /// Advance to the next question of a serial process.
    ///
    /// Advancing past the last question ends the process instead, through
    /// the same guard as [`set_status`](Self::set_status).
    pub fn increment_question_index(env: Env, caller: Address, process_id: BytesN<32>) {
        let (config, mut state) = load_parts(&env, &process_id);
        access::require_entity(&env, &caller, &config);

        if !state.status.is_live() {
            panic_with_error!(&env, Error::ProcessNotLive);
        }
        if !has_flag(config.envelope_type, types::envelope::SERIAL) {
            panic_with_error!(&env, Error::NotSerial);
        }

        let next = state.question_index + 1;
        if next < config.question_count {
            state.question_index = next;
            storage::save_process_state(&env, config.index, &state);
            events::question_index_updated(&env, &config.entity, &config.id, next);
        } else {
            transition(&env, &config, state, ProcessStatus::Ended);
        }
    }

    /// Replace the census root and URI together.
    pub fn set_census(
        env: Env,
        caller: Address,
        process_id: BytesN<32>,
        census_root: String,
        census_uri: String,
    ) {
        let (config, mut state) = load_parts(&env, &process_id);
        access::require_entity(&env, &caller, &config);

        if !state.status.is_live() {
            panic_with_error!(&env, Error::ProcessNotLive);
        }
        if !has_flag(config.mode, types::mode::DYNAMIC_CENSUS) {
            panic_with_error!(&env, Error::NotDynamicCensus);
        }
        if census_root.len() == 0 || census_uri.len() == 0 {
            panic_with_error!(&env, Error::EmptyCensus);
        }

        state.census_root = census_root;
        state.census_uri = census_uri;
        storage::save_process_state(&env, config.index, &state);
        events::census_updated(
            &env,
            &config.entity,
            &config.id,
            &state.census_root,
            &state.census_uri,
        );
    }

    // ─────────────────────────────────────────────────────────
    // Results (oracle only)
    // ─────────────────────────────────────────────────────────

    /// Publish the results of a process. Results can be set exactly once.
    pub fn set_results(env: Env, oracle: Address, process_id: BytesN<32>, results: String) {
        access::require_oracle(&env, &oracle);
        let (config, mut state) = load_parts(&env, &process_id);

        if results.len() == 0 {
            panic_with_error!(&env, Error::EmptyResults);
        }
        if state.status == ProcessStatus::Canceled {
            panic_with_error!(&env, Error::ProcessCanceled);
        }
        if state.results.len() > 0 {
            panic_with_error!(&env, Error::ResultsAlreadySet);
        }

        state.results = results;
        storage::save_process_state(&env, config.index, &state);
        events::results_published(&env, &config.id, &state.results);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve a process by its id.
    pub fn get(env: Env, process_id: BytesN<32>) -> Process {
        let index = storage::find_index(&env, &process_id)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ProcessNotFound));
        storage::load_process(&env, index)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ProcessNotFound))
    }

    pub fn get_results(env: Env, process_id: BytesN<32>) -> String {
        load_parts(&env, &process_id).1.results
    }

    pub fn get_status(env: Env, process_id: BytesN<32>) -> ProcessStatus {
        load_parts(&env, &process_id).1.status
    }

    pub fn get_question_index(env: Env, process_id: BytesN<32>) -> u32 {
        load_parts(&env, &process_id).1.question_index
    }

    pub fn get_census(env: Env, process_id: BytesN<32>) -> Census {
        let state = load_parts(&env, &process_id).1;
        Census {
            root: state.census_root,
            uri: state.census_uri,
        }
    }

    /// Number of processes created by `entity`; also its next sequence index.
    pub fn get_entity_process_count(env: Env, entity: Address) -> u32 {
        storage::get_entity_count(&env, &entity)
    }

    /// Total number of processes in the registry.
    pub fn get_process_count(env: Env) -> u32 {
        storage::get_process_count(&env)
    }

    /// The id the next `create` by `entity` will receive, given the current
    /// genesis and chain id.
    pub fn get_next_process_id(env: Env, entity: Address) -> BytesN<32> {
        let index = storage::get_entity_count(&env, &entity);
        Self::get_process_id(env, entity, index)
    }

    /// Derive the id of `entity`'s `index`-th process using the current
    /// genesis and chain id.
    pub fn get_process_id(env: Env, entity: Address, index: u32) -> BytesN<32> {
        let genesis = Self::get_genesis(env.clone());
        let chain_id = Self::get_chain_id(env.clone());
        process_id::derive(&env, &entity, index, &genesis, chain_id)
    }
}

/// Load config and state for `process_id` or abort with `ProcessNotFound`.
fn load_parts(env: &Env, process_id: &BytesN<32>) -> (ProcessConfig, ProcessState) {
    let index = storage::find_index(env, process_id)
        .unwrap_or_else(|| panic_with_error!(env, Error::ProcessNotFound));
    let config = storage::load_process_config(env, index)
        .unwrap_or_else(|| panic_with_error!(env, Error::ProcessNotFound));
    let state = storage::load_process_state(env, index)
        .unwrap_or_else(|| panic_with_error!(env, Error::ProcessNotFound));
    (config, state)
}

/// Apply a guarded status change and emit the event.
fn transition(env: &Env, config: &ProcessConfig, mut state: ProcessState, to: ProcessStatus) {
    if !has_flag(config.mode, types::mode::INTERRUPTIBLE) {
        panic_with_error!(env, Error::NotInterruptible);
    }
    if !state.status.can_transition_to(to) {
        panic_with_error!(env, Error::InvalidStatusTransition);
    }
    state.status = to;
    storage::save_process_state(env, config.index, &state);
    events::status_updated(env, &config.entity, &config.id, to);
}
