//! # Types
//!
//! Shared data structures used across all modules of the process registry.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Process` is internally stored as two separate ledger entries:
//!
//! - [`ProcessConfig`] — written once at creation; never mutated.
//! - [`ProcessState`] — written on status, question, census and result updates.
//!
//! The public API exposes the reconstructed [`Process`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProcessStatus`] only moves along these edges, and only for processes
//! created with the `INTERRUPTIBLE` mode flag:
//!
//! ```text
//! Paused ◄──► Open
//!   │          │
//!   ├──────────┴──► Ended
//!   └──────────┴──► Canceled
//! ```
//!
//! `Ended` and `Canceled` are terminal.

use soroban_sdk::{contracttype, Address, Bytes, BytesN, String};

/// Process mode flags.
pub mod mode {
    /// Created paused; the entity opens it explicitly.
    pub const AUTO_START: u32 = 1 << 0;
    /// Status may be changed by the entity after creation.
    pub const INTERRUPTIBLE: u32 = 1 << 1;
    /// Census root and URI may be replaced while the process is live.
    pub const DYNAMIC_CENSUS: u32 = 1 << 2;
    /// Voters may overwrite a previously cast vote.
    pub const ALLOW_VOTE_OVERWRITE: u32 = 1 << 3;
    /// Metadata is encrypted until results are published.
    pub const ENCRYPTED_METADATA: u32 = 1 << 4;

    pub const ALL: u32 =
        AUTO_START | INTERRUPTIBLE | DYNAMIC_CENSUS | ALLOW_VOTE_OVERWRITE | ENCRYPTED_METADATA;
}

/// Envelope type flags.
pub mod envelope {
    /// Questions are answered one at a time, in order.
    pub const SERIAL: u32 = 1 << 0;
    pub const ANONYMOUS: u32 = 1 << 1;
    pub const ENCRYPTED_VOTES: u32 = 1 << 2;

    pub const ALL: u32 = SERIAL | ANONYMOUS | ENCRYPTED_VOTES;
}

#[inline]
pub fn has_flag(bits: u32, flag: u32) -> bool {
    bits & flag == flag
}

/// Lifecycle status of a process.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ProcessStatus {
    /// Accepting votes.
    Open = 0,
    /// Voting finished normally.
    Ended = 1,
    /// Aborted by the entity.
    Canceled = 2,
    /// Temporarily not accepting votes.
    Paused = 3,
}

impl ProcessStatus {
    /// `true` once the process can no longer change status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Ended | ProcessStatus::Canceled)
    }

    /// `true` if the process is still running (open or paused).
    pub fn is_live(&self) -> bool {
        matches!(self, ProcessStatus::Open | ProcessStatus::Paused)
    }

    /// Whether the edge `self -> to` exists in the lifecycle graph.
    ///
    /// Mode checks (interruptible) are the caller's responsibility.
    pub fn can_transition_to(&self, to: ProcessStatus) -> bool {
        matches!(
            (self, to),
            (ProcessStatus::Paused, ProcessStatus::Open)
                | (ProcessStatus::Open, ProcessStatus::Paused)
                | (ProcessStatus::Open | ProcessStatus::Paused, ProcessStatus::Ended)
                | (ProcessStatus::Open | ProcessStatus::Paused, ProcessStatus::Canceled)
        )
    }
}

/// Immutable process configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessConfig {
    pub id: BytesN<32>,
    pub index: u32,
    pub entity: Address,
    pub mode: u32,
    pub envelope_type: u32,
    pub census_origin: u32,
    pub token: Option<Address>,
    pub metadata: String,
    pub start_block: u32,
    pub block_count: u32,
    pub question_count: u32,
    pub max_count: u32,
    pub max_value: u32,
    pub max_vote_overwrites: u32,
    pub unique_values: bool,
    pub max_total_cost: u32,
    pub cost_exponent: u32,
    pub namespace: u32,
    pub params_signature: Bytes,
}

/// Mutable process state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessState {
    pub status: ProcessStatus,
    pub question_index: u32,
    pub census_root: String,
    pub census_uri: String,
    /// Empty until an oracle publishes the results.
    pub results: String,
}

/// Full on-chain representation of a voting process.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProcessConfig` + `ProcessState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Process {
    /// Derived identifier, see [`crate::process_id`].
    pub id: BytesN<32>,
    /// Position in the registry's process list (starts at 1).
    pub index: u32,
    /// Address that created the process.
    pub entity: Address,
    pub mode: u32,
    pub envelope_type: u32,
    pub census_origin: u32,
    /// Token whose holders form the census, if any.
    pub token: Option<Address>,
    /// Content reference to the process metadata.
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
    pub unique_values: bool,
    pub max_total_cost: u32,
    pub cost_exponent: u32,
    pub namespace: u32,
    pub params_signature: Bytes,
    pub results: String,
}

impl Process {
    pub fn from_parts(config: ProcessConfig, state: ProcessState) -> Self {
        Process {
            id: config.id,
            index: config.index,
            entity: config.entity,
            mode: config.mode,
            envelope_type: config.envelope_type,
            census_origin: config.census_origin,
            token: config.token,
            metadata: config.metadata,
            census_root: state.census_root,
            census_uri: state.census_uri,
            start_block: config.start_block,
            block_count: config.block_count,
            status: state.status,
            question_index: state.question_index,
            question_count: config.question_count,
            max_count: config.max_count,
            max_value: config.max_value,
            max_vote_overwrites: config.max_vote_overwrites,
            unique_values: config.unique_values,
            max_total_cost: config.max_total_cost,
            cost_exponent: config.cost_exponent,
            namespace: config.namespace,
            params_signature: config.params_signature,
            results: state.results,
        }
    }
}

/// Census root and URI, always read and written as a pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Census {
    pub root: String,
    pub uri: String,
}
