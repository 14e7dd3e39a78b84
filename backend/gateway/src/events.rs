//! Event types emitted by the process registry contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/process_registry/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new process was created (`created` topic).
    ProcessCreated,
    /// A process changed status (`status` topic).
    StatusUpdated,
    /// A serial process moved to its next question (`question` topic).
    QuestionIndexUpdated,
    /// Census root and URI were replaced (`census` topic).
    CensusUpdated,
    /// An oracle published results (`results` topic).
    ResultsPublished,
    /// The genesis marker changed (`genesis` topic).
    GenesisUpdated,
    /// The chain id changed (`chain_id` topic).
    ChainIdUpdated,
    ValidatorAdded,
    ValidatorRemoved,
    OracleAdded,
    OracleRemoved,
    /// Registry ownership moved (`owner` topic).
    OwnershipTransferred,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProcessCreated,
            "status" => Self::StatusUpdated,
            "question" => Self::QuestionIndexUpdated,
            "census" => Self::CensusUpdated,
            "results" => Self::ResultsPublished,
            "genesis" => Self::GenesisUpdated,
            "chain_id" => Self::ChainIdUpdated,
            "val_add" => Self::ValidatorAdded,
            "val_rm" => Self::ValidatorRemoved,
            "orc_add" => Self::OracleAdded,
            "orc_rm" => Self::OracleRemoved,
            "owner" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string for logs and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessCreated => "process_created",
            Self::StatusUpdated => "status_updated",
            Self::QuestionIndexUpdated => "question_index_updated",
            Self::CensusUpdated => "census_updated",
            Self::ResultsPublished => "results_published",
            Self::GenesisUpdated => "genesis_updated",
            Self::ChainIdUpdated => "chain_id_updated",
            Self::ValidatorAdded => "validator_added",
            Self::ValidatorRemoved => "validator_removed",
            Self::OracleAdded => "oracle_added",
            Self::OracleRemoved => "oracle_removed",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the second topic of this event is a process id.
    pub fn is_process_event(&self) -> bool {
        matches!(
            self,
            Self::ProcessCreated
                | Self::StatusUpdated
                | Self::QuestionIndexUpdated
                | Self::CensusUpdated
                | Self::ResultsPublished
        )
    }
}

/// A decoded registry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEvent {
    pub event_type: String,
    /// Hex process id, for process events.
    pub process_id: Option<String>,
    /// Address that caused or is the subject of the event.
    pub actor: Option<String>,
    /// Kind-specific payload: new status, question index, census URI, results, …
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}
