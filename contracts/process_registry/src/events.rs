//! Contract events.
//!
//! Every event is published with a short symbol as the first topic. Process
//! events carry the process id as the second topic so consumers can filter
//! on it; registry configuration events carry only the symbol.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String};

use crate::types::ProcessStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessCreated {
    pub entity: Address,
    pub process_id: BytesN<32>,
    pub census_uri: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusUpdated {
    pub entity: Address,
    pub process_id: BytesN<32>,
    pub status: ProcessStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionIndexUpdated {
    pub entity: Address,
    pub process_id: BytesN<32>,
    pub question_index: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CensusUpdated {
    pub entity: Address,
    pub process_id: BytesN<32>,
    pub census_root: String,
    pub census_uri: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultsPublished {
    pub process_id: BytesN<32>,
    pub results: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

pub fn process_created(env: &Env, entity: &Address, process_id: &BytesN<32>, census_uri: &String) {
    env.events().publish(
        (symbol_short!("created"), process_id.clone()),
        ProcessCreated {
            entity: entity.clone(),
            process_id: process_id.clone(),
            census_uri: census_uri.clone(),
        },
    );
}

pub fn status_updated(env: &Env, entity: &Address, process_id: &BytesN<32>, status: ProcessStatus) {
    env.events().publish(
        (symbol_short!("status"), process_id.clone()),
        StatusUpdated {
            entity: entity.clone(),
            process_id: process_id.clone(),
            status,
        },
    );
}

pub fn question_index_updated(
    env: &Env,
    entity: &Address,
    process_id: &BytesN<32>,
    question_index: u32,
) {
    env.events().publish(
        (symbol_short!("question"), process_id.clone()),
        QuestionIndexUpdated {
            entity: entity.clone(),
            process_id: process_id.clone(),
            question_index,
        },
    );
}

pub fn census_updated(
    env: &Env,
    entity: &Address,
    process_id: &BytesN<32>,
    census_root: &String,
    census_uri: &String,
) {
    env.events().publish(
        (symbol_short!("census"), process_id.clone()),
        CensusUpdated {
            entity: entity.clone(),
            process_id: process_id.clone(),
            census_root: census_root.clone(),
            census_uri: census_uri.clone(),
        },
    );
}

pub fn results_published(env: &Env, process_id: &BytesN<32>, results: &String) {
    env.events().publish(
        (symbol_short!("results"), process_id.clone()),
        ResultsPublished {
            process_id: process_id.clone(),
            results: results.clone(),
        },
    );
}

pub fn genesis_updated(env: &Env, genesis: &BytesN<32>) {
    env.events()
        .publish((symbol_short!("genesis"),), genesis.clone());
}

pub fn chain_id_updated(env: &Env, chain_id: u32) {
    env.events().publish((symbol_short!("chain_id"),), chain_id);
}

pub fn validator_added(env: &Env, validator: &Address) {
    env.events()
        .publish((symbol_short!("val_add"),), validator.clone());
}

pub fn validator_removed(env: &Env, validator: &Address) {
    env.events()
        .publish((symbol_short!("val_rm"),), validator.clone());
}

pub fn oracle_added(env: &Env, oracle: &Address) {
    env.events()
        .publish((symbol_short!("orc_add"),), oracle.clone());
}

pub fn oracle_removed(env: &Env, oracle: &Address) {
    env.events()
        .publish((symbol_short!("orc_rm"),), oracle.clone());
}

pub fn ownership_transferred(env: &Env, previous_owner: &Address, new_owner: &Address) {
    env.events().publish(
        (symbol_short!("owner"),),
        OwnershipTransferred {
            previous_owner: previous_owner.clone(),
            new_owner: new_owner.clone(),
        },
    );
}
