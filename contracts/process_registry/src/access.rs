//! # Access control
//!
//! Three kinds of caller are recognised:
//!
//! | Caller  | Source of truth                    | May                                   |
//! |---------|------------------------------------|---------------------------------------|
//! | Owner   | `DataKey::Owner`                   | genesis, chain id, validator/oracle sets, ownership |
//! | Entity  | `ProcessConfig::entity`            | status, question index, census of its own processes |
//! | Oracle  | membership in `DataKey::Oracles`   | publish results                       |
//!
//! Every guard calls `require_auth()` on the supplied address before comparing
//! it with the stored identity, so a caller can never claim an identity it
//! cannot sign for.
//!
//! The validator and oracle sets share one add/remove discipline: `add`
//! rejects duplicates, `remove` takes the index *and* the address the caller
//! believes lives there, and only removes on an exact match (swap with the
//! last element, then shrink).

use soroban_sdk::{panic_with_error, Address, Env, Vec};

use crate::storage::{self, AddressList};
use crate::types::ProcessConfig;
use crate::Error;

/// Panic with `NotOwner` unless `caller` is the registry owner.
pub fn require_owner(env: &Env, caller: &Address) -> Address {
    caller.require_auth();
    let owner = storage::get_owner(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
    if owner != *caller {
        panic_with_error!(env, Error::NotOwner);
    }
    owner
}

/// Panic with `NotEntity` unless `caller` created the process.
pub fn require_entity(env: &Env, caller: &Address, config: &ProcessConfig) {
    caller.require_auth();
    if config.entity != *caller {
        panic_with_error!(env, Error::NotEntity);
    }
}

/// Panic with `NotOracle` unless `caller` is in the oracle set.
///
/// Linear scan; the set is small and owner-managed.
pub fn require_oracle(env: &Env, caller: &Address) {
    caller.require_auth();
    if !storage::load_list(env, AddressList::Oracles).contains(caller) {
        panic_with_error!(env, Error::NotOracle);
    }
}

pub fn is_member(env: &Env, list: AddressList, address: &Address) -> bool {
    storage::load_list(env, list).contains(address)
}

/// Append `address` to `list`, rejecting duplicates.
pub fn add_member(env: &Env, list: AddressList, address: &Address) {
    let mut items = storage::load_list(env, list);
    if items.contains(address) {
        panic_with_error!(env, Error::DuplicateEntry);
    }
    items.push_back(address.clone());
    storage::save_list(env, list, &items);
}

/// Remove the entry at `index`, which must currently hold `address`.
///
/// The last element is moved into the freed slot; order is not preserved.
pub fn remove_member(env: &Env, list: AddressList, index: u32, address: &Address) {
    let mut items = storage::load_list(env, list);
    swap_remove_checked(env, &mut items, index, address);
    storage::save_list(env, list, &items);
}

fn swap_remove_checked(env: &Env, items: &mut Vec<Address>, index: u32, address: &Address) {
    match items.get(index) {
        Some(current) if current == *address => {}
        _ => panic_with_error!(env, Error::EntryMismatch),
    }
    let last = items.len() - 1;
    if index != last {
        let moved = items.get_unchecked(last);
        items.set(index, moved);
    }
    items.pop_back();
}
