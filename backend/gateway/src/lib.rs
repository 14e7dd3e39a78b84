//! Off-chain companion to the process registry contract.
//!
//! * [`params`] — grouped positional tuples ↔ named structures.
//! * [`process_id`] — compute process ids before submitting `create`.
//! * [`rpc`] / [`events`] — read and decode registry events.
//! * [`api`] / [`watcher`] — the pieces the `registry-gateway` binary runs.

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod params;
pub mod process_id;
pub mod rpc;
pub mod watcher;

pub use errors::{GatewayError, Result};
