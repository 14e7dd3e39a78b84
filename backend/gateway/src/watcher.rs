//! Long-running background task that tails registry events from the
//! Soroban RPC and logs them.
//!
//! The watcher keeps its position in memory only. On restart it begins
//! again from `START_LEDGER`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::events::RegistryEvent;
use crate::rpc::{self, PageStart};

pub struct WatcherState {
    pub config: Config,
    pub client: Client,
    pub cancel: CancellationToken,
}

/// Run the watch loop until `state.cancel` fires.
pub async fn run(state: Arc<WatcherState>) {
    info!("Watcher starting — contract: {}", state.config.contract_id);

    let mut position = PageStart::Ledger(state.config.start_ledger);

    loop {
        match poll_once(&state, &position).await {
            Ok(Some(next)) => position = next,
            Ok(None) => break,
            Err(e) => error!("Watcher poll error: {e}"),
        }

        tokio::select! {
            _ = state.cancel.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Watcher stopped");
}

/// Perform a single poll iteration and return where the next one starts.
///
/// `Ok(None)` means the watcher was cancelled mid-request.
async fn poll_once(
    state: &WatcherState,
    position: &PageStart,
) -> crate::errors::Result<Option<PageStart>> {
    let page = match rpc::fetch_events(
        &state.client,
        &state.config.rpc_url,
        &state.config.contract_id,
        position,
        state.config.events_per_page,
        &state.cancel,
    )
    .await?
    {
        Some(page) => page,
        None => return Ok(None),
    };

    for event in rpc::decode_events(&page.events, &state.config.contract_id) {
        log_event(&event);
    }

    Ok(Some(next_position(position, page.cursor, page.latest_ledger)))
}

/// Prefer the pagination cursor; otherwise move to the latest known ledger,
/// never backwards.
fn next_position(current: &PageStart, cursor: Option<String>, latest_ledger: Option<u64>) -> PageStart {
    if let Some(cursor) = cursor {
        return PageStart::Cursor(cursor);
    }
    match (current, latest_ledger) {
        (PageStart::Ledger(start), Some(latest)) => PageStart::Ledger((latest as u32).max(*start)),
        (_, Some(latest)) => PageStart::Ledger(latest as u32),
        (other, None) => other.clone(),
    }
}

fn log_event(event: &RegistryEvent) {
    info!(
        event_type = %event.event_type,
        process_id = event.process_id.as_deref().unwrap_or("-"),
        actor = event.actor.as_deref().unwrap_or("-"),
        detail = event.detail.as_deref().unwrap_or("-"),
        ledger = event.ledger,
        "registry event"
    );
}
