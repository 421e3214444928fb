//! Read-only listings built by probing event ids.
//!
//! The POAP contract has no "list events" or "event count" call, so the
//! listings ask for ids `1..=PROBE_LIMIT` one at a time and stop at the
//! first miss. Anything past the limit is never shown.

use contract_bindings::{
    AccountAddress,
    ContractTransport,
    EventPublicDetails,
    PoapClient,
};
use std::collections::HashMap;
use tokio::{
    sync::mpsc,
    task::AbortHandle,
};
use tracing::debug;

pub const PROBE_LIMIT: u32 = 10;

/// Every event from id 1 up to the first id that fails to load.
pub async fn list_events<T: ContractTransport>(client: &PoapClient<T>) -> Vec<EventPublicDetails> {
    let mut events = Vec::new();
    for id in 1..=PROBE_LIMIT {
        match client.get_event(id).await {
            Ok(tx) => events.push(tx.into_result()),
            Err(err) => {
                debug!(id, error = %err, "event probe stopped");
                break;
            }
        }
    }
    events
}

/// The events `owner` has claimed, probing the same id range. A failed
/// claim check or event lookup ends the listing.
pub async fn my_poaps<T: ContractTransport>(
    client: &PoapClient<T>,
    owner: AccountAddress,
) -> Vec<EventPublicDetails> {
    let mut owned = Vec::new();
    for id in 1..=PROBE_LIMIT {
        let claimed = match client.has_claimed(id, owner).await {
            Ok(tx) => tx.into_result(),
            Err(err) => {
                debug!(id, error = %err, "claim probe stopped");
                break;
            }
        };
        if !claimed {
            continue;
        }
        match client.get_event(id).await {
            Ok(tx) => owned.push(tx.into_result()),
            Err(err) => {
                debug!(id, error = %err, "claimed event lookup stopped");
                break;
            }
        }
    }
    owned
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Events,
    MyPoaps,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewUpdate {
    pub kind: ViewKind,
    pub generation: u64,
    pub events: Vec<EventPublicDetails>,
}

/// Background refreshes, at most one per view. Starting a refresh aborts
/// the previous one for the same view, and updates carry a generation so a
/// result that raced its own abort can be told apart from the current one.
pub struct ViewTasks {
    running: HashMap<ViewKind, (u64, AbortHandle)>,
    next_generation: u64,
    tx: mpsc::UnboundedSender<ViewUpdate>,
}

impl ViewTasks {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                running: HashMap::new(),
                next_generation: 1,
                tx,
            },
            rx,
        )
    }

    pub fn spawn_refresh<T: ContractTransport>(
        &mut self,
        kind: ViewKind,
        client: PoapClient<T>,
        owner: AccountAddress,
    ) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let events = match kind {
                ViewKind::Events => list_events(&client).await,
                ViewKind::MyPoaps => my_poaps(&client, owner).await,
            };
            let _ = tx.send(ViewUpdate {
                kind,
                generation,
                events,
            });
        });
        if let Some((_, previous)) = self
            .running
            .insert(kind, (generation, handle.abort_handle()))
        {
            previous.abort();
        }
        generation
    }

    /// Whether `update` belongs to the newest refresh of its view.
    pub fn is_current(&self, update: &ViewUpdate) -> bool {
        self.running
            .get(&update.kind)
            .is_some_and(|(generation, _)| *generation == update.generation)
    }

    pub fn abort_all(&mut self) {
        for (_, (_, handle)) in self.running.drain() {
            handle.abort();
        }
    }
}

impl Drop for ViewTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}
