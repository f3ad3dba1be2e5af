//! TTL cache with single-flight refresh over a `GraphBuilder`
//!
//! The cache owns one slot that moves through
//! `Empty -> Pending -> Ready -> (expired) Pending -> ...`; a failed
//! refresh drops the slot back to `Empty`. While a refresh is pending,
//! the slot holds a shared handle to it so every caller awaits the same
//! computation instead of starting another.

use crate::{GraphBuilder, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use kgraph_core::Graph;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Graph>>>>;

enum Slot {
    Empty,
    Pending {
        generation: u64,
        started: Instant,
        fetch: SharedFetch,
    },
    Ready {
        timestamp: Instant,
        graph: Arc<Graph>,
    },
}

struct State {
    slot: Slot,
    generation: u64,
}

/// Serves the graph, refreshing it on demand once it is older than `max_age`
pub struct GraphCache {
    builder: GraphBuilder,
    max_age: Duration,
    state: Mutex<State>,
}

impl GraphCache {
    pub fn new(builder: GraphBuilder, max_age: Duration) -> Self {
        Self {
            builder,
            max_age,
            state: Mutex::new(State {
                slot: Slot::Empty,
                generation: 0,
            }),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Return the cached graph, or join/start a refresh if it is stale
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Arc<Graph>> {
        let (generation, started, fetch) = {
            let mut state = self.lock();
            let joined = match &state.slot {
                Slot::Ready { timestamp, graph } if timestamp.elapsed() < self.max_age => {
                    return Ok(graph.clone());
                }
                Slot::Pending {
                    generation,
                    started,
                    fetch,
                } => Some((*generation, *started, fetch.clone())),
                Slot::Empty | Slot::Ready { .. } => None,
            };

            match joined {
                Some(joined) => {
                    debug!(generation = joined.0, "Joining in-flight refresh");
                    joined
                }
                None => self.start_refresh(&mut state),
            }
        };

        let outcome = fetch.await;
        self.settle(generation, started, &outcome);
        outcome
    }

    fn start_refresh(&self, state: &mut State) -> (u64, Instant, SharedFetch) {
        state.generation += 1;
        let generation = state.generation;
        let started = Instant::now();

        let builder = self.builder.clone();
        let fetch = async move { builder.fetch().await.map(Arc::new) }
            .boxed()
            .shared();

        debug!(generation, "Starting refresh");
        state.slot = Slot::Pending {
            generation,
            started,
            fetch: fetch.clone(),
        };
        (generation, started, fetch)
    }

    /// Drop the cached graph; the next `get` refetches
    pub fn invalidate(&self) {
        self.lock().slot = Slot::Empty;
    }

    /// Whether a refresh is currently in flight
    pub fn is_refreshing(&self) -> bool {
        matches!(self.lock().slot, Slot::Pending { .. })
    }

    /// Replace the pending slot with its outcome, once
    fn settle(&self, generation: u64, started: Instant, outcome: &Result<Arc<Graph>>) {
        let mut state = self.lock();
        let current = matches!(state.slot, Slot::Pending { generation: g, .. } if g == generation);
        if !current {
            return;
        }

        state.slot = match outcome {
            Ok(graph) => Slot::Ready {
                timestamp: started,
                graph: graph.clone(),
            },
            Err(_) => Slot::Empty,
        };
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
