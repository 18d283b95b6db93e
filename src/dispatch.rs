//! # Debounced Remote Dispatcher Module
//!
//! ## Purpose
//! Owns the lifecycle of remote match requests: debounce timing, timer
//! cancellation on newer input, and discarding of responses that arrive for
//! a superseded query.
//!
//! ## Input/Output Specification
//! - **Input**: Query strings routed here by the classifier (remote
//!   candidates only)
//! - **Output**: The last applied match-id set, plus change notifications
//!   over a watch channel
//! - **Invariant**: At most one request is logically active; each carries
//!   the generation it was created under and is applied only if that
//!   generation is still the latest
//!
//! A resolution with zero ids is still applied (an empty set is data, not
//! absence of data). Transport failure is logged, recorded for optional
//! surfacing and applied as an empty set; it never reaches the render path.

use crate::errors::Result;
use crate::RecordId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// External full-text matcher resolving a query to the ids of matching
/// records. Implemented by the backend client; tests substitute their own.
#[async_trait]
pub trait RemoteMatcher: Send + Sync + 'static {
    async fn match_ids(&self, query: &str) -> Result<HashSet<RecordId>>;
}

/// Snapshot of the dispatcher's externally visible state.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    /// Whether a request (timer or network call) is outstanding
    pub pending: bool,
    /// Ids applied by the last non-superseded resolution
    pub match_ids: HashSet<RecordId>,
    /// Human-readable failure from the last resolution, if any
    pub last_error: Option<String>,
}

/// Change notification delivered to subscribers when a resolution lands.
#[derive(Debug, Clone, Default)]
pub struct MatchUpdate {
    /// Query the resolution belonged to
    pub query: String,
    /// Applied match ids (empty on failure or no matches)
    pub match_ids: HashSet<RecordId>,
    /// Failure text, for optional user-visible surfacing
    pub error: Option<String>,
}

struct DispatchInner {
    generation: u64,
    pending: bool,
    match_ids: HashSet<RecordId>,
    last_error: Option<String>,
    timer: Option<JoinHandle<()>>,
}

/// Debounced, cancellable-by-superseding remote match dispatcher.
pub struct RemoteDispatcher<M: RemoteMatcher> {
    matcher: Arc<M>,
    delay: Duration,
    inner: Arc<Mutex<DispatchInner>>,
    update_tx: watch::Sender<MatchUpdate>,
}

impl<M: RemoteMatcher> RemoteDispatcher<M> {
    /// Create a dispatcher over the given matcher with a fixed debounce delay.
    pub fn new(matcher: Arc<M>, delay: Duration) -> Self {
        let (update_tx, _) = watch::channel(MatchUpdate::default());
        Self {
            matcher,
            delay,
            inner: Arc::new(Mutex::new(DispatchInner {
                generation: 0,
                pending: false,
                match_ids: HashSet::new(),
                last_error: None,
                timer: None,
            })),
            update_tx,
        }
    }

    /// Schedule a remote match for `query` after the debounce delay.
    ///
    /// Any not-yet-fired timer is cancelled; the previously applied match
    /// set stays in place until the new request resolves, so the UI never
    /// loses its highlights to mere typing.
    pub fn submit(&self, query: &str) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.pending = true;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }

        let generation = inner.generation;
        let query = query.to_string();
        let matcher = Arc::clone(&self.matcher);
        let state = Arc::clone(&self.inner);
        let update_tx = self.update_tx.clone();
        let delay = self.delay;

        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            tracing::debug!(query = %query, generation, "dispatching remote match");
            let outcome = matcher.match_ids(&query).await;

            let mut inner = state.lock();
            if inner.generation != generation {
                // Superseded by newer input; drop the result on the floor.
                tracing::debug!(query = %query, generation, "discarding superseded match result");
                return;
            }

            inner.pending = false;
            inner.timer = None;
            match outcome {
                Ok(ids) => {
                    tracing::debug!(query = %query, matches = ids.len(), "remote match applied");
                    inner.match_ids = ids.clone();
                    inner.last_error = None;
                    let _ = update_tx.send(MatchUpdate {
                        query,
                        match_ids: ids,
                        error: None,
                    });
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "remote match failed");
                    inner.match_ids = HashSet::new();
                    inner.last_error = Some(err.to_string());
                    let _ = update_tx.send(MatchUpdate {
                        query,
                        match_ids: HashSet::new(),
                        error: Some(err.to_string()),
                    });
                }
            }
        }));
    }

    /// Invalidate any in-flight request and clear the applied match set.
    /// Called whenever classification leaves the remote-candidate class.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.pending = false;
        inner.match_ids = HashSet::new();
        inner.last_error = None;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
    }

    /// Snapshot the current externally visible state.
    pub fn state(&self) -> MatchState {
        let inner = self.inner.lock();
        MatchState {
            pending: inner.pending,
            match_ids: inner.match_ids.clone(),
            last_error: inner.last_error.clone(),
        }
    }

    /// Subscribe to resolution notifications.
    pub fn subscribe(&self) -> watch::Receiver<MatchUpdate> {
        self.update_tx.subscribe()
    }
}
