//! # Query Engine Module
//!
//! ## Purpose
//! Facade tying the classifier, local matcher, remote dispatcher and
//! composer into one keystroke-driven unit. Each input is classified
//! synchronously; remote candidates additionally schedule a debounced
//! match request whose result arrives later through the dispatcher.
//!
//! ## Input/Output Specification
//! - **Input**: Raw query strings, one per keystroke; pages of records
//! - **Output**: `Composition` snapshots and remote-update notifications
//! - **Ordering**: composition always reflects the classification of the
//!   latest input; remote-derived highlights may lag by the debounce delay
//!   plus round-trip time and never regress to a superseded query's result

use crate::classify::{classify_with, QueryClass};
use crate::compose::{compose_results, Composition};
use crate::config::EngineConfig;
use crate::dispatch::{MatchUpdate, RemoteDispatcher, RemoteMatcher};
use crate::{RecordId, SearchRecord};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

/// Engine-internal view of the current query, recreated per keystroke.
#[derive(Debug, Clone)]
pub struct QueryState {
    /// Trimmed input text
    pub raw: String,
    /// Decision class of the input
    pub class: QueryClass,
    /// Whether a remote request for this input is outstanding
    pub pending: bool,
    /// Ids confirmed by the remote matcher for the current input
    pub match_ids: HashSet<RecordId>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            raw: String::new(),
            class: QueryClass::Empty,
            pending: false,
            match_ids: HashSet::new(),
        }
    }
}

struct InputSlot {
    raw: String,
    class: QueryClass,
}

/// Keystroke-driven query engine over one history list.
pub struct QueryEngine<M: RemoteMatcher> {
    config: EngineConfig,
    dispatcher: RemoteDispatcher<M>,
    input: Mutex<InputSlot>,
}

impl<M: RemoteMatcher> QueryEngine<M> {
    /// Create an engine dispatching remote candidates to `matcher`.
    pub fn new(matcher: Arc<M>, config: EngineConfig) -> Self {
        let dispatcher = RemoteDispatcher::new(matcher, config.debounce());
        Self {
            config,
            dispatcher,
            input: Mutex::new(InputSlot {
                raw: String::new(),
                class: QueryClass::Empty,
            }),
        }
    }

    /// Process one keystroke. Classification is synchronous; remote
    /// candidates schedule a debounced request, every other class cancels
    /// and clears any previous remote state.
    pub fn handle_input(&self, raw: &str) -> QueryClass {
        let trimmed = raw.trim();
        let class = classify_with(
            trimmed,
            self.config.tribunal_keywords.iter().map(String::as_str),
        );

        {
            let mut input = self.input.lock();
            input.raw = trimmed.to_string();
            input.class = class;
        }

        if class.is_remote() {
            self.dispatcher.submit(trimmed);
        } else {
            self.dispatcher.reset();
        }

        class
    }

    /// Snapshot the current query state, joining the stored input with the
    /// dispatcher's pending/match state.
    pub fn query_state(&self) -> QueryState {
        let (raw, class) = {
            let input = self.input.lock();
            (input.raw.clone(), input.class)
        };
        let match_state = self.dispatcher.state();
        QueryState {
            raw,
            class,
            pending: match_state.pending,
            match_ids: match_state.match_ids,
        }
    }

    /// Compose the visible list and highlight set for the given records.
    pub fn compose(&self, records: &[SearchRecord]) -> Composition {
        compose_results(records, &self.query_state())
    }

    /// The query to propagate into a record's detail view, present only
    /// when the current input classified as a remote candidate.
    pub fn highlight_query(&self) -> Option<String> {
        let input = self.input.lock();
        input.class.is_remote().then(|| input.raw.clone())
    }

    /// Failure text from the last remote resolution, for optional surfacing.
    pub fn last_remote_error(&self) -> Option<String> {
        self.dispatcher.state().last_error
    }

    /// Subscribe to asynchronous highlight-set updates.
    pub fn subscribe(&self) -> watch::Receiver<MatchUpdate> {
        self.dispatcher.subscribe()
    }

    /// Forget all query and highlight state (e.g. after the history is
    /// cleared upstream, which invalidates cached highlights).
    pub fn clear(&self) {
        {
            let mut input = self.input.lock();
            input.raw = String::new();
            input.class = QueryClass::Empty;
        }
        self.dispatcher.reset();
    }
}
