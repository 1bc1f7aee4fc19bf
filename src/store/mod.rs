//! Query store: recent query parameters and current results.
//!
//! Holds, per query kind (flow and cause path), a most-recent-first history
//! of parameter tuples plus the current result list, loading flag and error
//! message. History is persisted to [`Storage`] on every change and reloaded
//! by [`QueryStore::load`]; everything else lives for the session only.
//!
//! State transitions keep these rules:
//!
//! - `set_*_loading(true)` clears the error
//! - `set_*_result` clears the error
//! - `set_*_error` clears the loading flag
//!
//! Async completions can arrive out of order. Callers start a query with
//! `submit_*_query`, which hands out a [`RequestTicket`], and apply the
//! outcome through `apply_*_outcome`, which drops anything but the latest
//! ticket's outcome.

mod history;

pub use history::{push_front_unique, HISTORY_LIMIT};

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::api::{CausePath, CausePathParams, FlowItem, FlowQueryParams};
use crate::storage::{Storage, RECENT_CAUSE_QUERIES_KEY, RECENT_FLOW_QUERIES_KEY};
use history::{load_history, save_history};

/// The two kinds of guided query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Flow,
    Cause,
}

impl QueryKind {
    /// Storage key of this kind's history list.
    pub fn storage_key(self) -> &'static str {
        match self {
            QueryKind::Flow => RECENT_FLOW_QUERIES_KEY,
            QueryKind::Cause => RECENT_CAUSE_QUERIES_KEY,
        }
    }
}

/// Everything the store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryState {
    pub recent_flow_queries: Vec<FlowQueryParams>,
    pub recent_cause_queries: Vec<CausePathParams>,
    pub current_flow_result: Vec<FlowItem>,
    pub current_cause_result: Vec<CausePath>,
    pub flow_loading: bool,
    pub cause_loading: bool,
    pub flow_error: Option<String>,
    pub cause_error: Option<String>,
}

impl QueryState {
    pub fn has_flow_results(&self) -> bool {
        !self.current_flow_result.is_empty()
    }

    pub fn has_cause_results(&self) -> bool {
        !self.current_cause_result.is_empty()
    }
}

/// Identifies one in-flight query of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    kind: QueryKind,
    seq: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Shared query state for one application session.
pub struct QueryStore {
    state: watch::Sender<QueryState>,
    storage: Arc<dyn Storage>,
    flow_seq: AtomicU64,
    cause_seq: AtomicU64,
    flow_persist: Mutex<()>,
    cause_persist: Mutex<()>,
}

impl QueryStore {
    /// Create a store, restoring history from `storage`.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let state = QueryState {
            recent_flow_queries: load_history(storage.as_ref(), RECENT_FLOW_QUERIES_KEY).await,
            recent_cause_queries: load_history(storage.as_ref(), RECENT_CAUSE_QUERIES_KEY).await,
            ..Default::default()
        };

        debug!(
            flow_history = state.recent_flow_queries.len(),
            cause_history = state.recent_cause_queries.len(),
            "Query store loaded"
        );

        let (tx, _) = watch::channel(state);
        Self {
            state: tx,
            storage,
            flow_seq: AtomicU64::new(0),
            cause_seq: AtomicU64::new(0),
            flow_persist: Mutex::new(()),
            cause_persist: Mutex::new(()),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Receiver that is marked changed on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    // History

    /// Record a flow query at the front of the history and persist it.
    pub async fn add_flow_query(&self, params: FlowQueryParams) {
        self.state.send_modify(|s| {
            push_front_unique(&mut s.recent_flow_queries, params, HISTORY_LIMIT);
        });
        self.persist_history(QueryKind::Flow).await;
    }

    /// Record a cause path query at the front of the history and persist it.
    pub async fn add_cause_query(&self, params: CausePathParams) {
        self.state.send_modify(|s| {
            push_front_unique(&mut s.recent_cause_queries, params, HISTORY_LIMIT);
        });
        self.persist_history(QueryKind::Cause).await;
    }

    /// Start a flow query: record it in history, issue its ticket and set
    /// loading in one state change, then persist the history.
    ///
    /// Tickets therefore follow the order in which queries entered the
    /// history, however long each persist takes.
    pub async fn submit_flow_query(&self, params: FlowQueryParams) -> RequestTicket {
        let mut ticket = RequestTicket {
            kind: QueryKind::Flow,
            seq: 0,
        };
        self.state.send_modify(|s| {
            push_front_unique(&mut s.recent_flow_queries, params, HISTORY_LIMIT);
            ticket = self.begin_request(QueryKind::Flow);
            s.flow_loading = true;
            s.flow_error = None;
        });
        self.persist_history(QueryKind::Flow).await;
        ticket
    }

    /// Start a cause path query. See [`QueryStore::submit_flow_query`].
    pub async fn submit_cause_query(&self, params: CausePathParams) -> RequestTicket {
        let mut ticket = RequestTicket {
            kind: QueryKind::Cause,
            seq: 0,
        };
        self.state.send_modify(|s| {
            push_front_unique(&mut s.recent_cause_queries, params, HISTORY_LIMIT);
            ticket = self.begin_request(QueryKind::Cause);
            s.cause_loading = true;
            s.cause_error = None;
        });
        self.persist_history(QueryKind::Cause).await;
        ticket
    }

    /// Empty one history list and persist the empty list.
    pub async fn clear_history(&self, kind: QueryKind) {
        self.state.send_modify(|s| match kind {
            QueryKind::Flow => s.recent_flow_queries.clear(),
            QueryKind::Cause => s.recent_cause_queries.clear(),
        });
        self.persist_history(kind).await;
    }

    /// Write the current history list of `kind`.
    ///
    /// Writes of one kind run one at a time and each reads the list only
    /// once it holds the lock, so the last write always carries the latest
    /// list.
    async fn persist_history(&self, kind: QueryKind) {
        let lock = match kind {
            QueryKind::Flow => &self.flow_persist,
            QueryKind::Cause => &self.cause_persist,
        };
        let _guard = lock.lock().await;

        match kind {
            QueryKind::Flow => {
                let list = self.recent_flow_queries();
                save_history(self.storage.as_ref(), kind.storage_key(), &list).await;
            }
            QueryKind::Cause => {
                let list = self.recent_cause_queries();
                save_history(self.storage.as_ref(), kind.storage_key(), &list).await;
            }
        }
    }

    pub fn recent_flow_queries(&self) -> Vec<FlowQueryParams> {
        self.state.borrow().recent_flow_queries.clone()
    }

    pub fn recent_cause_queries(&self) -> Vec<CausePathParams> {
        self.state.borrow().recent_cause_queries.clone()
    }

    // Flow results

    pub fn set_flow_result(&self, result: Vec<FlowItem>) {
        self.state.send_modify(|s| {
            s.current_flow_result = result;
            s.flow_error = None;
        });
    }

    pub fn set_flow_loading(&self, loading: bool) {
        self.state.send_modify(|s| {
            s.flow_loading = loading;
            if loading {
                s.flow_error = None;
            }
        });
    }

    pub fn set_flow_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.state.send_modify(|s| {
            s.flow_error = Some(error);
            s.flow_loading = false;
        });
    }

    pub fn clear_flow_results(&self) {
        self.state.send_modify(|s| {
            s.current_flow_result.clear();
            s.flow_error = None;
        });
    }

    pub fn has_flow_results(&self) -> bool {
        self.state.borrow().has_flow_results()
    }

    // Cause path results

    pub fn set_cause_result(&self, result: Vec<CausePath>) {
        self.state.send_modify(|s| {
            s.current_cause_result = result;
            s.cause_error = None;
        });
    }

    pub fn set_cause_loading(&self, loading: bool) {
        self.state.send_modify(|s| {
            s.cause_loading = loading;
            if loading {
                s.cause_error = None;
            }
        });
    }

    pub fn set_cause_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.state.send_modify(|s| {
            s.cause_error = Some(error);
            s.cause_loading = false;
        });
    }

    pub fn clear_cause_results(&self) {
        self.state.send_modify(|s| {
            s.current_cause_result.clear();
            s.cause_error = None;
        });
    }

    pub fn has_cause_results(&self) -> bool {
        self.state.borrow().has_cause_results()
    }

    // Request sequencing

    /// Issue the next ticket for `kind`, superseding all earlier ones.
    pub fn begin_request(&self, kind: QueryKind) -> RequestTicket {
        let seq = self.counter(kind).fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket { kind, seq }
    }

    /// Whether no newer ticket of the same kind has been issued.
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.counter(ticket.kind).load(Ordering::SeqCst) == ticket.seq
    }

    /// Apply a flow outcome if `ticket` is still current. A result also
    /// ends loading. Returns whether the outcome was applied.
    pub fn apply_flow_outcome(
        &self,
        ticket: RequestTicket,
        outcome: Result<Vec<FlowItem>, String>,
    ) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        match outcome {
            Ok(items) => self.state.send_modify(|s| {
                s.current_flow_result = items;
                s.flow_error = None;
                s.flow_loading = false;
            }),
            Err(message) => self.set_flow_error(message),
        }
        true
    }

    /// Apply a cause path outcome if `ticket` is still current. A result
    /// also ends loading. Returns whether the outcome was applied.
    pub fn apply_cause_outcome(
        &self,
        ticket: RequestTicket,
        outcome: Result<Vec<CausePath>, String>,
    ) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        match outcome {
            Ok(paths) => self.state.send_modify(|s| {
                s.current_cause_result = paths;
                s.cause_error = None;
                s.cause_loading = false;
            }),
            Err(message) => self.set_cause_error(message),
        }
        true
    }

    fn accepts(&self, ticket: RequestTicket) -> bool {
        let latest = self.is_latest(ticket);
        if !latest {
            debug!(
                kind = ?ticket.kind,
                seq = ticket.seq,
                "Discarding stale query outcome"
            );
        }
        latest
    }

    fn counter(&self, kind: QueryKind) -> &AtomicU64 {
        match kind {
            QueryKind::Flow => &self.flow_seq,
            QueryKind::Cause => &self.cause_seq,
        }
    }
}
