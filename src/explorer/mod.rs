//! Drives guided queries through the API and the query store.
//!
//! This is the layer the views sit on: it records the query in history,
//! flips the loading flag, calls the backend, and applies the outcome only
//! when no newer query of the same kind has been started meanwhile.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::api::{CausePath, CausePathParams, FlowItem, FlowQueryParams, KgApi};
use crate::error::TransportResult;
use crate::store::QueryStore;

/// Guided query runner bound to one store.
#[derive(Clone)]
pub struct Explorer {
    api: KgApi,
    store: Arc<QueryStore>,
}

impl Explorer {
    pub fn new(api: KgApi, store: Arc<QueryStore>) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &KgApi {
        &self.api
    }

    pub fn store(&self) -> &Arc<QueryStore> {
        &self.store
    }

    /// Look up the flow items for a product/module pair.
    ///
    /// The returned result is this call's own outcome; the store only
    /// reflects it if the call was still the latest flow query.
    pub async fn search_flow(&self, params: FlowQueryParams) -> TransportResult<Vec<FlowItem>> {
        let start = Instant::now();
        let ticket = self.store.submit_flow_query(params.clone()).await;
        debug!(seq = ticket.seq(), product = %params.product, module = %params.module, "Flow query started");

        let result = self.api.query_flow(&params).await;
        let outcome = match &result {
            Ok(items) => Ok(items.clone()),
            Err(e) => Err(e.to_string()),
        };
        let applied = self.store.apply_flow_outcome(ticket, outcome);

        info!(
            seq = ticket.seq(),
            applied,
            ok = result.is_ok(),
            latency_ms = start.elapsed().as_millis(),
            "Flow query finished"
        );
        result
    }

    /// Look up cause paths for a symptom.
    pub async fn search_cause_path(
        &self,
        params: CausePathParams,
    ) -> TransportResult<Vec<CausePath>> {
        let start = Instant::now();
        let ticket = self.store.submit_cause_query(params.clone()).await;
        debug!(seq = ticket.seq(), symptom = %params.symptom, "Cause path query started");

        let result = self.api.query_cause_path(&params).await;
        let outcome = match &result {
            Ok(paths) => Ok(paths.clone()),
            Err(e) => Err(e.to_string()),
        };
        let applied = self.store.apply_cause_outcome(ticket, outcome);

        info!(
            seq = ticket.seq(),
            applied,
            ok = result.is_ok(),
            latency_ms = start.elapsed().as_millis(),
            "Cause path query finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use crate::storage::MemoryStorage;

    async fn explorer() -> Explorer {
        let store = QueryStore::load(Arc::new(MemoryStorage::new())).await;
        Explorer::new(KgApi::mock(MockProvider::instant()), Arc::new(store))
    }

    #[tokio::test]
    async fn test_search_flow_updates_store() {
        let explorer = explorer().await;
        let items = explorer
            .search_flow(FlowQueryParams::new("P1", "M1"))
            .await
            .unwrap();

        let state = explorer.store().snapshot();
        assert_eq!(state.current_flow_result, items);
        assert!(!state.flow_loading);
        assert_eq!(state.recent_flow_queries, vec![FlowQueryParams::new("P1", "M1")]);
    }

    #[tokio::test]
    async fn test_search_cause_path_updates_store() {
        let explorer = explorer().await;
        explorer
            .search_cause_path(CausePathParams::new("屏幕闪烁"))
            .await
            .unwrap();

        let state = explorer.store().snapshot();
        assert!(state.has_cause_results());
        assert!(!state.cause_loading);
        assert_eq!(state.cause_error, None);
    }
}
