use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{
    cypher_body, list_payload, CausePath, CausePathParams, DictionaryEntry, DictionaryQuery,
    FlowItem, FlowQueryParams,
};
use crate::config::Config;
use crate::error::{TransportError, TransportResult};
use crate::mock::MockProvider;
use crate::storage::Storage;
use crate::transport::{unwrap_envelope, HttpTransport, Notifier};

/// Where facade calls go.
#[derive(Clone)]
enum Backend {
    Remote(HttpTransport),
    Mock(MockProvider),
}

/// One entry point for every backend operation.
///
/// Methods only shape the request; all error handling lives in the
/// transport. In mock mode the canned envelopes go through the same
/// unwrapping as real responses.
#[derive(Clone)]
pub struct KgApi {
    backend: Backend,
}

impl KgApi {
    /// Facade talking to a live backend.
    pub fn remote(transport: HttpTransport) -> Self {
        Self {
            backend: Backend::Remote(transport),
        }
    }

    /// Facade answering from fixtures.
    pub fn mock(provider: MockProvider) -> Self {
        Self {
            backend: Backend::Mock(provider),
        }
    }

    /// Build the facade selected by `config.api.use_mock`.
    pub fn from_config(
        config: &Config,
        notifier: Arc<dyn Notifier>,
        storage: Arc<dyn Storage>,
    ) -> TransportResult<Self> {
        let api = &config.api;
        if api.use_mock {
            info!(delay_ms = config.mock.delay_ms, "Using mock backend");
            return Ok(Self::mock(MockProvider::new(&config.mock)));
        }

        let transport = HttpTransport::new(&api.base_url, &config.request, notifier)?
            .with_token_storage(storage);
        info!(base_url = %transport.base_url(), "Using remote backend");
        Ok(Self::remote(transport))
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock(_))
    }

    // Files and extraction

    pub async fn health_check(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.health_check().await),
            Backend::Remote(t) => t.get("/health", &[]).await,
        }
    }

    /// Upload a document for extraction.
    pub async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> TransportResult<Value> {
        debug!(file = %file_name, size = bytes.len(), "Uploading file");
        match &self.backend {
            Backend::Mock(m) => from_mock(m.file_accepted(file_name, "uploaded").await),
            Backend::Remote(t) => t.upload("/kg/upload", file_name, bytes).await,
        }
    }

    pub async fn list_files(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.files().await),
            Backend::Remote(t) => t.get("/kg/files", &[]).await,
        }
    }

    pub async fn extract_file(&self, filename: &str) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.file_accepted(filename, "extracted").await),
            Backend::Remote(t) => t.post_empty(&format!("/kg/extract/{}", filename)).await,
        }
    }

    pub async fn build_graph(&self, filename: &str) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.file_accepted(filename, "built").await),
            Backend::Remote(t) => t.post_empty(&format!("/kg/build/{}", filename)).await,
        }
    }

    // Graph browsing

    pub async fn graph_stats(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.graph_stats().await),
            Backend::Remote(t) => t.get("/kg/stats", &[]).await,
        }
    }

    pub async fn list_entities(
        &self,
        entity_type: Option<&str>,
        limit: u32,
    ) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.entities().await),
            Backend::Remote(t) => {
                let mut query = vec![("limit", limit.to_string())];
                if let Some(kind) = entity_type {
                    query.push(("entity_type", kind.to_string()));
                }
                t.get("/kg/entities", &query).await
            }
        }
    }

    pub async fn list_relations(
        &self,
        relation_type: Option<&str>,
        limit: u32,
    ) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.relations().await),
            Backend::Remote(t) => {
                let mut query = vec![("limit", limit.to_string())];
                if let Some(kind) = relation_type {
                    query.push(("relation_type", kind.to_string()));
                }
                t.get("/kg/relations", &query).await
            }
        }
    }

    /// Run a Cypher query on the backend.
    pub async fn query_graph(
        &self,
        cypher: &str,
        parameters: Map<String, Value>,
    ) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.query_result().await),
            Backend::Remote(t) => t.post("/kg/query", &cypher_body(cypher, parameters)).await,
        }
    }

    /// Nodes and links for the graph view.
    pub async fn graph_data(
        &self,
        node_limit: u32,
        include_relations: bool,
    ) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.graph_data().await),
            Backend::Remote(t) => {
                let query = [
                    ("node_limit", node_limit.to_string()),
                    ("include_relations", include_relations.to_string()),
                ];
                t.get("/kg/graph", &query).await
            }
        }
    }

    pub async fn clear_graph(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.graph_cleared().await),
            Backend::Remote(t) => t.delete("/kg/clear").await,
        }
    }

    pub async fn list_products(&self) -> TransportResult<Value> {
        self.query_graph(
            "MATCH (n:Entity {type: \"product\"}) RETURN n.name as name, n.id as id LIMIT 50",
            Map::new(),
        )
        .await
    }

    pub async fn product_components(&self, product_name: &str) -> TransportResult<Value> {
        let mut parameters = Map::new();
        parameters.insert(
            "productName".to_string(),
            Value::String(product_name.to_string()),
        );
        self.query_graph(
            "MATCH (p:Entity {type: \"product\", name: $productName})-[r]-(c:Entity {type: \"component\"}) RETURN c.name as name, c.id as id",
            parameters,
        )
        .await
    }

    // Guided queries

    pub async fn query_flow(&self, params: &FlowQueryParams) -> TransportResult<Vec<FlowItem>> {
        let payload = match &self.backend {
            Backend::Mock(m) => from_mock(m.flow_items().await)?,
            Backend::Remote(t) => {
                let body = json!({
                    "product_name": params.product,
                    "component_name": params.module,
                });
                t.post("/kg/query/flow", &body).await?
            }
        };
        Ok(serde_json::from_value(list_payload(payload, &["items", "test_cases"]))?)
    }

    pub async fn query_cause_path(
        &self,
        params: &CausePathParams,
    ) -> TransportResult<Vec<CausePath>> {
        let payload = match &self.backend {
            Backend::Mock(m) => from_mock(m.cause_paths().await)?,
            Backend::Remote(t) => {
                t.post("/kg/query/cause_path", &json!({"symptom": params.symptom}))
                    .await?
            }
        };
        Ok(serde_json::from_value(list_payload(payload, &["paths", "items"]))?)
    }

    // Dictionary

    pub async fn list_dictionary(&self, query: &DictionaryQuery) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.dictionary(query.page_size).await),
            Backend::Remote(t) => t.get("/kg/dictionary", &query.to_query()).await,
        }
    }

    pub async fn dictionary_categories(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.dictionary_categories().await),
            Backend::Remote(t) => t.get("/kg/dictionary/categories", &[]).await,
        }
    }

    pub async fn dictionary_statistics(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.dictionary_statistics().await),
            Backend::Remote(t) => t.get("/kg/dictionary/statistics", &[]).await,
        }
    }

    pub async fn create_dictionary_entry(
        &self,
        entry: &DictionaryEntry,
    ) -> TransportResult<Value> {
        let body = serde_json::to_value(entry)?;
        match &self.backend {
            Backend::Mock(m) => from_mock(m.dictionary_saved(body).await),
            Backend::Remote(t) => t.post("/kg/dictionary/entries", &body).await,
        }
    }

    pub async fn update_dictionary_entry(
        &self,
        entry_id: &str,
        entry: &DictionaryEntry,
    ) -> TransportResult<Value> {
        let body = serde_json::to_value(entry)?;
        match &self.backend {
            Backend::Mock(m) => from_mock(m.dictionary_saved(body).await),
            Backend::Remote(t) => {
                t.put(&format!("/kg/dictionary/entries/{}", entry_id), &body)
                    .await
            }
        }
    }

    pub async fn delete_dictionary_entry(&self, entry_id: &str) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.dictionary_saved(json!({"id": entry_id})).await),
            Backend::Remote(t) => {
                t.delete(&format!("/kg/dictionary/entries/{}", entry_id))
                    .await
            }
        }
    }

    // System management

    pub async fn system_status(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.system_status().await),
            Backend::Remote(t) => t.get("/system/status", &[]).await,
        }
    }

    pub async fn list_rules(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.rules().await),
            Backend::Remote(t) => t.get("/system/rules", &[]).await,
        }
    }

    pub async fn create_rule(&self, rule: Value) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.create_rule(rule).await),
            Backend::Remote(t) => t.post("/system/rules", &rule).await,
        }
    }

    pub async fn update_rule(&self, rule_id: &str, rule: Value) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.update_rule(rule).await),
            Backend::Remote(t) => t.put(&format!("/system/rules/{}", rule_id), &rule).await,
        }
    }

    pub async fn delete_rule(&self, rule_id: &str) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.delete_rule().await),
            Backend::Remote(t) => t.delete(&format!("/system/rules/{}", rule_id)).await,
        }
    }

    /// Dry-run a rule against sample data.
    pub async fn test_rule(&self, test_data: Value) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.test_rule().await),
            Backend::Remote(t) => t.post("/system/rules/test", &test_data).await,
        }
    }

    pub async fn list_prompts(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.prompts().await),
            Backend::Remote(t) => t.get("/system/prompts", &[]).await,
        }
    }

    pub async fn list_scenarios(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.scenarios().await),
            Backend::Remote(t) => t.get("/system/scenarios", &[]).await,
        }
    }

    pub async fn list_versions(&self) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.versions().await),
            Backend::Remote(t) => t.get("/system/versions", &[]).await,
        }
    }

    pub async fn publish_version(&self, version: Value) -> TransportResult<Value> {
        match &self.backend {
            Backend::Mock(m) => from_mock(m.publish_version().await),
            Backend::Remote(t) => t.post("/system/versions", &version).await,
        }
    }
}

fn from_mock(envelope: Value) -> TransportResult<Value> {
    unwrap_envelope(envelope).map_err(TransportError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::storage::MemoryStorage;
    use crate::transport::TracingNotifier;

    fn config(use_mock: bool) -> Config {
        Config {
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                use_mock,
                token: None,
            },
            storage: crate::config::StorageConfig {
                path: "./unused.db".into(),
                max_connections: 1,
            },
            logging: crate::config::LoggingConfig {
                level: "info".to_string(),
                format: crate::config::LogFormat::Pretty,
            },
            request: Default::default(),
            mock: crate::config::MockConfig { delay_ms: 0 },
        }
    }

    #[test]
    fn test_from_config_selects_backend() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let api = KgApi::from_config(&config(true), Arc::new(TracingNotifier), storage.clone())
            .unwrap();
        assert!(api.is_mock());

        let api = KgApi::from_config(&config(false), Arc::new(TracingNotifier), storage).unwrap();
        assert!(!api.is_mock());
    }

    #[tokio::test]
    async fn test_mock_flow_query_is_typed() {
        let api = KgApi::mock(MockProvider::instant());
        let items = api
            .query_flow(&FlowQueryParams::new("P1", "M1"))
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "TC-001");
        assert_eq!(items[2].priority, None);
    }

    #[tokio::test]
    async fn test_mock_cause_path_is_typed() {
        let api = KgApi::mock(MockProvider::instant());
        let paths = api
            .query_cause_path(&CausePathParams::new("屏幕闪烁"))
            .await
            .unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes.len(), 4);
        assert_eq!(paths[0].relations[1].relation_type, "HAS_ROOTCAUSE");
    }
}
