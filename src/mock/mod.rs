//! Offline stand-in for the backend.
//!
//! Each operation waits for an artificial delay and returns the success
//! envelope the real backend would send. Nothing is stored: creating a rule
//! does not make it appear in the next listing.

mod fixtures;

use chrono::Utc;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::MockConfig;

/// Delay used by the health check, which the UI polls.
const HEALTH_DELAY: Duration = Duration::from_millis(200);

/// Returns canned envelopes after a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new(config: &MockConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Provider that answers without waiting.
    pub fn instant() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait `delay` (or the default delay) and hand back `payload`.
    pub async fn respond(&self, payload: Value, delay: Option<Duration>) -> Value {
        let delay = delay.unwrap_or(self.delay);
        debug!(delay_ms = delay.as_millis(), "Mock response");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        payload
    }

    pub async fn health_check(&self) -> Value {
        let delay = self.delay.min(HEALTH_DELAY);
        self.respond(
            json!({
                "success": true,
                "status": "healthy",
                "timestamp": Utc::now().to_rfc3339(),
            }),
            Some(delay),
        )
        .await
    }

    pub async fn system_status(&self) -> Value {
        self.respond(fixtures::system_status(), None).await
    }

    pub async fn rules(&self) -> Value {
        self.respond(fixtures::rules(), None).await
    }

    pub async fn create_rule(&self, rule: Value) -> Value {
        let mut rule = rule;
        if let Value::Object(obj) = &mut rule {
            obj.insert(
                "rule_id".to_string(),
                Value::String(format!("RULE_{}", Utc::now().timestamp_millis())),
            );
        }
        self.respond(
            json!({"success": true, "message": "规则创建成功", "data": rule}),
            None,
        )
        .await
    }

    pub async fn update_rule(&self, rule: Value) -> Value {
        self.respond(
            json!({"success": true, "message": "规则更新成功", "data": rule}),
            None,
        )
        .await
    }

    pub async fn delete_rule(&self) -> Value {
        self.respond(json!({"success": true, "message": "规则删除成功"}), None)
            .await
    }

    pub async fn test_rule(&self) -> Value {
        self.respond(fixtures::rule_test_result(), None).await
    }

    pub async fn prompts(&self) -> Value {
        self.respond(fixtures::prompts(), None).await
    }

    pub async fn scenarios(&self) -> Value {
        self.respond(fixtures::scenarios(), None).await
    }

    pub async fn versions(&self) -> Value {
        self.respond(fixtures::versions(), None).await
    }

    pub async fn publish_version(&self) -> Value {
        self.respond(json!({"success": true, "message": "版本发布成功"}), None)
            .await
    }

    pub async fn graph_data(&self) -> Value {
        self.respond(fixtures::graph_data(), None).await
    }

    pub async fn graph_stats(&self) -> Value {
        self.respond(fixtures::graph_stats(), None).await
    }

    pub async fn files(&self) -> Value {
        self.respond(fixtures::files(), None).await
    }

    pub async fn entities(&self) -> Value {
        self.respond(fixtures::entities(), None).await
    }

    pub async fn relations(&self) -> Value {
        self.respond(fixtures::relations(), None).await
    }

    /// Acknowledge a file operation (upload, extract, build).
    pub async fn file_accepted(&self, filename: &str, status: &str) -> Value {
        self.respond(
            json!({
                "success": true,
                "data": {"filename": filename, "status": status}
            }),
            None,
        )
        .await
    }

    pub async fn query_result(&self) -> Value {
        self.respond(json!({"success": true, "data": []}), None).await
    }

    pub async fn graph_cleared(&self) -> Value {
        self.respond(json!({"success": true, "message": "图谱已清空"}), None)
            .await
    }

    pub async fn dictionary(&self, page_size: Option<u32>) -> Value {
        let entries = fixtures::dictionary_entries();
        let total = entries.as_array().map(Vec::len).unwrap_or(0);
        self.respond(
            json!({
                "success": true,
                "data": {
                    "entries": entries,
                    "total": total,
                    "page": 1,
                    "page_size": page_size.unwrap_or(20)
                }
            }),
            None,
        )
        .await
    }

    pub async fn dictionary_categories(&self) -> Value {
        self.respond(
            json!({
                "success": true,
                "data": ["电子产品", "硬件组件", "测试流程", "业务实体", "材料"]
            }),
            None,
        )
        .await
    }

    pub async fn dictionary_statistics(&self) -> Value {
        self.respond(
            json!({
                "success": true,
                "data": {"total_entries": 5, "total_categories": 5, "total_aliases": 15}
            }),
            None,
        )
        .await
    }

    /// Echo back a dictionary write.
    pub async fn dictionary_saved(&self, entry: Value) -> Value {
        self.respond(json!({"success": true, "data": entry}), None)
            .await
    }

    pub async fn flow_items(&self) -> Value {
        self.respond(fixtures::flow_items(), None).await
    }

    pub async fn cause_paths(&self) -> Value {
        self.respond(fixtures::cause_paths(), None).await
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(&MockConfig::default())
    }
}
