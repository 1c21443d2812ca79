use std::sync::Arc;

use digital_register_search::PropertySearch;
use digital_register_storage::traits::TitleStore;
use digital_register_storage::StorageBackend;
use serde_json::Value;

/// Title number used to probe Postgres; it must never exist.
const PROBE_TITLE_NUMBER: &str = "non-existing-title";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub errors: Vec<String>,
}

impl HealthReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct HealthService {
    storage: Arc<StorageBackend>,
    search: Arc<dyn PropertySearch>,
}

impl HealthService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, search: Arc<dyn PropertySearch>) -> Self {
        Self { storage, search }
    }

    /// Elasticsearch errors first, then PostgreSQL errors.
    pub async fn check(&self) -> HealthReport {
        let (es, pg) = tokio::join!(self.check_elasticsearch(), self.check_postgresql());
        let errors: Vec<String> = es.into_iter().chain(pg).collect();
        if !errors.is_empty() {
            tracing::warn!(?errors, "health check failed");
        }
        HealthReport { errors }
    }

    async fn check_elasticsearch(&self) -> Option<String> {
        match self.search.info().await {
            // Clusters that no longer report a status are taken as healthy.
            Ok(info) => match info.get("status") {
                None => None,
                Some(status) if status.as_u64() == Some(200) => None,
                Some(status) => Some(format!("Unexpected elasticsearch status: {}", display(status))),
            },
            Err(e) => Some(format!("Problem talking to elasticsearch: {e}")),
        }
    }

    async fn check_postgresql(&self) -> Option<String> {
        self.storage
            .get_title_register(PROBE_TITLE_NUMBER)
            .await
            .err()
            .map(|e| format!("Problem talking to PostgreSQL: {e}"))
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
