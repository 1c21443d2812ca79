//! Fakes shared by the service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use digital_register_core::{search_window, PageRequest, TitleRegisterData};
use digital_register_queue::{create_user_search_message, LegacyTransmitter, QueueError};
use digital_register_search::{AddressHit, PropertySearch, SearchError, SearchPage};
use digital_register_storage::{MemoryStorage, StorageBackend};
use serde_json::{json, Map, Value};

pub fn title(title_number: &str) -> TitleRegisterData {
    TitleRegisterData::new(
        title_number.to_owned(),
        json!({"register": format!("data {title_number}")}),
    )
}

/// Memory-backed storage holding one live title per number.
pub async fn seeded_storage(title_numbers: &[&str]) -> (Arc<StorageBackend>, MemoryStorage) {
    let memory = MemoryStorage::new();
    for number in title_numbers {
        memory.insert_title(title(number)).await;
    }
    (Arc::new(StorageBackend::Memory(memory.clone())), memory)
}

/// Serves a fixed hit list, paged the way Elasticsearch would with a cap of 50.
pub struct FakeSearch {
    hits: Vec<AddressHit>,
    fail: bool,
    info: Value,
    last_query: Mutex<Option<String>>,
}

impl FakeSearch {
    pub fn with_hits(hits: Vec<AddressHit>) -> Self {
        Self { hits, fail: false, info: json!({"status": 200}), last_query: Mutex::new(None) }
    }

    pub fn with_titles(title_numbers: &[&str]) -> Self {
        Self::with_hits(title_numbers.iter().map(|n| AddressHit::for_title(*n)).collect())
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::with_hits(Vec::new()) }
    }

    pub fn with_info(info: Value) -> Self {
        Self { info, ..Self::with_hits(Vec::new()) }
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    fn page(&self, query: &str, page: PageRequest) -> Result<SearchPage, SearchError> {
        *self.last_query.lock().unwrap() = Some(query.to_owned());
        if self.fail {
            return Err(SearchError::Status { code: 503, body: "unavailable".into() });
        }
        let hits = search_window(page, 50)
            .map(|w| {
                self.hits
                    .iter()
                    .skip(usize::try_from(w.from).unwrap())
                    .take(usize::try_from(w.size).unwrap())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(SearchPage { hits, total: self.hits.len() as u64 })
    }
}

#[async_trait]
impl PropertySearch for FakeSearch {
    async fn search_by_postcode(
        &self,
        postcode: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        self.page(postcode, page)
    }

    async fn search_by_address(
        &self,
        address: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        self.page(address, page)
    }

    async fn info(&self) -> Result<Value, SearchError> {
        if self.fail {
            return Err(SearchError::InvalidResponse("connection refused".into()));
        }
        Ok(self.info.clone())
    }
}

/// Records every message it would have published.
#[derive(Default)]
pub struct FakeTransmitter {
    pub fail: bool,
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl LegacyTransmitter for FakeTransmitter {
    async fn transmit(&self, record: &Map<String, Value>) -> Result<bool, QueueError> {
        if self.fail {
            return Err(QueueError::Nack("legacy_transmission".into()));
        }
        if record.is_empty() {
            return Ok(false);
        }
        self.sent.lock().unwrap().push(create_user_search_message(record));
        Ok(true)
    }
}
