//! In-memory storage backend.
//!
//! Same semantics as the PostgreSQL backend for every trait. Used by service
//! and HTTP tests, with failure injection through [`MemoryStorage::set_unavailable`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use digital_register_core::{TitleRegisterData, UprnMapping, UserSearchAndResults};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{PriceStore, TitleStore, UprnStore, UserSearchStore};

#[derive(Debug, Default)]
struct Tables {
    titles: BTreeMap<String, TitleRegisterData>,
    uprn_mapping: HashMap<String, String>,
    user_searches: BTreeMap<(DateTime<Utc>, String), UserSearchAndResults>,
    prices: HashMap<String, i32>,
    unavailable: Option<String>,
}

impl Tables {
    fn check_available(&self) -> Result<(), StorageError> {
        match &self.unavailable {
            Some(reason) => Err(StorageError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn live_title(&self, title_number: &str) -> Option<&TitleRegisterData> {
        self.titles.get(title_number).filter(|t| !t.is_deleted)
    }
}

/// Cloning shares the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `StorageError::Unavailable` until reset with `None`.
    pub async fn set_unavailable(&self, reason: Option<String>) {
        self.tables.write().await.unavailable = reason;
    }

    /// Insert or replace a title row.
    pub async fn insert_title(&self, title: TitleRegisterData) {
        self.tables.write().await.titles.insert(title.title_number.clone(), title);
    }

    pub async fn set_price(&self, product: impl Into<String>, price: i32) {
        self.tables.write().await.prices.insert(product.into(), price);
    }
}

fn require_title_number(title_number: &str) -> Result<(), StorageError> {
    if title_number.trim().is_empty() {
        return Err(StorageError::InvalidArgument("title number must not be empty".into()));
    }
    Ok(())
}

#[async_trait]
impl TitleStore for MemoryStorage {
    async fn get_title_register(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError> {
        require_title_number(title_number)?;
        let tables = self.tables.read().await;
        tables.check_available()?;
        Ok(tables.live_title(title_number).cloned())
    }

    async fn get_title_registers(
        &self,
        title_numbers: &[String],
    ) -> Result<Vec<TitleRegisterData>, StorageError> {
        let tables = self.tables.read().await;
        tables.check_available()?;
        let mut seen = std::collections::HashSet::new();
        Ok(title_numbers
            .iter()
            .filter(|n| seen.insert(n.as_str()))
            .filter_map(|n| tables.live_title(n).cloned())
            .collect())
    }

    async fn get_official_copy_data(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError> {
        require_title_number(title_number)?;
        let tables = self.tables.read().await;
        tables.check_available()?;
        Ok(tables
            .live_title(title_number)
            .filter(|t| t.official_copy_data.as_ref().is_some_and(|v| !v.is_null()))
            .cloned())
    }

    async fn get_title_numbers_for_uprns(
        &self,
        uprns: &[String],
    ) -> Result<Vec<(String, String)>, StorageError> {
        let tables = self.tables.read().await;
        tables.check_available()?;
        let mut pairs = Vec::new();
        for uprn in uprns {
            let Some(lr_uprn) = tables.uprn_mapping.get(uprn) else { continue };
            pairs.extend(
                tables
                    .titles
                    .values()
                    .filter(|t| !t.is_deleted && t.lr_uprns.contains(lr_uprn))
                    .map(|t| (uprn.clone(), t.title_number.clone())),
            );
        }
        Ok(pairs)
    }
}

#[async_trait]
impl UprnStore for MemoryStorage {
    async fn get_mapped_lr_uprn(&self, uprn: &str) -> Result<Option<String>, StorageError> {
        let tables = self.tables.read().await;
        tables.check_available()?;
        Ok(tables.uprn_mapping.get(uprn).cloned())
    }

    async fn insert_uprn_mappings(
        &self,
        rows: &[UprnMapping],
        overwrite: bool,
    ) -> Result<usize, StorageError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;
        let mut batch: HashMap<&str, &str> = HashMap::with_capacity(rows.len());
        for row in rows {
            batch.insert(&row.uprn, &row.lr_uprn);
        }
        let mut written = 0;
        for (uprn, lr_uprn) in batch {
            if overwrite || !tables.uprn_mapping.contains_key(uprn) {
                tables.uprn_mapping.insert(uprn.to_owned(), lr_uprn.to_owned());
                written += 1;
            }
        }
        Ok(written)
    }

    async fn clear_uprn_mappings(&self) -> Result<usize, StorageError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;
        let removed = tables.uprn_mapping.len();
        tables.uprn_mapping.clear();
        Ok(removed)
    }
}

#[async_trait]
impl UserSearchStore for MemoryStorage {
    async fn save_user_search(&self, record: &UserSearchAndResults) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;
        let key = (record.search_datetime, record.user_id.clone());
        if tables.user_searches.contains_key(&key) {
            return Err(StorageError::Duplicate(format!(
                "user search ({}, {}) already exists",
                record.search_datetime, record.user_id
            )));
        }
        tables.user_searches.insert(key, record.clone());
        Ok(())
    }

    async fn get_user_search(
        &self,
        search_datetime: DateTime<Utc>,
        user_id: &str,
    ) -> Result<Option<UserSearchAndResults>, StorageError> {
        let tables = self.tables.read().await;
        tables.check_available()?;
        Ok(tables.user_searches.get(&(search_datetime, user_id.to_owned())).cloned())
    }

    async fn claim_view(
        &self,
        user_id: &str,
        title_number: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<UserSearchAndResults>, StorageError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;

        // Open windows first, then unviewed; newest search first within each.
        let key = tables
            .user_searches
            .iter()
            .filter(|(_, r)| {
                r.user_id == user_id && r.title_number == title_number && r.is_viewable(now, window)
            })
            .max_by_key(|(_, r)| (r.viewed_datetime.is_some(), r.search_datetime))
            .map(|(k, _)| k.clone());

        let Some(key) = key else { return Ok(None) };
        let Some(record) = tables.user_searches.get_mut(&key) else { return Ok(None) };
        if record.viewed_datetime.is_none() {
            record.viewed_datetime = Some(now);
        }
        Ok(Some(record.clone()))
    }
}

#[async_trait]
impl PriceStore for MemoryStorage {
    async fn get_price(&self, product: &str) -> Result<Option<i32>, StorageError> {
        let tables = self.tables.read().await;
        tables.check_available()?;
        Ok(tables.prices.get(product).copied())
    }
}
