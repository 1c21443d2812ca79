//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use digital_register_core::{TitleRegisterData, UprnMapping, UserSearchAndResults};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::pg_storage::PgStorage;
use crate::traits::{PriceStore, TitleStore, UprnStore, UserSearchStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Postgres(s) => <PgStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Postgres(PgStorage),
    Memory(MemoryStorage),
}

impl StorageBackend {
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgStorage::new(database_url).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }
}

// ── TitleStore ───────────────────────────────────────────────────

#[async_trait]
impl TitleStore for StorageBackend {
    async fn get_title_register(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError> {
        dispatch!(self, TitleStore, get_title_register(title_number))
    }

    async fn get_title_registers(
        &self,
        title_numbers: &[String],
    ) -> Result<Vec<TitleRegisterData>, StorageError> {
        dispatch!(self, TitleStore, get_title_registers(title_numbers))
    }

    async fn get_official_copy_data(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError> {
        dispatch!(self, TitleStore, get_official_copy_data(title_number))
    }

    async fn get_title_numbers_for_uprns(
        &self,
        uprns: &[String],
    ) -> Result<Vec<(String, String)>, StorageError> {
        dispatch!(self, TitleStore, get_title_numbers_for_uprns(uprns))
    }
}

// ── UprnStore ────────────────────────────────────────────────────

#[async_trait]
impl UprnStore for StorageBackend {
    async fn get_mapped_lr_uprn(&self, uprn: &str) -> Result<Option<String>, StorageError> {
        dispatch!(self, UprnStore, get_mapped_lr_uprn(uprn))
    }

    async fn insert_uprn_mappings(
        &self,
        rows: &[UprnMapping],
        overwrite: bool,
    ) -> Result<usize, StorageError> {
        dispatch!(self, UprnStore, insert_uprn_mappings(rows, overwrite))
    }

    async fn clear_uprn_mappings(&self) -> Result<usize, StorageError> {
        dispatch!(self, UprnStore, clear_uprn_mappings())
    }
}

// ── UserSearchStore ──────────────────────────────────────────────

#[async_trait]
impl UserSearchStore for StorageBackend {
    async fn save_user_search(&self, record: &UserSearchAndResults) -> Result<(), StorageError> {
        dispatch!(self, UserSearchStore, save_user_search(record))
    }

    async fn get_user_search(
        &self,
        search_datetime: DateTime<Utc>,
        user_id: &str,
    ) -> Result<Option<UserSearchAndResults>, StorageError> {
        dispatch!(self, UserSearchStore, get_user_search(search_datetime, user_id))
    }

    async fn claim_view(
        &self,
        user_id: &str,
        title_number: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<UserSearchAndResults>, StorageError> {
        dispatch!(self, UserSearchStore, claim_view(user_id, title_number, now, window))
    }
}

// ── PriceStore ───────────────────────────────────────────────────

#[async_trait]
impl PriceStore for StorageBackend {
    async fn get_price(&self, product: &str) -> Result<Option<i32>, StorageError> {
        dispatch!(self, PriceStore, get_price(product))
    }
}
