//! Paid search records, viewing rights and prices.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use digital_register_core::{
    derive_cart_id, parse_search_timestamp, UserSearchAndResults, DEFAULT_VIEW_WINDOW_MINUTES,
};
use digital_register_queue::LegacyTransmitter;
use digital_register_storage::traits::{PriceStore, UserSearchStore};
use digital_register_storage::StorageBackend;
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Form posted by the front end after a successful payment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequestForm {
    #[serde(rename = "MC_timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "MC_userId", default)]
    pub user_id: String,
    #[serde(rename = "MC_titleNumber", default)]
    pub title_number: String,
    #[serde(rename = "MC_searchType", default)]
    pub search_type: String,
    #[serde(rename = "MC_purchaseType", default)]
    pub purchase_type: String,
    #[serde(default)]
    pub amount: String,
    /// Ignored; the stored id is always derived.
    #[serde(default)]
    pub cart_id: Option<String>,
    #[serde(rename = "last_changed_datestring", default)]
    pub last_changed_date: String,
    #[serde(rename = "last_changed_timestring", default)]
    pub last_changed_time: String,
    #[serde(default)]
    pub lro_trans_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedSearch {
    pub cart_id: String,
    pub transmitted: bool,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}

pub struct UserSearchService {
    storage: Arc<StorageBackend>,
    transmitter: Option<Arc<dyn LegacyTransmitter>>,
    view_window: Duration,
}

impl UserSearchService {
    #[must_use]
    pub fn new(
        storage: Arc<StorageBackend>,
        transmitter: Option<Arc<dyn LegacyTransmitter>>,
        view_window_minutes: i64,
    ) -> Self {
        let view_window = Duration::try_minutes(view_window_minutes)
            .filter(|window| *window > Duration::zero())
            .unwrap_or_else(|| {
                tracing::warn!(
                    view_window_minutes,
                    default = DEFAULT_VIEW_WINDOW_MINUTES,
                    "viewing window out of range, using default"
                );
                Duration::minutes(DEFAULT_VIEW_WINDOW_MINUTES)
            });
        Self { storage, transmitter, view_window }
    }

    /// Store a paid search and forward it to the legacy system.
    ///
    /// A failed publish does not undo the insert; it is logged and reported
    /// as `transmitted: false`.
    pub async fn save_search_request(
        &self,
        form: &SearchRequestForm,
    ) -> Result<SavedSearch, ServiceError> {
        let raw_timestamp = required("MC_timestamp", &form.timestamp)?;
        let search_datetime = parse_search_timestamp(raw_timestamp).map_err(|e| {
            ServiceError::InvalidInput(format!("MC_timestamp {raw_timestamp:?}: {e}"))
        })?;
        let title_number = required("MC_titleNumber", &form.title_number)?;
        let cart_id = derive_cart_id(
            title_number,
            raw_timestamp,
            form.last_changed_date.trim(),
            form.last_changed_time.trim(),
        );

        let record = UserSearchAndResults {
            search_datetime,
            user_id: required("MC_userId", &form.user_id)?.to_owned(),
            title_number: title_number.to_owned(),
            search_type: required("MC_searchType", &form.search_type)?.to_owned(),
            purchase_type: required("MC_purchaseType", &form.purchase_type)?.to_owned(),
            amount: required("amount", &form.amount)?.to_owned(),
            cart_id: Some(cart_id.clone()),
            lro_trans_ref: form.lro_trans_ref.clone().filter(|r| !r.trim().is_empty()),
            viewed_datetime: None,
        };
        self.storage.save_user_search(&record).await?;
        tracing::info!(user_id = %record.user_id, title_number = %record.title_number, %cart_id, "search request saved");

        let transmitted = self.transmit(&record).await;
        Ok(SavedSearch { cart_id, transmitted })
    }

    async fn transmit(&self, record: &UserSearchAndResults) -> bool {
        let Some(transmitter) = &self.transmitter else {
            tracing::debug!("legacy queue not configured, search not transmitted");
            return false;
        };
        match transmitter.transmit(&record.to_transmission_map()).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::error!(error = %e, user_id = %record.user_id, "legacy transmission failed");
                false
            },
        }
    }

    /// Whether the user may view the title now. The first view opens the window.
    pub async fn user_can_view(&self, user_id: &str, title_number: &str) -> Result<bool, ServiceError> {
        self.user_can_view_at(user_id, title_number, Utc::now()).await
    }

    pub async fn user_can_view_at(
        &self,
        user_id: &str,
        title_number: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let claimed = self.storage.claim_view(user_id, title_number, now, self.view_window).await?;
        Ok(claimed.is_some())
    }

    pub async fn get_price(&self, product: &str) -> Result<Option<i32>, ServiceError> {
        Ok(self.storage.get_price(product).await?)
    }
}
