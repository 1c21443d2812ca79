//! Test utilities and module declarations for storage tests.

use chrono::{DateTime, TimeZone, Utc};
use digital_register_core::{TitleRegisterData, UserSearchAndResults};
use serde_json::json;

use crate::MemoryStorage;

mod title_tests;
mod uprn_tests;
mod user_search_tests;

pub fn create_test_title(title_number: &str) -> TitleRegisterData {
    TitleRegisterData::new(
        title_number.to_owned(),
        json!({"title_number": title_number, "address": format!("{title_number} Test Street")}),
    )
    .with_geometry(json!({"type": "Polygon"}))
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 1, 26, hour, minute, 0).single().unwrap_or_default()
}

pub fn create_test_search(user_id: &str, title_number: &str, searched: DateTime<Utc>) -> UserSearchAndResults {
    UserSearchAndResults {
        search_datetime: searched,
        user_id: user_id.to_owned(),
        title_number: title_number.to_owned(),
        search_type: "D".to_owned(),
        purchase_type: "drvSummaryView".to_owned(),
        amount: "2".to_owned(),
        cart_id: Some("374f501f4567".to_owned()),
        lro_trans_ref: None,
        viewed_datetime: None,
    }
}

pub async fn create_seeded_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage.insert_title(create_test_title("DN1000")).await;
    storage.insert_title(create_test_title("DN1001").with_lr_uprns(vec!["10".into()])).await;
    storage.insert_title(create_test_title("DN1002").deleted()).await;
    storage
}
