use serde_json::json;

use super::{create_seeded_storage, create_test_title};
use crate::traits::{TitleStore, UprnStore};
use crate::StorageError;
use digital_register_core::UprnMapping;

#[tokio::test]
async fn test_get_title_register() {
    let storage = create_seeded_storage().await;
    let title = storage.get_title_register("DN1000").await.unwrap().unwrap();
    assert_eq!(title.title_number, "DN1000");
    assert_eq!(title.register_data["address"], "DN1000 Test Street");
}

#[tokio::test]
async fn test_deleted_title_is_not_returned() {
    let storage = create_seeded_storage().await;
    assert!(storage.get_title_register("DN1002").await.unwrap().is_none());
    assert!(storage.get_title_register("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_title_number_is_rejected() {
    let storage = create_seeded_storage().await;
    let err = storage.get_title_register("  ").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_get_title_registers_skips_deleted_and_missing() {
    let storage = create_seeded_storage().await;
    let numbers = vec!["DN1002".to_owned(), "DN1001".to_owned(), "X".to_owned(), "DN1000".to_owned()];
    let mut found: Vec<String> = storage
        .get_title_registers(&numbers)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title_number)
        .collect();
    found.sort();
    assert_eq!(found, ["DN1000", "DN1001"]);
}

#[tokio::test]
async fn test_official_copy_requires_data() {
    let storage = create_seeded_storage().await;
    assert!(storage.get_official_copy_data("DN1000").await.unwrap().is_none());

    storage
        .insert_title(
            create_test_title("DN1000")
                .with_official_copy(json!({"sub_registers": [{"sub_register_name": "A"}]})),
        )
        .await;
    let title = storage.get_official_copy_data("DN1000").await.unwrap().unwrap();
    assert_eq!(title.sub_registers(), json!([{"sub_register_name": "A"}]));
}

#[tokio::test]
async fn test_title_numbers_for_uprns_follow_mapping() {
    let storage = create_seeded_storage().await;
    storage
        .insert_uprn_mappings(&[UprnMapping::new("900", "10"), UprnMapping::new("901", "99")], false)
        .await
        .unwrap();

    let pairs = storage
        .get_title_numbers_for_uprns(&["900".to_owned(), "901".to_owned()])
        .await
        .unwrap();
    assert_eq!(pairs, [("900".to_owned(), "DN1001".to_owned())]);
}

#[tokio::test]
async fn test_unavailable_storage_fails() {
    let storage = create_seeded_storage().await;
    storage.set_unavailable(Some("connection refused".into())).await;
    let err = storage.get_title_register("DN1000").await.unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));

    storage.set_unavailable(None).await;
    assert!(storage.get_title_register("DN1000").await.unwrap().is_some());
}
