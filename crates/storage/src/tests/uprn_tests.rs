use crate::traits::UprnStore;
use crate::MemoryStorage;
use digital_register_core::UprnMapping;

#[tokio::test]
async fn test_insert_and_lookup_mapping() {
    let storage = MemoryStorage::new();
    let written = storage
        .insert_uprn_mappings(&[UprnMapping::new("1", "a"), UprnMapping::new("2", "b")], false)
        .await
        .unwrap();
    assert_eq!(written, 2);
    assert_eq!(storage.get_mapped_lr_uprn("1").await.unwrap().as_deref(), Some("a"));
    assert!(storage.get_mapped_lr_uprn("3").await.unwrap().is_none());
}

#[tokio::test]
async fn test_existing_mapping_kept_without_overwrite() {
    let storage = MemoryStorage::new();
    storage.insert_uprn_mappings(&[UprnMapping::new("1", "a")], false).await.unwrap();

    let written = storage.insert_uprn_mappings(&[UprnMapping::new("1", "z")], false).await.unwrap();
    assert_eq!(written, 0);
    assert_eq!(storage.get_mapped_lr_uprn("1").await.unwrap().as_deref(), Some("a"));

    let written = storage.insert_uprn_mappings(&[UprnMapping::new("1", "z")], true).await.unwrap();
    assert_eq!(written, 1);
    assert_eq!(storage.get_mapped_lr_uprn("1").await.unwrap().as_deref(), Some("z"));
}

#[tokio::test]
async fn test_last_row_in_batch_wins() {
    let storage = MemoryStorage::new();
    storage
        .insert_uprn_mappings(&[UprnMapping::new("1", "a"), UprnMapping::new("1", "b")], false)
        .await
        .unwrap();
    assert_eq!(storage.get_mapped_lr_uprn("1").await.unwrap().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_clear_mappings() {
    let storage = MemoryStorage::new();
    storage
        .insert_uprn_mappings(&[UprnMapping::new("1", "a"), UprnMapping::new("2", "b")], false)
        .await
        .unwrap();
    assert_eq!(storage.clear_uprn_mappings().await.unwrap(), 2);
    assert!(storage.get_mapped_lr_uprn("1").await.unwrap().is_none());
}
