use chrono::Duration;

use super::{at, create_test_search};
use crate::traits::{PriceStore, UserSearchStore};
use crate::{MemoryStorage, StorageError};

const WINDOW: i64 = 10;

#[tokio::test]
async fn test_save_and_get_user_search() {
    let storage = MemoryStorage::new();
    let record = create_test_search("user1", "DN1000", at(13, 0));
    storage.save_user_search(&record).await.unwrap();

    let found = storage.get_user_search(at(13, 0), "user1").await.unwrap();
    assert_eq!(found, Some(record));
    assert!(storage.get_user_search(at(13, 0), "user2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_user_search_is_rejected() {
    let storage = MemoryStorage::new();
    let record = create_test_search("user1", "DN1000", at(13, 0));
    storage.save_user_search(&record).await.unwrap();
    let err = storage.save_user_search(&record).await.unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
async fn test_first_view_opens_window() {
    let storage = MemoryStorage::new();
    storage.save_user_search(&create_test_search("user1", "DN1000", at(13, 0))).await.unwrap();

    let window = Duration::minutes(WINDOW);
    let claimed = storage.claim_view("user1", "DN1000", at(14, 0), window).await.unwrap().unwrap();
    assert_eq!(claimed.viewed_datetime, Some(at(14, 0)));

    // Still inside the window: the same record is returned untouched.
    let again = storage.claim_view("user1", "DN1000", at(14, 5), window).await.unwrap().unwrap();
    assert_eq!(again.viewed_datetime, Some(at(14, 0)));

    // Window closed and nothing else was bought.
    assert!(storage.claim_view("user1", "DN1000", at(14, 10), window).await.unwrap().is_none());
}

#[tokio::test]
async fn test_open_window_preferred_over_unviewed_purchase() {
    let storage = MemoryStorage::new();
    let window = Duration::minutes(WINDOW);
    storage.save_user_search(&create_test_search("user1", "DN1000", at(13, 0))).await.unwrap();
    storage.claim_view("user1", "DN1000", at(13, 1), window).await.unwrap();
    storage.save_user_search(&create_test_search("user1", "DN1000", at(13, 2))).await.unwrap();

    let claimed = storage.claim_view("user1", "DN1000", at(13, 3), window).await.unwrap().unwrap();
    assert_eq!(claimed.search_datetime, at(13, 0));

    let unused = storage.get_user_search(at(13, 2), "user1").await.unwrap().unwrap();
    assert!(unused.viewed_datetime.is_none());
}

#[tokio::test]
async fn test_claim_view_is_per_user_and_title() {
    let storage = MemoryStorage::new();
    storage.save_user_search(&create_test_search("user1", "DN1000", at(13, 0))).await.unwrap();
    let window = Duration::minutes(WINDOW);
    assert!(storage.claim_view("user2", "DN1000", at(13, 1), window).await.unwrap().is_none());
    assert!(storage.claim_view("user1", "DN1001", at(13, 1), window).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_price() {
    let storage = MemoryStorage::new();
    storage.set_price("drvSummary", 300).await;
    assert_eq!(storage.get_price("drvSummary").await.unwrap(), Some(300));
    assert_eq!(storage.get_price("other").await.unwrap(), None);

    storage.set_unavailable(Some("down".into())).await;
    assert!(matches!(storage.get_price("drvSummary").await, Err(StorageError::Unavailable(_))));
}
