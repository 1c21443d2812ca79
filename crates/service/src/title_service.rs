use std::sync::Arc;

use digital_register_core::TitleRegisterData;
use digital_register_storage::traits::TitleStore;
use digital_register_storage::StorageBackend;

use crate::ServiceError;

pub struct TitleService {
    storage: Arc<StorageBackend>,
}

impl TitleService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn get_title(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, ServiceError> {
        Ok(self.storage.get_title_register(title_number).await?)
    }

    pub async fn get_official_copy(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, ServiceError> {
        Ok(self.storage.get_official_copy_data(title_number).await?)
    }
}
