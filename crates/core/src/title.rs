use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A title register record, keyed by title number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRegisterData {
    pub title_number: String,
    pub register_data: Value,
    pub geometry_data: Value,
    pub official_copy_data: Option<Value>,
    pub lr_uprns: Vec<String>,
    pub is_deleted: bool,
    pub last_modified: DateTime<Utc>,
}

impl TitleRegisterData {
    /// A live title with register data only.
    #[must_use]
    pub fn new(title_number: String, register_data: Value) -> Self {
        Self {
            title_number,
            register_data,
            geometry_data: Value::Null,
            official_copy_data: None,
            lr_uprns: Vec::new(),
            is_deleted: false,
            last_modified: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry_data: Value) -> Self {
        self.geometry_data = geometry_data;
        self
    }

    #[must_use]
    pub fn with_official_copy(mut self, official_copy_data: Value) -> Self {
        self.official_copy_data = Some(official_copy_data);
        self
    }

    #[must_use]
    pub fn with_lr_uprns(mut self, lr_uprns: Vec<String>) -> Self {
        self.lr_uprns = lr_uprns;
        self
    }

    #[must_use]
    pub const fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    #[must_use]
    pub const fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// The `sub_registers` section of the official copy, `Null` when absent.
    #[must_use]
    pub fn sub_registers(&self) -> Value {
        self.official_copy_data
            .as_ref()
            .and_then(|copy| copy.get("sub_registers"))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// Maps an external UPRN to the registry's own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UprnMapping {
    pub uprn: String,
    pub lr_uprn: String,
}

impl UprnMapping {
    #[must_use]
    pub fn new(uprn: impl Into<String>, lr_uprn: impl Into<String>) -> Self {
        Self { uprn: uprn.into(), lr_uprn: lr_uprn.into() }
    }
}

/// Price of a product from the static validation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub product: String,
    pub price: i32,
}
