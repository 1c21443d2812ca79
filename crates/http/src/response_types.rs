//! Response types (Serialize)

use digital_register_core::TitleRegisterData;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title_number: String,
    pub data: Value,
    pub geometry_data: Value,
}

impl From<TitleRegisterData> for TitleResponse {
    fn from(title: TitleRegisterData) -> Self {
        Self {
            title_number: title.title_number,
            data: title.register_data,
            geometry_data: title.geometry_data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OfficialCopyData {
    pub sub_registers: Value,
    pub title_number: String,
}

#[derive(Debug, Serialize)]
pub struct OfficialCopyResponse {
    pub official_copy_data: OfficialCopyData,
}

impl From<TitleRegisterData> for OfficialCopyResponse {
    fn from(title: TitleRegisterData) -> Self {
        Self {
            official_copy_data: OfficialCopyData {
                sub_registers: title.sub_registers(),
                title_number: title.title_number,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub product: String,
    pub price: i32,
}
