use std::io::Write;

use digital_register_core::USER_SEARCH_INSERT_EVENT_ID;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::{Map, Value};

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Flat legacy message for a user search record.
///
/// Keys are upper-cased and every value is sent as a string, plus an integer
/// `EVENT_ID`. An empty record yields `{}`.
#[must_use]
pub fn create_user_search_message(record: &Map<String, Value>) -> String {
    let mut message: Map<String, Value> = record
        .iter()
        .map(|(key, value)| (key.to_uppercase(), Value::String(stringify(value))))
        .collect();
    if !message.is_empty() {
        message.insert("EVENT_ID".to_owned(), USER_SEARCH_INSERT_EVENT_ID.into());
    }
    Value::Object(message).to_string()
}

/// # Errors
/// Returns the encoder's I/O error.
pub fn compress_message(message: &str) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(message.as_bytes())?;
    encoder.finish()
}
