use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Timestamp layout the legacy system sends and expects back.
pub const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Audit row for a paid search, keyed by (`search_datetime`, `user_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearchAndResults {
    pub search_datetime: DateTime<Utc>,
    pub user_id: String,
    pub title_number: String,
    pub search_type: String,
    pub purchase_type: String,
    pub amount: String,
    pub cart_id: Option<String>,
    pub lro_trans_ref: Option<String>,
    pub viewed_datetime: Option<DateTime<Utc>>,
}

impl UserSearchAndResults {
    /// Whether the record still grants a view at `now`.
    ///
    /// An unviewed record always does. Once viewed, it does until `window`
    /// has passed since the first view.
    #[must_use]
    pub fn is_viewable(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.viewed_datetime.is_none_or(|viewed| viewed > now - window)
    }

    /// Flat column -> value map handed to the legacy transmission.
    #[must_use]
    pub fn to_transmission_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("search_datetime".into(), format_legacy_timestamp(self.search_datetime).into());
        map.insert("user_id".into(), self.user_id.clone().into());
        map.insert("title_number".into(), self.title_number.clone().into());
        map.insert("search_type".into(), self.search_type.clone().into());
        map.insert("purchase_type".into(), self.purchase_type.clone().into());
        map.insert("amount".into(), self.amount.clone().into());
        map.insert("cart_id".into(), self.cart_id.clone().map_or(Value::Null, Value::from));
        map.insert(
            "lro_trans_ref".into(),
            self.lro_trans_ref.clone().map_or(Value::Null, Value::from),
        );
        map.insert(
            "viewed_datetime".into(),
            self.viewed_datetime.map_or(Value::Null, |dt| format_legacy_timestamp(dt).into()),
        );
        map
    }
}

#[must_use]
pub fn format_legacy_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(LEGACY_TIMESTAMP_FORMAT).to_string()
}

/// Parse a search timestamp as sent by the front end.
///
/// Accepts `2016-01-26 13:00:30.005449` (taken as UTC) and RFC 3339.
///
/// # Errors
/// Returns the last parse error when neither layout matches.
pub fn parse_search_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        Ok(naive) => Ok(naive.and_utc()),
        Err(_) => DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)),
    }
}
