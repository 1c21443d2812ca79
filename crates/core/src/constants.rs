//! Shared constants for the digital register API.

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Default Elasticsearch index holding property documents.
pub const DEFAULT_ELASTICSEARCH_INDEX: &str = "landregistry";

/// Document type searched by postcode.
pub const DEFAULT_POSTCODE_DOC_TYPE: &str = "property_by_postcode_3";

/// Document type searched by free-text address.
pub const DEFAULT_ADDRESS_DOC_TYPE: &str = "property_by_address";

/// Default cap on the number of results across all pages.
pub const DEFAULT_MAX_NUMBER_SEARCH_RESULTS: u64 = 50;

/// Default number of titles per results page.
pub const DEFAULT_SEARCH_RESULTS_PER_PAGE: u64 = 20;

/// Default length of the single-use viewing window, in minutes.
pub const DEFAULT_VIEW_WINDOW_MINUTES: i64 = 10;

/// Longest accepted viewing window: one day.
pub const MAX_VIEW_WINDOW_MINUTES: i64 = 24 * 60;

/// Default number of mapping rows written per import batch.
pub const DEFAULT_IMPORT_PAGE_SIZE: usize = 5000;

/// Event id the legacy system expects for a user search insert.
pub const USER_SEARCH_INSERT_EVENT_ID: i64 = 2;

/// Exchange and routing key used for legacy transmissions.
pub const LEGACY_TRANSMISSION_EXCHANGE: &str = "legacy_transmission";

/// Width of the `cart_id` column.
pub const CART_ID_LENGTH: usize = 30;
