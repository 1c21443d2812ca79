//! Process settings loaded from the environment.

use std::fmt;

use crate::{
    ConfigError, DEFAULT_ADDRESS_DOC_TYPE, DEFAULT_ELASTICSEARCH_INDEX,
    DEFAULT_MAX_NUMBER_SEARCH_RESULTS, DEFAULT_POSTCODE_DOC_TYPE, DEFAULT_SEARCH_RESULTS_PER_PAGE,
    DEFAULT_VIEW_WINDOW_MINUTES, MAX_VIEW_WINDOW_MINUTES, parse_with_default,
};

const DEFAULT_ELASTICSEARCH_ENDPOINT: &str = "http://localhost:9200";

/// Log level for this service's own crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
}

impl LogLevel {
    /// Anything other than `DEBUG` or `WARN` falls back to `INFO`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("debug") => Self::Debug,
            Some(s) if s.eq_ignore_ascii_case("warn") => Self::Warn,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

/// Connection details for the outgoing legacy transmission queue.
#[derive(Clone, PartialEq, Eq)]
pub struct QueueSettings {
    pub queue: String,
    pub hostname: String,
    pub userid: String,
    pub password: String,
}

impl fmt::Debug for QueueSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueSettings")
            .field("queue", &self.queue)
            .field("hostname", &self.hostname)
            .field("userid", &self.userid)
            .field("password", &"***")
            .finish()
    }
}

/// Elasticsearch location and the document types searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticsearchSettings {
    pub endpoint: String,
    pub index: String,
    pub postcode_doc_type: String,
    pub address_doc_type: String,
}

/// Result paging rules shared by postcode and address searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Hard cap on results across all pages.
    pub max_results: u64,
    /// Titles per page.
    pub page_size: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_NUMBER_SEARCH_RESULTS,
            page_size: DEFAULT_SEARCH_RESULTS_PER_PAGE,
        }
    }
}

/// Process-wide settings, read once at start-up and shared by `Arc`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub debug: bool,
    pub testing: bool,
    pub database_url: String,
    pub elasticsearch: ElasticsearchSettings,
    pub search: SearchLimits,
    pub address_search_api: Option<String>,
    pub queue: Option<QueueSettings>,
    pub view_window_minutes: i64,
    pub log_level: LogLevel,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` when the database URI is not set and
    /// `ConfigError::Invalid` when a paging value is zero or the viewing
    /// window is outside one minute to one day.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// See [`Settings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("POSTGRES_REGISTER_DATABASE_URI")
            .ok_or(ConfigError::Missing("POSTGRES_REGISTER_DATABASE_URI"))?;

        let (debug, testing) = match get("SETTINGS").as_deref() {
            Some("dev") => (true, false),
            Some("test") => (true, true),
            _ => (false, false),
        };

        let elasticsearch = ElasticsearchSettings {
            endpoint: get("ELASTICSEARCH_ENDPOINT_URI")
                .unwrap_or_else(|| DEFAULT_ELASTICSEARCH_ENDPOINT.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            index: get("ELASTICSEARCH_INDEX_NAME")
                .unwrap_or_else(|| DEFAULT_ELASTICSEARCH_INDEX.to_owned()),
            postcode_doc_type: get("POSTCODE_SEARCH_DOC_TYPE")
                .unwrap_or_else(|| DEFAULT_POSTCODE_DOC_TYPE.to_owned()),
            address_doc_type: get("ADDRESS_SEARCH_DOC_TYPE")
                .unwrap_or_else(|| DEFAULT_ADDRESS_DOC_TYPE.to_owned()),
        };

        let search = SearchLimits {
            max_results: parse_with_default(
                "MAX_NUMBER_SEARCH_RESULTS",
                get("MAX_NUMBER_SEARCH_RESULTS").as_deref(),
                DEFAULT_MAX_NUMBER_SEARCH_RESULTS,
            ),
            page_size: parse_with_default(
                "SEARCH_RESULTS_PER_PAGE",
                get("SEARCH_RESULTS_PER_PAGE").as_deref(),
                DEFAULT_SEARCH_RESULTS_PER_PAGE,
            ),
        };
        if search.max_results == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_NUMBER_SEARCH_RESULTS",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if search.page_size == 0 {
            return Err(ConfigError::Invalid {
                var: "SEARCH_RESULTS_PER_PAGE",
                reason: "must be greater than zero".to_owned(),
            });
        }

        let view_window_minutes = parse_with_default(
            "VIEW_WINDOW_MINUTES",
            get("VIEW_WINDOW_MINUTES").as_deref(),
            DEFAULT_VIEW_WINDOW_MINUTES,
        );
        if !(1..=MAX_VIEW_WINDOW_MINUTES).contains(&view_window_minutes) {
            return Err(ConfigError::Invalid {
                var: "VIEW_WINDOW_MINUTES",
                reason: format!("must be between 1 and {MAX_VIEW_WINDOW_MINUTES}"),
            });
        }

        let queue = match (get("OUTGOING_QUEUE"), get("OUTGOING_QUEUE_HOSTNAME")) {
            (Some(queue), Some(hostname)) => Some(QueueSettings {
                queue,
                hostname,
                userid: get("OUTGOING_QUEUE_USERID").unwrap_or_default(),
                password: get("OUTGOING_QUEUE_PASSWORD").unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Self {
            debug,
            testing,
            database_url,
            elasticsearch,
            search,
            address_search_api: get("ADDRESS_SEARCH_API"),
            queue,
            view_window_minutes,
            log_level: LogLevel::parse(get("LOGGING_LEVEL").as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    const DB: (&str, &str) = ("POSTGRES_REGISTER_DATABASE_URI", "postgres://u:p@localhost/db");

    #[test]
    fn test_missing_database_uri() {
        let err = settings_from(&[]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("POSTGRES_REGISTER_DATABASE_URI"));
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[DB]).unwrap();
        assert!(!settings.debug);
        assert!(!settings.testing);
        assert_eq!(settings.elasticsearch.index, "landregistry");
        assert_eq!(settings.elasticsearch.postcode_doc_type, "property_by_postcode_3");
        assert_eq!(settings.search, SearchLimits { max_results: 50, page_size: 20 });
        assert_eq!(settings.view_window_minutes, 10);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert!(settings.queue.is_none());
        assert!(settings.address_search_api.is_none());
    }

    #[test]
    fn test_settings_flag_toggles_debug_and_testing() {
        let dev = settings_from(&[DB, ("SETTINGS", "dev")]).unwrap();
        assert!(dev.debug);
        assert!(!dev.testing);

        let test = settings_from(&[DB, ("SETTINGS", "test")]).unwrap();
        assert!(test.debug);
        assert!(test.testing);
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let settings =
            settings_from(&[DB, ("ELASTICSEARCH_ENDPOINT_URI", "http://es:9200/")]).unwrap();
        assert_eq!(settings.elasticsearch.endpoint, "http://es:9200");
    }

    #[test]
    fn test_invalid_number_falls_back_to_default() {
        let settings = settings_from(&[DB, ("SEARCH_RESULTS_PER_PAGE", "lots")]).unwrap();
        assert_eq!(settings.search.page_size, 20);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = settings_from(&[DB, ("SEARCH_RESULTS_PER_PAGE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SEARCH_RESULTS_PER_PAGE", .. }));
    }

    #[test]
    fn test_view_window_out_of_range_is_rejected() {
        for raw in ["0", "-5", "1441", "200000000000000"] {
            let err = settings_from(&[DB, ("VIEW_WINDOW_MINUTES", raw)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { var: "VIEW_WINDOW_MINUTES", .. }),
                "{raw} accepted"
            );
        }
    }

    #[test]
    fn test_view_window_bounds_are_accepted() {
        let one = settings_from(&[DB, ("VIEW_WINDOW_MINUTES", "1")]).unwrap();
        assert_eq!(one.view_window_minutes, 1);
        let day = settings_from(&[DB, ("VIEW_WINDOW_MINUTES", "1440")]).unwrap();
        assert_eq!(day.view_window_minutes, 1440);
    }

    #[test]
    fn test_queue_requires_name_and_host() {
        let without_host = settings_from(&[DB, ("OUTGOING_QUEUE", "legacy")]).unwrap();
        assert!(without_host.queue.is_none());

        let settings = settings_from(&[
            DB,
            ("OUTGOING_QUEUE", "legacy"),
            ("OUTGOING_QUEUE_HOSTNAME", "rabbit:5672"),
            ("OUTGOING_QUEUE_USERID", "guest"),
            ("OUTGOING_QUEUE_PASSWORD", "secret"),
        ])
        .unwrap();
        let queue = settings.queue.unwrap();
        assert_eq!(queue.queue, "legacy");
        assert_eq!(queue.hostname, "rabbit:5672");
        assert!(!format!("{queue:?}").contains("secret"));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse(Some("DEBUG")), LogLevel::Debug);
        assert_eq!(LogLevel::parse(Some("WARN")), LogLevel::Warn);
        assert_eq!(LogLevel::parse(Some("ERROR")), LogLevel::Info);
        assert_eq!(LogLevel::parse(None), LogLevel::Info);
    }
}
