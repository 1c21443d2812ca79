//! Setting value parsing with warn-level logging for invalid values.

/// Parse a raw setting value with a default fallback.
///
/// - If the value is absent: returns `default` silently (expected case).
/// - If the value is present but cannot be parsed: logs a warning and returns `default`.
pub fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}
