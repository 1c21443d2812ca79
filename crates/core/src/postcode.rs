/// Normalise a postcode from a URL path segment for an exact index match.
///
/// Upper-cases and strips spaces and underscores: `"  Sw1 1_2 dR "` becomes `"SW112DR"`.
#[must_use]
pub fn normalise_postcode(raw: &str) -> String {
    raw.chars().filter(|c| *c != '_' && *c != ' ').flat_map(char::to_uppercase).collect()
}
