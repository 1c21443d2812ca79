use sha2::{Digest, Sha256};

use crate::CART_ID_LENGTH;

/// Derive the cart id stored with a paid search.
///
/// Lower-case hex SHA-256 over the title and timestamp fields, cut to the
/// width of the `cart_id` column. The same inputs always give the same id.
#[must_use]
pub fn derive_cart_id(
    title_number: &str,
    search_timestamp: &str,
    last_changed_date: &str,
    last_changed_time: &str,
) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in [title_number, search_timestamp, last_changed_date, last_changed_time]
        .iter()
        .enumerate()
    {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }
    let mut id = hex::encode(hasher.finalize());
    id.truncate(CART_ID_LENGTH);
    id
}
