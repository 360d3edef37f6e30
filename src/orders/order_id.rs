// Order identifier generation.
// Ids must be short enough to paste into a chat message and unguessable
// enough to double as customer-support references, so the token comes from
// a cryptographically strong random source.

use uuid::Uuid;

/// Fixed literal tag distinguishing order ids from other identifier spaces
pub const ORDER_ID_PREFIX: &str = "SS-";

/// Display length of the random token, in hex characters
const TOKEN_LEN: usize = 8;

/// Generate a new order id, e.g. `SS-3F2A9B0C`.
///
/// 128 bits of randomness truncated to 32 bits of display. Collisions are
/// astronomically rare at this service's volume; the store's insert path is
/// the uniqueness enforcement point, not this function.
pub fn next_order_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", ORDER_ID_PREFIX, hex[..TOKEN_LEN].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn order_id_has_prefixed_hex_format() {
        let pattern = Regex::new(r"^SS-[0-9A-F]{8}$").unwrap();

        for _ in 0..100 {
            let id = next_order_id();
            assert!(pattern.is_match(&id), "unexpected order id format: {}", id);
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        const N: usize = 10_000;

        let ids: HashSet<String> = (0..N).map(|_| next_order_id()).collect();
        assert_eq!(ids.len(), N);
    }
}
