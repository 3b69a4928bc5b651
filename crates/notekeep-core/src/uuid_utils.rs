//! UUID v7 utilities for time-ordered identifiers.
//!
//! UUIDv7 embeds a millisecond Unix timestamp in its first 48 bits, so note
//! ids sort in creation order and make a stable tie-breaker for listings.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_v7() {
        assert_eq!(new_v7().get_version_num(), 7);
    }

    #[test]
    fn test_v7_ids_are_unique() {
        assert_ne!(new_v7(), new_v7());
    }
}
