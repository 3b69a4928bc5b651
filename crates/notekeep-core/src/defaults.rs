//! Centralized default constants for notekeep.
//!
//! Every crate references these constants instead of defining its own magic
//! numbers.

// =============================================================================
// NOTE FIELDS
// =============================================================================

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum content length in characters.
pub const CONTENT_MAX_CHARS: usize = 5000;

/// Maximum category length in characters.
pub const CATEGORY_MAX_CHARS: usize = 50;

/// Category assigned when none is supplied.
pub const DEFAULT_CATEGORY: &str = "General";

/// Category value meaning "no category filter" in list queries.
pub const CATEGORY_ALL: &str = "all";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number (1-based).
pub const PAGE: u64 = 1;

/// Default page size for note listings.
pub const PAGE_LIMIT: u64 = 10;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const SERVER_PORT: u16 = 3000;

/// Header carrying the verified user id from the upstream authenticator.
pub const IDENTITY_HEADER: &str = "x-user-id";

/// Default request body limit in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Default rate limit: requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;
