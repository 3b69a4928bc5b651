//! Structured logging schema and field name constants for notekeep.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query by the same keys across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store failure or degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied (bad config value, rate limit) |
//! | INFO  | Lifecycle events (startup, shutdown), note create/delete |
//! | DEBUG | Query parameters, intermediate values, config choices |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "service", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "pg_store", "memory_store", "notes"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "get", "create", "update", "delete", "stats"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Authenticated owner of the request.
pub const OWNER_ID: &str = "owner_id";

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";
