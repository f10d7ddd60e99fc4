//! Structured logging field name constants for anyview.
//!
//! Both crates use these constants for consistent structured logging fields.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Collaborator failure the caller must surface |
//! | WARN  | Recoverable issue, fallback applied (skipped field, pruned pin) |
//! | INFO  | Lifecycle events (client construction, config load) |
//! | DEBUG | Decision points (icon fallback, hydration lookups) |
//! | TRACE | Per-item iteration (mapped entities, merged rows) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Component emitting the event.
/// Examples: "mapper", "icon", "entries", "merge", "client", "pinned"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "map_object", "fetch_page", "resolve_file"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Space the entity belongs to.
pub const SPACE_ID: &str = "space_id";

/// Object, type or member id.
pub const OBJECT_ID: &str = "object_id";

/// Property key being mapped or assembled.
pub const PROPERTY_KEY: &str = "property_key";

/// Property format wire name.
pub const FORMAT: &str = "format";

/// File id of an uploaded icon.
pub const FILE_ID: &str = "file_id";

/// Pinned store namespace key.
pub const NAMESPACE: &str = "namespace";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of entities returned or produced.
pub const RESULT_COUNT: &str = "result_count";

/// Page offset requested.
pub const OFFSET: &str = "offset";

/// Page size requested.
pub const LIMIT: &str = "limit";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// HTTP status code returned by the API.
pub const STATUS: &str = "status";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_unique_snake_case() {
        let fields = [
            COMPONENT,
            OPERATION,
            SPACE_ID,
            OBJECT_ID,
            PROPERTY_KEY,
            FORMAT,
            FILE_ID,
            NAMESPACE,
            DURATION_MS,
            RESULT_COUNT,
            OFFSET,
            LIMIT,
            STATUS,
            ERROR_MSG,
        ];
        let unique: std::collections::HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), fields.len());
        for field in fields {
            assert!(field
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
