//! Canonical schema constants for structured logging
//!
//! These keep field names consistent between the logging macros, the test
//! capture layer and anything that parses the JSON production logs.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Graph sizes
pub const FIELD_SOURCE_VERTICES: &str = "source_vertices";
pub const FIELD_TARGET_VERTICES: &str = "target_vertices";
pub const FIELD_PADDED_SIZE: &str = "padded_size";

// Search results
pub const FIELD_COST: &str = "cost";
pub const FIELD_STEPS: &str = "steps";
pub const FIELD_SOLUTIONS: &str = "solutions";
pub const FIELD_FORCED: &str = "forced";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_fields_are_dotted() {
        assert!(FIELD_ERR_KIND.starts_with("err."));
        assert!(FIELD_ERR_CODE.starts_with("err."));
    }
}
