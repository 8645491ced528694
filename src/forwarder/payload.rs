//! Ingestion payload builder
//!
//! Each forwarded event becomes a two-line NDJSON bulk request:
//!
//! ```text
//! {"index":"seq-db"}
//! {"service":"testing-t","accessAudit":"true","message":"..."}
//! ```
//!
//! The whole body must fit in `PAYLOAD_BUFFER_SIZE` bytes. Long messages are
//! cut on a character boundary before escaping is re-applied, so the
//! result is always valid JSON.

use serde_json::Value;

/// Fixed size of one forwarded request body
pub const PAYLOAD_BUFFER_SIZE: usize = 1024;

/// Index selector written on the first line
pub const INDEX_NAME: &str = "seq-db";

/// A rendered request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub body: String,
    /// The message was shortened to fit the buffer
    pub truncated: bool,
}

fn render(service: &str, message: &str) -> String {
    format!(
        "{{\"index\":{}}}\n{{\"service\":{},\"accessAudit\":\"true\",\"message\":{}}}\n",
        Value::from(INDEX_NAME),
        Value::from(service),
        Value::from(message),
    )
}

/// Size of the body with an empty message; a service tag is usable only
/// while this stays within `PAYLOAD_BUFFER_SIZE`
pub fn payload_overhead(service: &str) -> usize {
    render(service, "").len()
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Build the bulk body for one event message
pub fn build_payload(service: &str, message: &str) -> Payload {
    let mut kept = message;
    loop {
        let body = render(service, kept);
        if body.len() <= PAYLOAD_BUFFER_SIZE || kept.is_empty() {
            return Payload {
                body,
                truncated: kept.len() != message.len(),
            };
        }
        // Escaping never shrinks a character, so dropping `excess` raw bytes
        // removes at least `excess` rendered bytes
        let excess = body.len() - PAYLOAD_BUFFER_SIZE;
        kept = &kept[..floor_char_boundary(kept, kept.len().saturating_sub(excess))];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(payload: &Payload) -> serde_json::Value {
        let mut lines = payload.body.lines();
        let index: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(index, serde_json::json!({"index": "seq-db"}));
        let doc = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert!(lines.next().is_none());
        doc
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_payload("testing-t", "duplicate key value");
        assert_eq!(
            payload.body,
            "{\"index\":\"seq-db\"}\n{\"service\":\"testing-t\",\"accessAudit\":\"true\",\"message\":\"duplicate key value\"}\n"
        );
        assert!(!payload.truncated);
    }

    #[test]
    fn test_message_is_escaped() {
        let payload = build_payload("svc", "relation \"users\" does not exist\n\tat line 1");
        let doc = document(&payload);
        assert_eq!(doc["message"], "relation \"users\" does not exist\n\tat line 1");
        assert_eq!(payload.body.matches('\n').count(), 2);
    }

    #[test]
    fn test_long_message_truncated_but_well_formed() {
        let message = "x".repeat(5000);
        let payload = build_payload("testing-t", &message);

        assert!(payload.truncated);
        assert!(payload.body.len() <= PAYLOAD_BUFFER_SIZE);
        let doc = document(&payload);
        let kept = doc["message"].as_str().unwrap();
        assert!(message.starts_with(kept));
        assert!(kept.len() > 900);
    }

    #[test]
    fn test_truncation_respects_multibyte_and_escapes() {
        let message = "ошибка \"quoted\" ".repeat(200);
        let payload = build_payload("testing-t", &message);

        assert!(payload.truncated);
        assert!(payload.body.len() <= PAYLOAD_BUFFER_SIZE);
        let doc = document(&payload);
        assert!(message.starts_with(doc["message"].as_str().unwrap()));
    }

    #[test]
    fn test_overhead_counts_escaped_tag() {
        assert_eq!(payload_overhead("testing-t"), build_payload("testing-t", "").body.len());
        assert!(payload_overhead(&"s".repeat(2000)) > PAYLOAD_BUFFER_SIZE);
        assert_eq!(payload_overhead("a\"b"), payload_overhead("ab") + 2);
    }

    #[test]
    fn test_message_exactly_at_limit_is_kept() {
        let overhead = build_payload("testing-t", "").body.len();
        let message = "y".repeat(PAYLOAD_BUFFER_SIZE - overhead);
        let payload = build_payload("testing-t", &message);

        assert!(!payload.truncated);
        assert_eq!(payload.body.len(), PAYLOAD_BUFFER_SIZE);
    }
}
