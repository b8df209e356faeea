//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Keys owned by the row itself; payload keys with these names are dropped,
/// so a serialized entry always reports the `id`/`start`/`stop` it was
/// classified by.
pub const RESERVED_KEYS: [&str; 3] = ["id", "start", "stop"];

/// Key used when a payload is not a JSON object.
pub const RAW_DATA_KEY: &str = "raw_data";

/// A row of the `schedule` table as read from the store.
///
/// `start`/`stop` are `None` when the stored value is null or could not be
/// decoded. `start <= stop` is not guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    pub id: i64,
    pub start: Option<OffsetDateTime>,
    pub stop: Option<OffsetDateTime>,
    pub payload: String,
}

/// A schedule entry after payload decoding.
///
/// Serializes as a flat JSON object: `id`, `start`, `stop` (RFC 3339) followed
/// by every decoded payload key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub stop: OffsetDateTime,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NormalizedEntry {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field rendered as text: strings verbatim, other values as JSON.
    pub fn field_text(&self, key: &str) -> Option<String> {
        self.field(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }

    /// Interval overlap against an inclusive window.
    pub fn overlaps(&self, window_start: OffsetDateTime, window_end: OffsetDateTime) -> bool {
        self.start <= window_end && self.stop >= window_start
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    fn entry(fields: Value) -> NormalizedEntry {
        NormalizedEntry {
            id: 7,
            start: datetime!(2023-01-01 10:00:00 UTC),
            stop: datetime!(2023-01-01 11:00:00 UTC),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn serializes_flat_with_iso_times() {
        let value = serde_json::to_value(entry(json!({"title": "Morning News"}))).expect("json");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "start": "2023-01-01T10:00:00Z",
                "stop": "2023-01-01T11:00:00Z",
                "title": "Morning News",
            })
        );
    }

    #[test]
    fn field_text_renders_non_strings_as_json() {
        let entry = entry(json!({"title": "Jazz", "episode": 12}));
        assert_eq!(entry.field_text("title").as_deref(), Some("Jazz"));
        assert_eq!(entry.field_text("episode").as_deref(), Some("12"));
        assert_eq!(entry.field_text("description"), None);
    }

    #[test]
    fn overlap_is_inclusive_at_both_edges() {
        let entry = entry(json!({}));
        let start = datetime!(2023-01-01 10:00:00 UTC);
        let stop = datetime!(2023-01-01 11:00:00 UTC);
        assert!(entry.overlaps(start, start));
        assert!(entry.overlaps(stop, stop));
        assert!(!entry.overlaps(
            datetime!(2023-01-01 11:00:01 UTC),
            datetime!(2023-01-01 11:00:01 UTC)
        ));
        assert!(!entry.overlaps(
            datetime!(2023-01-01 09:00:00 UTC),
            datetime!(2023-01-01 09:59:59 UTC)
        ));
    }
}
