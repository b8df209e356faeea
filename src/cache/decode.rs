//! Payload decoding and row normalization.
//!
//! Decoding never fails: a payload that is not a JSON object becomes
//! `{"raw_data": <payload>}`. Normalization fails only for rows whose
//! timestamps are unusable, and the batch fold skips those rows.

use metrics::counter;
use serde_json::{Map, Value};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::domain::entities::{NormalizedEntry, RAW_DATA_KEY, RESERVED_KEYS, ScheduleRecord};

use super::metrics::METRIC_ROWS_SKIPPED;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("payload is JSON but not an object")]
    NotAnObject,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRow {
    #[error("row {id}: `{column}` is missing")]
    MissingTimestamp { id: i64, column: &'static str },
    #[error("row {id}: `{column}` cannot be rendered as RFC 3339: {reason}")]
    UnrenderableTimestamp {
        id: i64,
        column: &'static str,
        reason: String,
    },
}

/// Result of normalizing a batch of rows.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub entries: Vec<NormalizedEntry>,
    pub skipped: usize,
}

pub fn try_decode(payload: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str::<Value>(payload)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}

pub fn decode_payload(payload: &str) -> Map<String, Value> {
    try_decode(payload).unwrap_or_else(|err| {
        debug!(error = %err, "payload kept as raw data");
        let mut raw = Map::new();
        raw.insert(RAW_DATA_KEY.to_string(), Value::String(payload.to_string()));
        raw
    })
}

pub fn normalize(record: ScheduleRecord) -> Result<NormalizedEntry, MalformedRow> {
    let start = checked_timestamp(record.id, "start", record.start)?;
    let stop = checked_timestamp(record.id, "stop", record.stop)?;

    let mut fields = decode_payload(&record.payload);
    for key in RESERVED_KEYS {
        fields.remove(key);
    }

    Ok(NormalizedEntry {
        id: record.id,
        start,
        stop,
        fields,
    })
}

/// Normalize every row, dropping malformed ones.
pub fn normalize_all(records: Vec<ScheduleRecord>) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        entries: Vec::with_capacity(records.len()),
        skipped: 0,
    };

    for record in records {
        match normalize(record) {
            Ok(entry) => batch.entries.push(entry),
            Err(err) => {
                warn!(
                    target = "chunt_schedule::cache::decode",
                    error = %err,
                    "Skipping malformed schedule row"
                );
                batch.skipped += 1;
            }
        }
    }

    if batch.skipped > 0 {
        counter!(METRIC_ROWS_SKIPPED).increment(batch.skipped as u64);
    }

    batch
}

fn checked_timestamp(
    id: i64,
    column: &'static str,
    value: Option<OffsetDateTime>,
) -> Result<OffsetDateTime, MalformedRow> {
    let value = value.ok_or(MalformedRow::MissingTimestamp { id, column })?;
    value
        .format(&Rfc3339)
        .map_err(|err| MalformedRow::UnrenderableTimestamp {
            id,
            column,
            reason: err.to_string(),
        })?;
    Ok(value)
}
