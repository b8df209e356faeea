//! Time lookup parsing for "what is on at" queries.
//!
//! A query is either an exact instant or a calendar day. Both become an
//! inclusive [`TimeWindow`]; entries are matched with an overlap test.

use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use super::error::DomainError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

// Offsets may be extended (`+01:00`) or basic (`+0100`); minutes and
// seconds of the time itself are optional.
const OFFSET_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour][optional [:[minute][optional [:[second][optional [.[subsecond]]]]]]][offset_hour sign:mandatory][optional [:]][offset_minute]"
);

const NAIVE_T_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour][optional [:[minute][optional [:[second][optional [.[subsecond]]]]]]]"
);

const NAIVE_SPACE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day] [hour][optional [:[minute][optional [:[second][optional [.[subsecond]]]]]]]"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeQuery {
    Instant(OffsetDateTime),
    Day(Date),
}

/// Inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeQuery {
    /// Parse a calendar date or an ISO-8601 timestamp. Timestamps without an
    /// offset are taken as UTC.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();

        if let Ok(date) = Date::parse(trimmed, DATE_FORMAT) {
            return Ok(Self::Day(date));
        }

        let normalized = match trimmed.strip_suffix(['Z', 'z']) {
            Some(head) => format!("{head}+00:00"),
            None => trimmed.to_string(),
        };

        if let Ok(instant) = OffsetDateTime::parse(&normalized, &Rfc3339) {
            return Ok(Self::Instant(instant));
        }
        if let Ok(instant) = OffsetDateTime::parse(&normalized, OFFSET_FORMAT) {
            return Ok(Self::Instant(instant));
        }
        for format in [NAIVE_T_FORMAT, NAIVE_SPACE_FORMAT] {
            if let Ok(naive) = PrimitiveDateTime::parse(&normalized, format) {
                return Ok(Self::Instant(naive.assume_utc()));
            }
        }

        Err(DomainError::invalid_time(input))
    }

    pub fn window(&self) -> TimeWindow {
        match *self {
            TimeQuery::Instant(instant) => TimeWindow {
                start: instant,
                end: instant,
            },
            TimeQuery::Day(date) => {
                let start = date.midnight().assume_utc();
                TimeWindow {
                    start,
                    end: start + Duration::days(1) - Duration::microseconds(1),
                }
            }
        }
    }
}
