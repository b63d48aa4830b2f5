// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, SecondsFormat, Utc};

const JST_OFFSET_SECS: i32 = 9 * 60 * 60;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time formatted for storage.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Japan Standard Time (UTC+9, no DST).
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date of `instant` in JST.
pub fn jst_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&jst()).date_naive()
}

/// UTC instant of midnight JST at the start of `date`.
pub fn jst_midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) - Duration::seconds(i64::from(JST_OFFSET_SECS))).and_utc()
}

/// Parse an RFC3339 timestamp into UTC.
pub fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
