//! Textual scalar encodings used by split files.
//!
//! Split files are written by a .NET application, so durations use the
//! `TimeSpan` tick grammar, timestamps a fixed US-style layout and booleans
//! the capitalized `True`/`False` spelling. Casing and padding are part of
//! the format: every encoder here reproduces the exact text the writer
//! would have produced.

use std::fmt::{self, Write as _};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::FormatError;

/// Layout of the `started`/`ended` attempt attributes.
pub const DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// One tick is 100 nanoseconds.
pub const NANOS_PER_TICK: i64 = 100;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

static TIME_SPAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?(?:([1-9][0-9]*)\.)?([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{7}))?$")
        .expect("Invalid regex")
});

/// A signed duration with nanosecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpan(i64);

impl TimeSpan {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(NANOS_PER_SECOND))
    }

    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SECOND as f64
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether the value has a non-zero sub-second part at tick resolution.
    #[must_use]
    pub const fn has_fraction(self) -> bool {
        (self.0.unsigned_abs() % NANOS_PER_SECOND.unsigned_abs()) / NANOS_PER_TICK.unsigned_abs()
            != 0
    }
}

impl Add for TimeSpan {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for TimeSpan {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for TimeSpan {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_time(*self, true))
    }
}

impl Serialize for TimeSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_time(*self, true))
    }
}

/// Decode `[-][D.]HH:MM:SS[.fffffff]` into a [`TimeSpan`].
///
/// Hours must be below 24 and minutes/seconds below 60; the fraction, when
/// present, is exactly seven digits of 100ns ticks.
///
/// # Examples
///
/// ```
/// use lss_core::scalar::{decode_time_span, encode_time};
///
/// let span = decode_time_span("1.01:55:11.1422649").unwrap();
/// assert_eq!(encode_time(span, true), "1.01:55:11.1422649");
/// ```
pub fn decode_time_span(text: &str) -> Result<TimeSpan, FormatError> {
    const EXPECTED: &str = "duration ([-][D.]HH:MM:SS[.fffffff])";
    let invalid = || FormatError::new(text, EXPECTED);

    let captures = TIME_SPAN_PATTERN.captures(text).ok_or_else(invalid)?;
    let number = |index: usize| -> Result<i64, FormatError> {
        captures
            .get(index)
            .map_or(Ok(0), |m| m.as_str().parse::<i64>().map_err(|_| invalid()))
    };

    let negative = captures.get(1).is_some();
    let days = number(2)?;
    let hours = number(3)?;
    let minutes = number(4)?;
    let seconds = number(5)?;
    let ticks = number(6)?;

    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let nanos = days
        .checked_mul(NANOS_PER_DAY)
        .and_then(|total| total.checked_add(hours * NANOS_PER_HOUR))
        .and_then(|total| total.checked_add(minutes * NANOS_PER_MINUTE))
        .and_then(|total| total.checked_add(seconds * NANOS_PER_SECOND))
        .and_then(|total| total.checked_add(ticks * NANOS_PER_TICK))
        .ok_or_else(invalid)?;

    // a signed zero would lose its sign on the way back out
    if negative && nanos == 0 {
        return Err(invalid());
    }
    Ok(TimeSpan(if negative { -nanos } else { nanos }))
}

/// Encode a duration the way `Time` fields are written.
///
/// The day prefix is only written for non-zero day counts. `include_fraction`
/// controls the seven-digit tick suffix; split files always include it.
#[must_use]
pub fn encode_time(span: TimeSpan, include_fraction: bool) -> String {
    encode_span(span, include_fraction)
}

/// Encode a duration the way the run `Offset` is written: the tick suffix
/// only appears when the sub-second part is non-zero.
#[must_use]
pub fn encode_offset(span: TimeSpan) -> String {
    encode_span(span, span.has_fraction())
}

fn encode_span(span: TimeSpan, include_fraction: bool) -> String {
    let nanos = span.0.unsigned_abs();
    let day = NANOS_PER_DAY.unsigned_abs();
    let hour = NANOS_PER_HOUR.unsigned_abs();
    let minute = NANOS_PER_MINUTE.unsigned_abs();
    let second = NANOS_PER_SECOND.unsigned_abs();

    let days = nanos / day;
    let hours = nanos % day / hour;
    let minutes = nanos % hour / minute;
    let seconds = nanos % minute / second;
    let ticks = nanos % second / NANOS_PER_TICK.unsigned_abs();

    let mut output = String::with_capacity(20);
    if span.is_negative() {
        output.push('-');
    }
    if days > 0 {
        let _ = write!(output, "{days}.");
    }
    let _ = write!(output, "{hours:02}:{minutes:02}:{seconds:02}");
    if include_fraction {
        let _ = write!(output, ".{ticks:07}");
    }
    output
}

/// Decode an attempt timestamp (`MM/DD/YYYY HH:MM:SS`).
///
/// The text must be exactly what [`encode_datetime`] would produce for the
/// parsed value, so unpadded or otherwise lenient spellings are rejected.
pub fn decode_datetime(text: &str) -> Result<NaiveDateTime, FormatError> {
    const EXPECTED: &str = "timestamp (MM/DD/YYYY HH:MM:SS)";
    let parsed = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .map_err(|_| FormatError::new(text, EXPECTED))?;
    if encode_datetime(parsed) != text {
        return Err(FormatError::new(text, EXPECTED));
    }
    Ok(parsed)
}

#[must_use]
pub fn encode_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Decode a synced flag; only `True` and `False` are accepted.
pub fn decode_flag(text: &str) -> Result<bool, FormatError> {
    match text {
        "True" => Ok(true),
        "False" => Ok(false),
        _ => Err(FormatError::new(text, "flag (True/False)")),
    }
}

#[must_use]
pub const fn encode_flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Decode a non-negative decimal count such as `AttemptCount`.
pub fn decode_count(text: &str) -> Result<u32, FormatError> {
    const EXPECTED: &str = "non-negative integer";
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FormatError::new(text, EXPECTED));
    }
    text.parse().map_err(|_| FormatError::new(text, EXPECTED))
}

#[must_use]
pub fn encode_count(value: u32) -> String {
    value.to_string()
}
