use chrono::format::{self, ParseError, ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::error::CandleError;

/// Date-time layouts that end in a UTC offset. Each is tried with `%z` and `%:z`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Layouts without an offset. Naive values are taken as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Hour-only layouts; minutes and seconds default to zero.
const NAIVE_HOUR_FORMATS: &[&str] = &["%Y-%m-%dT%H", "%Y-%m-%d %H", "%Y%m%dT%H"];

/// A price or volume as supplied by the caller, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DecimalInput {
    Integer(i128),
    Float(f64),
    Text(String),
    Decimal(Decimal),
}

impl DecimalInput {
    /// Convert to an exact decimal.
    ///
    /// Integers, floats and strings all go through their string rendering, so a
    /// float lands on its shortest round-trip digits (`3000000.5`) instead of
    /// the full binary expansion. Decimals pass through untouched.
    pub fn normalize(self, field: &'static str) -> Result<Decimal, CandleError> {
        match self {
            DecimalInput::Integer(value) => parse_decimal(field, &value.to_string()),
            DecimalInput::Float(value) => parse_decimal(field, &value.to_string()),
            DecimalInput::Text(value) => parse_decimal(field, &value),
            DecimalInput::Decimal(value) => Ok(value),
        }
    }
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, CandleError> {
    let text = raw.trim();
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    };
    parsed.map_err(|source| CandleError::InvalidDecimal {
        field,
        value: raw.to_string(),
        source,
    })
}

macro_rules! integer_input {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DecimalInput {
                fn from(value: $ty) -> Self {
                    DecimalInput::Integer(value.into())
                }
            }
        )*
    };
}

integer_input!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<isize> for DecimalInput {
    fn from(value: isize) -> Self {
        DecimalInput::Integer(value as i128)
    }
}

impl From<usize> for DecimalInput {
    fn from(value: usize) -> Self {
        DecimalInput::Integer(value as i128)
    }
}

impl From<u128> for DecimalInput {
    fn from(value: u128) -> Self {
        // Above i128::MAX is also beyond Decimal; keep the digits so normalize reports it.
        i128::try_from(value)
            .map(DecimalInput::Integer)
            .unwrap_or_else(|_| DecimalInput::Text(value.to_string()))
    }
}

impl From<f64> for DecimalInput {
    fn from(value: f64) -> Self {
        DecimalInput::Float(value)
    }
}

impl From<f32> for DecimalInput {
    /// Widens through the `f32` rendering, so `0.1f32` stays `0.1` rather than
    /// picking up the binary tail of a direct `f64` cast.
    fn from(value: f32) -> Self {
        DecimalInput::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

impl From<&str> for DecimalInput {
    fn from(value: &str) -> Self {
        DecimalInput::Text(value.to_string())
    }
}

impl From<String> for DecimalInput {
    fn from(value: String) -> Self {
        DecimalInput::Text(value)
    }
}

impl From<Decimal> for DecimalInput {
    fn from(value: Decimal) -> Self {
        DecimalInput::Decimal(value)
    }
}

/// An open or close time as supplied by the caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampInput {
    /// ISO-8601 text, with or without a UTC offset.
    Text(String),
    DateTime(DateTime<Utc>),
}

impl TimestampInput {
    pub fn normalize(self, field: &'static str) -> Result<DateTime<Utc>, CandleError> {
        match self {
            TimestampInput::Text(value) => parse_timestamp(field, &value),
            TimestampInput::DateTime(value) => Ok(value),
        }
    }
}

fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, CandleError> {
    let text = raw.trim();
    let mut best = match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => return Ok(date.and_time(NaiveTime::MIN).and_utc()),
        Err(e) => e,
    };
    let mut keep = |e: ParseError| {
        if error_rank(&e) > error_rank(&best) {
            best = e;
        }
    };

    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => keep(e),
    }

    // chrono's %z does not take `Z`, so spell it as an explicit zero offset.
    let with_offset = match text.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => text.to_string(),
    };
    for layout in OFFSET_DATETIME_FORMATS {
        for offset in ["%z", "%:z"] {
            match DateTime::parse_from_str(&with_offset, &format!("{layout}{offset}")) {
                Ok(dt) => return Ok(dt.with_timezone(&Utc)),
                Err(e) => keep(e),
            }
        }
    }

    for layout in NAIVE_DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(text, layout) {
            Ok(naive) => return Ok(naive.and_utc()),
            Err(e) => keep(e),
        }
    }

    for layout in NAIVE_HOUR_FORMATS {
        match parse_hour_only(text, layout) {
            Ok(naive) => return Ok(naive.and_utc()),
            Err(e) => keep(e),
        }
    }

    Err(CandleError::InvalidTimestamp {
        field,
        value: raw.to_string(),
        source: best,
    })
}

/// `NaiveDateTime::parse_from_str` insists on minutes; fill them in here.
fn parse_hour_only(text: &str, layout: &str) -> format::ParseResult<NaiveDateTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(layout))?;
    parsed.set_minute(0)?;
    parsed.to_naive_datetime_with_offset(0)
}

/// How far a layout got before failing. A value that matched the layout but
/// was out of range says more than a layout that never matched.
fn error_rank(e: &ParseError) -> u8 {
    match e.kind() {
        ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => 3,
        ParseErrorKind::NotEnough => 2,
        ParseErrorKind::TooLong | ParseErrorKind::TooShort => 1,
        _ => 0,
    }
}

impl From<&str> for TimestampInput {
    fn from(value: &str) -> Self {
        TimestampInput::Text(value.to_string())
    }
}

impl From<String> for TimestampInput {
    fn from(value: String) -> Self {
        TimestampInput::Text(value)
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimestampInput::DateTime(value)
    }
}

impl From<NaiveDateTime> for TimestampInput {
    fn from(value: NaiveDateTime) -> Self {
        TimestampInput::DateTime(value.and_utc())
    }
}
