//! Temporal values and their normalization
//!
//! The converter does not know how times should look in the output; it calls
//! a [`TimeFunc`] chosen by format name ([`TimeFormat`]) or injected by the
//! caller.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};
use std::fmt;
use std::sync::Arc;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Date, time or date-time value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
	Date(NaiveDate),
	Time(NaiveTime),
	/// Date-time without offset, interpreted as UTC
	DateTime(NaiveDateTime),
	/// Date-time with a fixed UTC offset
	DateTimeTz(DateTime<FixedOffset>),
}

/// Normalization function applied to every temporal value
pub type TimeFunc = Arc<dyn Fn(&Temporal) -> JsonValue + Send + Sync>;

/// Named time output formats
///
/// Unknown names fall back to [`TimeFormat::String`].
///
/// # Examples
///
/// ```
/// use simple_serializer_core::TimeFormat;
///
/// assert_eq!(TimeFormat::from_name("timestamp"), TimeFormat::Timestamp);
/// assert_eq!(TimeFormat::from_name("string"), TimeFormat::String);
/// assert_eq!(TimeFormat::from_name("rfc2822"), TimeFormat::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeFormat {
	/// Unix seconds
	#[default]
	Timestamp,
	/// `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d` or `%H:%M:%S`
	String,
}

impl TimeFormat {
	/// Resolve a format name
	pub fn from_name(name: &str) -> Self {
		match name.trim().to_ascii_lowercase().as_str() {
			"timestamp" => Self::Timestamp,
			_ => Self::String,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Timestamp => "timestamp",
			Self::String => "string",
		}
	}

	/// Normalization function for this format
	pub fn time_func(self) -> TimeFunc {
		match self {
			Self::Timestamp => Arc::new(to_timestamp),
			Self::String => Arc::new(to_display_string),
		}
	}
}

impl From<String> for TimeFormat {
	fn from(name: String) -> Self {
		Self::from_name(&name)
	}
}

impl From<TimeFormat> for String {
	fn from(format: TimeFormat) -> Self {
		format.as_str().to_string()
	}
}

impl fmt::Display for TimeFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Convert to Unix seconds
///
/// Whole seconds become an integer, anything with a sub-second part a float.
/// Dates count from midnight UTC, times from midnight.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use serde_json::json;
/// use simple_serializer_core::{Temporal, time::to_timestamp};
///
/// let created = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap().fixed_offset();
/// assert_eq!(to_timestamp(&Temporal::DateTimeTz(created)), json!(1609459200));
/// ```
pub fn to_timestamp(value: &Temporal) -> JsonValue {
	let (seconds, nanos) = match value {
		Temporal::DateTimeTz(dt) => (dt.timestamp(), dt.timestamp_subsec_nanos()),
		Temporal::DateTime(naive) => {
			let dt = naive.and_utc();
			(dt.timestamp(), dt.timestamp_subsec_nanos())
		}
		Temporal::Date(date) => (date.and_time(NaiveTime::MIN).and_utc().timestamp(), 0),
		Temporal::Time(time) => (i64::from(time.num_seconds_from_midnight()), time.nanosecond()),
	};

	if nanos == 0 {
		JsonValue::from(seconds)
	} else {
		let fractional = seconds as f64 + f64::from(nanos) / 1_000_000_000.0;
		Number::from_f64(fractional).map_or(JsonValue::Null, JsonValue::Number)
	}
}

/// Format as a human readable string
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use serde_json::json;
/// use simple_serializer_core::{Temporal, time::to_display_string};
///
/// let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
/// assert_eq!(to_display_string(&Temporal::Date(day)), json!("2024-02-29"));
/// ```
pub fn to_display_string(value: &Temporal) -> JsonValue {
	let text = match value {
		Temporal::DateTimeTz(dt) => dt.format(DATETIME_FORMAT).to_string(),
		Temporal::DateTime(naive) => naive.format(DATETIME_FORMAT).to_string(),
		Temporal::Date(date) => date.format(DATE_FORMAT).to_string(),
		Temporal::Time(time) => time.format(TIME_FORMAT).to_string(),
	};
	JsonValue::String(text)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use rstest::rstest;
	use serde_json::json;

	fn new_year() -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2021, 1, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap()
	}

	#[rstest]
	fn test_timestamp_naive_is_utc() {
		assert_eq!(to_timestamp(&Temporal::DateTime(new_year())), json!(1609459200));
	}

	#[rstest]
	fn test_timestamp_respects_offset() {
		let offset = FixedOffset::east_opt(9 * 3600).unwrap();
		let tokyo = offset.with_ymd_and_hms(2021, 1, 1, 9, 0, 0).unwrap();
		assert_eq!(to_timestamp(&Temporal::DateTimeTz(tokyo)), json!(1609459200));
	}

	#[rstest]
	fn test_timestamp_subsecond_is_float() {
		let dt = Utc.timestamp_opt(1609459200, 500_000_000).unwrap().fixed_offset();
		assert_eq!(to_timestamp(&Temporal::DateTimeTz(dt)), json!(1609459200.5));
	}

	#[rstest]
	fn test_timestamp_date_and_time() {
		let date = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
		assert_eq!(to_timestamp(&Temporal::Date(date)), json!(1609545600));

		let time = NaiveTime::from_hms_opt(1, 2, 3).unwrap();
		assert_eq!(to_timestamp(&Temporal::Time(time)), json!(3723));
	}

	#[rstest]
	#[case(Temporal::DateTime(new_year()), "2021-01-01 00:00:00")]
	#[case(Temporal::Date(NaiveDate::from_ymd_opt(2021, 3, 4).unwrap()), "2021-03-04")]
	#[case(Temporal::Time(NaiveTime::from_hms_opt(23, 5, 9).unwrap()), "23:05:09")]
	fn test_display_string(#[case] value: Temporal, #[case] expected: &str) {
		assert_eq!(to_display_string(&value), json!(expected));
	}

	#[rstest]
	fn test_format_serde_fallback() {
		let format: TimeFormat = serde_json::from_str(r#""TIMESTAMP""#).unwrap();
		assert_eq!(format, TimeFormat::Timestamp);

		let format: TimeFormat = serde_json::from_str(r#""unknown""#).unwrap();
		assert_eq!(format, TimeFormat::String);

		assert_eq!(serde_json::to_string(&TimeFormat::String).unwrap(), r#""string""#);
	}

	#[rstest]
	fn test_time_func_dispatch() {
		let value = Temporal::DateTime(new_year());
		assert_eq!((TimeFormat::Timestamp.time_func())(&value), json!(1609459200));
		assert_eq!(
			(TimeFormat::String.time_func())(&value),
			json!("2021-01-01 00:00:00")
		);
	}
}
