//! Typed cell values returned inside risk-analysis histograms.
//!
//! On the wire a DLP `Value` is an object with at most one of its
//! `*Value` fields set. It is decoded into the [`Value`] enum by field
//! presence, so legitimate `0`, `0.0`, `""` and `false` values are kept.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single typed value from a BigQuery row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WireValue", into = "WireValue")]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Time(TimeOfDay),
    Date(Date),
    DayOfWeek(DayOfWeek),
    /// No field was set (a SQL `NULL`).
    #[default]
    Null,
}

/// Wall-clock time without a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeOfDay {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
    #[serde(default)]
    pub nanos: u32,
}

/// Calendar date without a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Date {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    DayOfWeekUnspecified,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireValue {
    #[serde(
        default,
        with = "crate::int64::option",
        skip_serializing_if = "Option::is_none"
    )]
    integer_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    float_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp_value: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_value: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_value: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_week_value: Option<DayOfWeek>,
}

impl From<WireValue> for Value {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue {
                integer_value: Some(v),
                ..
            } => Value::Integer(v),
            WireValue {
                float_value: Some(v),
                ..
            } => Value::Float(v),
            WireValue {
                string_value: Some(v),
                ..
            } => Value::String(v),
            WireValue {
                boolean_value: Some(v),
                ..
            } => Value::Boolean(v),
            WireValue {
                timestamp_value: Some(v),
                ..
            } => Value::Timestamp(v),
            WireValue {
                time_value: Some(v),
                ..
            } => Value::Time(v),
            WireValue {
                date_value: Some(v),
                ..
            } => Value::Date(v),
            WireValue {
                day_of_week_value: Some(v),
                ..
            } => Value::DayOfWeek(v),
            _ => Value::Null,
        }
    }
}

impl From<Value> for WireValue {
    fn from(value: Value) -> Self {
        let mut wire = WireValue::default();
        match value {
            Value::Integer(v) => wire.integer_value = Some(v),
            Value::Float(v) => wire.float_value = Some(v),
            Value::String(v) => wire.string_value = Some(v),
            Value::Boolean(v) => wire.boolean_value = Some(v),
            Value::Timestamp(v) => wire.timestamp_value = Some(v),
            Value::Time(v) => wire.time_value = Some(v),
            Value::Date(v) => wire.date_value = Some(v),
            Value::DayOfWeek(v) => wire.day_of_week_value = Some(v),
            Value::Null => {}
        }
        wire
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Timestamp(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Time(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::DayOfWeek(v) => write!(f, "{v}"),
            Value::Null => f.write_str("null"),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.nanos > 0 {
            write!(f, ".{:09}", self.nanos)?;
        }
        Ok(())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::DayOfWeekUnspecified => "DAY_OF_WEEK_UNSPECIFIED",
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
            DayOfWeek::Sunday => "SUNDAY",
        };
        f.write_str(name)
    }
}

/// Render an ordered list of values as `[a, b, c]`.
pub fn format_values(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}
