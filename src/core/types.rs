use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64, unix_millis_to_datetime};
use crate::error::{ChartError, ChartResult};

/// Kind of independent-axis values carried by a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DataType {
    #[default]
    Linear,
    Temporal,
}

/// Independent-axis value: a plain number or a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Time(DateTime<Utc>),
}

impl XValue {
    #[must_use]
    pub fn data_type(self) -> DataType {
        match self {
            Self::Number(_) => DataType::Linear,
            Self::Time(_) => DataType::Temporal,
        }
    }

    /// Numeric representation used for scale math. Times map to unix milliseconds.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::Time(time) => datetime_to_unix_millis(time),
        }
    }

    /// Rebuilds a value of the given type from its numeric representation.
    pub fn from_f64(data_type: DataType, value: f64) -> ChartResult<Self> {
        match data_type {
            DataType::Linear => Ok(Self::Number(value)),
            DataType::Temporal => unix_millis_to_datetime(value).map(Self::Time),
        }
    }

    /// Hashable key used to group data by value.
    #[must_use]
    pub fn key(self) -> OrderedFloat<f64> {
        OrderedFloat(self.as_f64())
    }

    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value),
            Self::Time(_) => None,
        }
    }

    #[must_use]
    pub fn as_time(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Number(_) => None,
            Self::Time(time) => Some(time),
        }
    }

    /// Compares two values of the same type; mixed types are unordered.
    #[must_use]
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.partial_cmp(&right),
            (Self::Time(left), Self::Time(right)) => Some(left.cmp(&right)),
            _ => None,
        }
    }
}

impl From<f64> for XValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for XValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Time(time) => write!(f, "{}", time.to_rfc3339()),
        }
    }
}

/// One bound data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub x: XValue,
    pub y: f64,
}

impl Datum {
    #[must_use]
    pub fn new(x: impl Into<XValue>, y: f64) -> Self {
        Self { x: x.into(), y }
    }

    #[must_use]
    pub fn number(x: f64, y: f64) -> Self {
        Self::new(x, y)
    }

    #[must_use]
    pub fn time(x: DateTime<Utc>, y: f64) -> Self {
        Self::new(x, y)
    }

    pub fn from_decimal(x: impl Into<XValue>, y: Decimal) -> ChartResult<Self> {
        Ok(Self {
            x: x.into(),
            y: decimal_to_f64(y, "y")?,
        })
    }

    #[must_use]
    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }
}

/// Pixel-space rectangle the scales map into.
///
/// Pixel Y grows downward, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ContentRect {
    #[must_use]
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rect anchored at the origin with the given size.
    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|value| value.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidContentRect {
                left: self.left,
                right: self.right,
                top: self.top,
                bottom: self.bottom,
            });
        }
        Ok(self)
    }
}

impl Default for ContentRect {
    fn default() -> Self {
        Self::from_size(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn time_values_round_trip_through_millis() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let value = XValue::from(time);
        let rebuilt = XValue::from_f64(DataType::Temporal, value.as_f64()).expect("rebuild");
        assert_eq!(rebuilt, value);
    }

    #[test]
    fn mixed_values_do_not_compare() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(XValue::Number(1.0).compare(XValue::Time(time)).is_none());
        assert_eq!(
            XValue::Number(1.0).compare(XValue::Number(2.0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn inverted_rect_is_rejected() {
        assert!(ContentRect::new(0.0, 100.0, 100.0, 0.0).validate().is_err());
        assert!(ContentRect::new(0.0, 100.0, 0.0, 100.0).validate().is_ok());
    }

    #[test]
    fn decimal_y_values_convert_to_f64() {
        let datum = Datum::from_decimal(2.0, Decimal::new(1_250, 2)).expect("decimal");
        assert_eq!(datum, Datum::number(2.0, 12.5));
    }
}
