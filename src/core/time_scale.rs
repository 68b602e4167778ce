use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::scale::LinearScale;
use crate::core::ticks::{DEFAULT_TICK_COUNT, TickList, tick_step};
use crate::error::ChartResult;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

// 1969-12-28 is the first Sunday before the unix epoch.
const SUNDAY_EPOCH_OFFSET_MS: i64 = 4 * DAY_MS;

const MAX_GENERATED_TICKS: usize = 10_000;

/// Calendar interval used to place time ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    Millisecond(i64),
    Second(i64),
    Minute(i64),
    Hour(i64),
    Day(i64),
    Week,
    Month(u32),
    Year(i32),
}

const TICK_INTERVALS: [(TimeInterval, i64); 17] = [
    (TimeInterval::Second(1), SECOND_MS),
    (TimeInterval::Second(5), 5 * SECOND_MS),
    (TimeInterval::Second(15), 15 * SECOND_MS),
    (TimeInterval::Second(30), 30 * SECOND_MS),
    (TimeInterval::Minute(1), MINUTE_MS),
    (TimeInterval::Minute(5), 5 * MINUTE_MS),
    (TimeInterval::Minute(15), 15 * MINUTE_MS),
    (TimeInterval::Minute(30), 30 * MINUTE_MS),
    (TimeInterval::Hour(1), HOUR_MS),
    (TimeInterval::Hour(3), 3 * HOUR_MS),
    (TimeInterval::Hour(6), 6 * HOUR_MS),
    (TimeInterval::Hour(12), 12 * HOUR_MS),
    (TimeInterval::Day(1), DAY_MS),
    (TimeInterval::Day(2), 2 * DAY_MS),
    (TimeInterval::Week, WEEK_MS),
    (TimeInterval::Month(1), MONTH_MS),
    (TimeInterval::Month(3), 3 * MONTH_MS),
];

impl TimeInterval {
    /// Picks the interval whose duration is closest to `span / count`.
    #[must_use]
    pub fn for_span(start_ms: f64, end_ms: f64, count: usize) -> Self {
        let target = (end_ms - start_ms).abs() / count.max(1) as f64;
        let index = TICK_INTERVALS.partition_point(|(_, duration)| (*duration as f64) <= target);

        if index == TICK_INTERVALS.len() {
            let year_ms = YEAR_MS as f64;
            let step = tick_step(start_ms / year_ms, end_ms / year_ms, count).max(1.0);
            return Self::Year(step as i32);
        }
        if index == 0 {
            let step = tick_step(start_ms, end_ms, count).max(1.0);
            return Self::Millisecond(step as i64);
        }

        let (lower, lower_ms) = TICK_INTERVALS[index - 1];
        let (upper, upper_ms) = TICK_INTERVALS[index];
        if target / (lower_ms as f64) < (upper_ms as f64) / target {
            lower
        } else {
            upper
        }
    }

    fn fixed_step_ms(self) -> Option<i64> {
        match self {
            Self::Millisecond(step) => Some(step),
            Self::Second(step) => Some(step * SECOND_MS),
            Self::Minute(step) => Some(step * MINUTE_MS),
            Self::Hour(step) => Some(step * HOUR_MS),
            Self::Day(step) => Some(step * DAY_MS),
            Self::Week | Self::Month(_) | Self::Year(_) => None,
        }
    }

    /// Latest interval boundary at or before `time`.
    #[must_use]
    pub fn floor(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let millis = time.timestamp_millis();
        if let Some(step) = self.fixed_step_ms() {
            return DateTime::from_timestamp_millis(millis.div_euclid(step) * step);
        }
        match self {
            Self::Week => {
                let shifted = millis + SUNDAY_EPOCH_OFFSET_MS;
                DateTime::from_timestamp_millis(
                    shifted.div_euclid(WEEK_MS) * WEEK_MS - SUNDAY_EPOCH_OFFSET_MS,
                )
            }
            Self::Month(step) => {
                let month0 = time.month0() / step * step;
                Utc.with_ymd_and_hms(time.year(), month0 + 1, 1, 0, 0, 0)
                    .single()
            }
            Self::Year(step) => {
                let year = time.year().div_euclid(step) * step;
                Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
            }
            _ => None,
        }
    }

    /// Next boundary after an aligned `time`.
    #[must_use]
    pub fn offset(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(step) = self.fixed_step_ms() {
            return DateTime::from_timestamp_millis(time.timestamp_millis() + step);
        }
        match self {
            Self::Week => DateTime::from_timestamp_millis(time.timestamp_millis() + WEEK_MS),
            Self::Month(step) => time.checked_add_months(Months::new(step)),
            Self::Year(step) => Utc
                .with_ymd_and_hms(time.year() + step, 1, 1, 0, 0, 0)
                .single(),
            _ => None,
        }
    }
}

/// Continuous mapping from a time domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    domain_start: DateTime<Utc>,
    domain_end: DateTime<Utc>,
    millis: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> ChartResult<Self> {
        let millis = LinearScale::new(
            (
                datetime_to_unix_millis(domain.0),
                datetime_to_unix_millis(domain.1),
            ),
            range,
        )?;
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            millis,
        })
    }

    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn domain_millis(self) -> (f64, f64) {
        self.millis.domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.millis.range()
    }

    pub fn with_domain(self, domain: (DateTime<Utc>, DateTime<Utc>)) -> ChartResult<Self> {
        Self::new(domain, self.range())
    }

    /// Millisecond-domain linear view of this scale.
    #[must_use]
    pub fn as_linear(self) -> LinearScale {
        self.millis
    }

    #[must_use]
    pub fn map(self, time: DateTime<Utc>) -> f64 {
        self.as_linear().map(datetime_to_unix_millis(time))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        unix_millis_to_datetime(self.as_linear().invert(pixel))
    }

    /// Calendar-aligned ticks covering the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> TickList<DateTime<Utc>> {
        let mut ticks = TickList::new();
        if count == 0 {
            return ticks;
        }
        let reverse = self.domain_end < self.domain_start;
        let (low, high) = if reverse {
            (self.domain_end, self.domain_start)
        } else {
            (self.domain_start, self.domain_end)
        };
        if low == high {
            ticks.push(low);
            return ticks;
        }

        let interval = TimeInterval::for_span(
            datetime_to_unix_millis(low),
            datetime_to_unix_millis(high),
            count,
        );
        let mut cursor = interval.floor(low);
        if let Some(first) = cursor {
            if first < low {
                cursor = interval.offset(first);
            }
        }
        while let Some(tick) = cursor {
            if tick > high || ticks.len() >= MAX_GENERATED_TICKS {
                break;
            }
            ticks.push(tick);
            cursor = interval.offset(tick);
        }

        if reverse {
            ticks.reverse();
        }
        ticks
    }

    #[must_use]
    pub fn default_ticks(self) -> TickList<DateTime<Utc>> {
        self.ticks(DEFAULT_TICK_COUNT)
    }

    #[must_use]
    pub fn ticks_from(self, values: &[DateTime<Utc>]) -> TickList<DateTime<Utc>> {
        let (low, high) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        values
            .iter()
            .copied()
            .filter(|value| *value >= low && *value <= high)
            .collect()
    }

    pub fn interpolate_domain(
        from: (DateTime<Utc>, DateTime<Utc>),
        to: (DateTime<Utc>, DateTime<Utc>),
        t: f64,
    ) -> ChartResult<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = LinearScale::interpolate_domain(
            (datetime_to_unix_millis(from.0), datetime_to_unix_millis(from.1)),
            (datetime_to_unix_millis(to.0), datetime_to_unix_millis(to.1)),
            t,
        );
        Ok((unix_millis_to_datetime(start)?, unix_millis_to_datetime(end)?))
    }
}
