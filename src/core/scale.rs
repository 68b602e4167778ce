use serde::{Deserialize, Serialize};

use crate::core::ticks::{DEFAULT_TICK_COUNT, TickList, linear_ticks};
use crate::error::{ChartError, ChartResult};

/// Continuous affine mapping from a numeric domain to a pixel range.
///
/// Domains keep their order as given, so `(0, 10)` mapped onto
/// `(bottom, top)` yields an upward-growing y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Copy of this scale with a replaced domain.
    pub fn with_domain(self, domain: (f64, f64)) -> ChartResult<Self> {
        Self::new(domain, self.range())
    }

    pub fn with_range(self, range: (f64, f64)) -> ChartResult<Self> {
        Self::new(self.domain(), range)
    }

    /// Maps a domain value into the range. A zero-span domain maps everything
    /// to the middle of the range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (pixel - self.range_start) / span
        };
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> TickList<f64> {
        linear_ticks(self.domain_start, self.domain_end, count)
    }

    #[must_use]
    pub fn default_ticks(self) -> TickList<f64> {
        self.ticks(DEFAULT_TICK_COUNT)
    }

    /// Keeps the explicit values that fall inside the domain, in input order.
    #[must_use]
    pub fn ticks_from(self, values: &[f64]) -> TickList<f64> {
        let (low, high) = ordered(self.domain_start, self.domain_end);
        values
            .iter()
            .copied()
            .filter(|value| *value >= low && *value <= high)
            .collect()
    }

    /// Domain interpolated between `from` and `to` at `t` in `[0, 1]`.
    #[must_use]
    pub fn interpolate_domain(from: (f64, f64), to: (f64, f64), t: f64) -> (f64, f64) {
        (lerp(from.0, to.0, t), lerp(from.1, to.1, t))
    }
}

pub(crate) fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_and_inverts_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (100.0, 0.0)).expect("valid scale");
        assert_eq!(scale.map(0.0), 100.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.invert(50.0), 5.0);
    }

    #[test]
    fn explicit_ticks_are_filtered_to_domain() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("valid scale");
        let ticks = scale.ticks_from(&[-1.0, 0.0, 5.0, 10.0, 11.0]);
        assert_eq!(ticks.as_slice(), &[0.0, 5.0, 10.0]);
    }

    #[test]
    fn rejects_non_finite_domain() {
        assert!(LinearScale::new((0.0, f64::INFINITY), (0.0, 1.0)).is_err());
    }

    #[test]
    fn zero_span_maps_to_range_middle() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0)).expect("valid scale");
        assert_eq!(scale.map(3.0), 50.0);
    }
}
