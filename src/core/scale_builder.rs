use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::domain::UnifiedDomain;
use crate::core::scale::LinearScale;
use crate::core::ticks::TickList;
use crate::core::time_scale::TimeScale;
use crate::core::types::{ContentRect, DataType, XValue};
use crate::error::{ChartError, ChartResult};
use crate::layout::padding::ManualPadding;

/// Smallest span a numeric domain is widened to when its bounds coincide.
pub const MIN_LINEAR_SPAN: f64 = 1.0;
/// Smallest span, in milliseconds, for a temporal domain.
pub const MIN_TEMPORAL_SPAN_MS: f64 = 1_000.0;

/// Independent-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum XScale {
    Linear(LinearScale),
    Time(TimeScale),
}

impl XScale {
    #[must_use]
    pub fn data_type(self) -> DataType {
        match self {
            Self::Linear(_) => DataType::Linear,
            Self::Time(_) => DataType::Temporal,
        }
    }

    #[must_use]
    pub fn domain(self) -> (XValue, XValue) {
        match self {
            Self::Linear(scale) => {
                let (start, end) = scale.domain();
                (XValue::Number(start), XValue::Number(end))
            }
            Self::Time(scale) => {
                let (start, end) = scale.domain();
                (XValue::Time(start), XValue::Time(end))
            }
        }
    }

    /// Domain in scale units; times are unix milliseconds.
    #[must_use]
    pub fn domain_f64(self) -> (f64, f64) {
        self.as_linear().domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.as_linear().range()
    }

    #[must_use]
    pub fn as_linear(self) -> LinearScale {
        match self {
            Self::Linear(scale) => scale,
            Self::Time(scale) => scale.as_linear(),
        }
    }

    /// Copy with a replaced domain given in scale units.
    pub fn with_domain_f64(self, domain: (f64, f64)) -> ChartResult<Self> {
        match self {
            Self::Linear(scale) => scale.with_domain(domain).map(Self::Linear),
            Self::Time(scale) => {
                let start = XValue::from_f64(DataType::Temporal, domain.0)?;
                let end = XValue::from_f64(DataType::Temporal, domain.1)?;
                match (start, end) {
                    (XValue::Time(start), XValue::Time(end)) => {
                        scale.with_domain((start, end)).map(Self::Time)
                    }
                    _ => Err(ChartError::InvalidData(
                        "time scale domain must be temporal".to_owned(),
                    )),
                }
            }
        }
    }

    /// Maps a value of the scale's own type; mismatched values map through
    /// their numeric representation.
    #[must_use]
    pub fn map(self, value: XValue) -> f64 {
        self.as_linear().map(value.as_f64())
    }

    pub fn invert(self, pixel: f64) -> ChartResult<XValue> {
        XValue::from_f64(self.data_type(), self.as_linear().invert(pixel))
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> TickList<XValue> {
        match self {
            Self::Linear(scale) => scale.ticks(count).into_iter().map(XValue::Number).collect(),
            Self::Time(scale) => scale.ticks(count).into_iter().map(XValue::Time).collect(),
        }
    }

    /// Explicit tick values of this scale's type that lie inside the domain.
    #[must_use]
    pub fn ticks_from(self, values: &[XValue]) -> TickList<XValue> {
        let data_type = self.data_type();
        let (start, end) = self.domain_f64();
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        values
            .iter()
            .copied()
            .filter(|value| value.data_type() == data_type)
            .filter(|value| {
                let numeric = value.as_f64();
                numeric >= low && numeric <= high
            })
            .collect()
    }
}

/// Shared independent and dependent scales of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePair {
    pub x: XScale,
    pub y: LinearScale,
}

/// Builds the scale pair for a resolved domain.
///
/// The independent range runs left to right; the dependent range runs bottom
/// to top. Padding is given in pixels and widens the domains so the padding
/// stays constant on screen.
pub fn build_scales(
    domain: &UnifiedDomain,
    rect: ContentRect,
    padding: ManualPadding,
) -> ChartResult<ScalePair> {
    let rect = rect.validate()?;
    let padding = padding.validate()?;

    let min_x_span = match domain.data_type {
        DataType::Linear => MIN_LINEAR_SPAN,
        DataType::Temporal => MIN_TEMPORAL_SPAN_MS,
    };
    let x_domain = widen_degenerate(domain.x_domain_f64(), min_x_span);
    let y_domain = widen_degenerate(domain.y_domain, MIN_LINEAR_SPAN);

    let x_linear = LinearScale::new(x_domain, (rect.left, rect.right))?;
    let y_linear = LinearScale::new(y_domain, (rect.bottom, rect.top))?;

    let x_linear = pad_x_scale(x_linear, padding)?;
    let y_linear = pad_y_scale(y_linear, padding)?;

    let x = match domain.data_type {
        DataType::Linear => XScale::Linear(x_linear),
        DataType::Temporal => {
            let (start, end) = x_linear.domain();
            match (
                XValue::from_f64(DataType::Temporal, start)?,
                XValue::from_f64(DataType::Temporal, end)?,
            ) {
                (XValue::Time(start), XValue::Time(end)) => {
                    XScale::Time(TimeScale::new((start, end), x_linear.range())?)
                }
                _ => {
                    return Err(ChartError::InvalidData(
                        "temporal domain produced non-temporal bounds".to_owned(),
                    ));
                }
            }
        }
    };

    debug!(
        data_type = ?domain.data_type,
        x_domain = ?x.domain_f64(),
        y_domain = ?y_linear.domain(),
        "built scale pair"
    );

    Ok(ScalePair { x, y: y_linear })
}

/// Widens a zero-span domain symmetrically, keeping a non-negative low bound
/// non-negative.
fn widen_degenerate(domain: (f64, f64), min_span: f64) -> (f64, f64) {
    let (start, end) = domain;
    if start != end {
        return domain;
    }
    let half = min_span / 2.0;
    if start >= 0.0 && start - half < 0.0 {
        return (start, start + min_span);
    }
    (start - half, end + half)
}

/// Widens the independent domain by the left/right pixel padding.
pub fn pad_x_scale(scale: LinearScale, padding: ManualPadding) -> ChartResult<LinearScale> {
    if padding.left == 0.0 && padding.right == 0.0 {
        return Ok(scale);
    }
    let (start, end) = scale.domain();
    let (left, right) = scale.range();
    let low_delta = scale.invert(left + padding.left) - start;
    let high_delta = end - scale.invert(right - padding.right);
    scale.with_domain((start - low_delta, end + high_delta))
}

/// Widens the dependent domain by the bottom/top pixel padding.
///
/// A low bound that was non-negative never becomes negative.
pub fn pad_y_scale(scale: LinearScale, padding: ManualPadding) -> ChartResult<LinearScale> {
    if padding.top == 0.0 && padding.bottom == 0.0 {
        return Ok(scale);
    }
    let (lowest, highest) = scale.domain();
    let (bottom, top) = scale.range();
    let mut padded_lowest = lowest - (scale.invert(bottom - padding.bottom) - lowest);
    let padded_highest = highest + (highest - scale.invert(top + padding.top));
    if lowest >= 0.0 && padded_lowest < 0.0 {
        padded_lowest = 0.0;
    }
    scale.with_domain((padded_lowest, padded_highest))
}
