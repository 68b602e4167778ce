use serde::{Deserialize, Serialize};

use crate::animation::AnimateSettings;
use crate::core::{UnifiedDomain, XValue};
use crate::error::{ChartError, ChartResult};
use crate::layout::padding::{ManualPadding, Padding, padding_as_manual};

/// One bound of a domain override.
///
/// In JSON a bound is `"auto"`, `"extent"` (also spelled `"min"` or `"max"`)
/// or a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBound<T>", into = "RawBound<T>")]
pub enum DomainBound<T: Clone> {
    /// Resolved extent widened to include `0` on the dependent axis.
    Auto,
    /// Resolved extent, always.
    Extent,
    Fixed(T),
}

impl<T: Clone> Default for DomainBound<T> {
    fn default() -> Self {
        Self::Auto
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BoundKeyword {
    Auto,
    #[serde(alias = "min", alias = "max")]
    Extent,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawBound<T> {
    Keyword(BoundKeyword),
    Value(T),
}

impl<T: Clone> From<RawBound<T>> for DomainBound<T> {
    fn from(raw: RawBound<T>) -> Self {
        match raw {
            RawBound::Keyword(BoundKeyword::Auto) => Self::Auto,
            RawBound::Keyword(BoundKeyword::Extent) => Self::Extent,
            RawBound::Value(value) => Self::Fixed(value),
        }
    }
}

impl<T: Clone> From<DomainBound<T>> for RawBound<T> {
    fn from(bound: DomainBound<T>) -> Self {
        match bound {
            DomainBound::Auto => Self::Keyword(BoundKeyword::Auto),
            DomainBound::Extent => Self::Keyword(BoundKeyword::Extent),
            DomainBound::Fixed(value) => Self::Value(value),
        }
    }
}

/// Partial override of a group's resolved domain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorthandDomain {
    pub x: Option<[DomainBound<XValue>; 2]>,
    pub y: Option<[DomainBound<f64>; 2]>,
}

impl ShorthandDomain {
    /// `x` spans the data, `y` spans the data and `0`.
    #[must_use]
    pub fn auto() -> Self {
        Self {
            x: Some([DomainBound::Auto, DomainBound::Auto]),
            y: Some([DomainBound::Auto, DomainBound::Auto]),
        }
    }

    /// Applies the override to a resolved domain. Point groups are kept.
    pub fn apply(&self, raw: &UnifiedDomain) -> ChartResult<UnifiedDomain> {
        let x_domain = match self.x {
            Some([low, high]) => (
                resolve_x_bound(low, raw.x_domain.0, raw)?,
                resolve_x_bound(high, raw.x_domain.1, raw)?,
            ),
            None => raw.x_domain,
        };
        let (y_min, y_max) = raw.y_domain;
        let y_domain = match self.y {
            Some([low, high]) => (
                match low {
                    DomainBound::Auto => y_min.min(0.0),
                    DomainBound::Extent => y_min,
                    DomainBound::Fixed(value) => value,
                },
                match high {
                    DomainBound::Auto => y_max.max(0.0),
                    DomainBound::Extent => y_max,
                    DomainBound::Fixed(value) => value,
                },
            ),
            None => (y_min.min(0.0), y_max.max(0.0)),
        };
        if !y_domain.0.is_finite() || !y_domain.1.is_finite() {
            return Err(ChartError::InvalidConfig(
                "fixed y bounds must be finite".to_owned(),
            ));
        }
        if y_domain.0 > y_domain.1 {
            return Err(ChartError::InvalidConfig(format!(
                "y domain override resolves to an inverted domain ({}, {})",
                y_domain.0, y_domain.1
            )));
        }

        Ok(UnifiedDomain {
            x_domain,
            y_domain,
            ..raw.clone()
        })
    }
}

fn resolve_x_bound(
    bound: DomainBound<XValue>,
    extent: XValue,
    raw: &UnifiedDomain,
) -> ChartResult<XValue> {
    match bound {
        DomainBound::Auto | DomainBound::Extent => Ok(extent),
        DomainBound::Fixed(value) => {
            if value.data_type() != raw.data_type {
                return Err(ChartError::DomainMismatch {
                    expected: raw.data_type,
                    found: value.data_type(),
                });
            }
            if !value.as_f64().is_finite() {
                return Err(ChartError::InvalidConfig(
                    "fixed x bounds must be finite".to_owned(),
                ));
            }
            Ok(value)
        }
    }
}

/// Per-group settings, loadable from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// `None` uses the raw resolved domain.
    #[serde(default = "default_domain")]
    pub domain: Option<ShorthandDomain>,
    /// Pixel padding applied inside the scales' domains.
    #[serde(default)]
    pub domain_padding: Option<Padding>,
    /// Animation settings inherited by every element in the group.
    #[serde(default)]
    pub animate: Option<AnimateSettings>,
    /// Gap between side-by-side bars, in pixels.
    #[serde(default)]
    pub spread: f64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            domain_padding: None,
            animate: None,
            spread: 0.0,
        }
    }
}

impl GroupConfig {
    #[must_use]
    pub fn with_domain(mut self, domain: Option<ShorthandDomain>) -> Self {
        self.domain = domain;
        self
    }

    #[must_use]
    pub fn with_domain_padding(mut self, padding: Padding) -> Self {
        self.domain_padding = Some(padding);
        self
    }

    #[must_use]
    pub fn with_animate(mut self, animate: AnimateSettings) -> Self {
        self.animate = Some(animate);
        self
    }

    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    #[must_use]
    pub fn manual_padding(&self) -> ManualPadding {
        padding_as_manual(self.domain_padding)
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.manual_padding().validate()?;
        if let Some(animate) = self.animate {
            animate.validate()?;
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(ChartError::InvalidConfig(
                "spread must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_domain() -> Option<ShorthandDomain> {
    Some(ShorthandDomain::auto())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn raw_domain() -> UnifiedDomain {
        UnifiedDomain {
            x_domain: (XValue::Number(1.0), XValue::Number(3.0)),
            y_domain: (2.0, 5.0),
            ..UnifiedDomain::bootstrap()
        }
    }

    #[test]
    fn auto_low_y_bound_is_zero() {
        let resolved = ShorthandDomain::auto().apply(&raw_domain()).expect("apply");
        assert_eq!(resolved.y_domain, (0.0, 5.0));
        assert_eq!(resolved.x_domain, (XValue::Number(1.0), XValue::Number(3.0)));
    }

    #[test]
    fn missing_y_override_runs_from_zero() {
        let domain = ShorthandDomain {
            x: None,
            y: None,
        };
        let resolved = domain.apply(&raw_domain()).expect("apply");
        assert_eq!(resolved.y_domain, (0.0, 5.0));
    }

    #[test]
    fn auto_y_bounds_include_zero_for_negative_data() {
        let negative = UnifiedDomain {
            y_domain: (-5.0, -1.0),
            ..raw_domain()
        };
        let resolved = ShorthandDomain::auto().apply(&negative).expect("apply");
        assert_eq!(resolved.y_domain, (-5.0, 0.0));

        let unset = ShorthandDomain { x: None, y: None };
        assert_eq!(unset.apply(&negative).expect("apply").y_domain, (-5.0, 0.0));
    }

    #[test]
    fn inverted_y_override_is_rejected() {
        let domain = ShorthandDomain {
            x: None,
            y: Some([DomainBound::Fixed(10.0), DomainBound::Extent]),
        };
        let err = domain.apply(&raw_domain()).expect_err("inverted");
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn fixed_x_bound_of_wrong_type_is_a_mismatch() {
        let time = chrono::DateTime::from_timestamp(0, 0).expect("epoch");
        let domain = ShorthandDomain {
            x: Some([DomainBound::Fixed(XValue::Time(time)), DomainBound::Auto]),
            y: None,
        };
        let err = domain.apply(&raw_domain()).expect_err("mismatch");
        assert!(matches!(
            err,
            ChartError::DomainMismatch {
                expected: DataType::Linear,
                found: DataType::Temporal
            }
        ));
    }

    #[test]
    fn keywords_parse_from_json() {
        let domain: ShorthandDomain =
            serde_json::from_str(r#"{ "x": ["min", 10], "y": [0, "max"] }"#).expect("parse");
        assert_eq!(
            domain.x,
            Some([DomainBound::Extent, DomainBound::Fixed(XValue::Number(10.0))])
        );
        assert_eq!(
            domain.y,
            Some([DomainBound::Fixed(0.0), DomainBound::Extent])
        );
    }
}
