use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Padding resolved to one value per side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualPadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ManualPadding {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Rejects negative or non-finite sides.
    pub fn validate(self) -> ChartResult<Self> {
        let sides = [self.top, self.right, self.bottom, self.left];
        if sides.iter().any(|side| !side.is_finite() || *side < 0.0) {
            return Err(ChartError::InvalidConfig(
                "padding must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Shorthand padding as accepted in configuration.
///
/// JSON accepts a number, a `[vertical, horizontal]` pair or an object with
/// any subset of `top`, `right`, `bottom` and `left`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    Uniform(f64),
    Bidirectional([f64; 2]),
    Manual(ManualPadding),
}

impl Padding {
    #[must_use]
    pub fn as_manual(self) -> ManualPadding {
        match self {
            Self::Uniform(value) => ManualPadding::uniform(value),
            Self::Bidirectional([vertical, horizontal]) => ManualPadding {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            },
            Self::Manual(manual) => manual,
        }
    }
}

impl From<ManualPadding> for Padding {
    fn from(value: ManualPadding) -> Self {
        Self::Manual(value)
    }
}

/// Normalizes optional shorthand padding. Absent padding is zero on every side.
#[must_use]
pub fn padding_as_manual(padding: Option<Padding>) -> ManualPadding {
    padding.map_or(ManualPadding::ZERO, Padding::as_manual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bidirectional_maps_vertical_then_horizontal() {
        let manual = Padding::Bidirectional([4.0, 8.0]).as_manual();
        assert_eq!(manual.top, 4.0);
        assert_eq!(manual.bottom, 4.0);
        assert_eq!(manual.left, 8.0);
        assert_eq!(manual.right, 8.0);
    }

    #[test]
    fn partial_object_fills_missing_sides_with_zero() {
        let padding: Padding = serde_json::from_str(r#"{ "left": 12 }"#).expect("parse");
        assert_eq!(
            padding.as_manual(),
            ManualPadding {
                left: 12.0,
                ..ManualPadding::ZERO
            }
        );
    }

    #[test]
    fn absent_padding_is_zero() {
        assert!(padding_as_manual(None).is_zero());
    }

    #[test]
    fn negative_padding_is_rejected() {
        assert!(ManualPadding::uniform(-1.0).validate().is_err());
    }
}
