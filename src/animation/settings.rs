use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::error::{ChartError, ChartResult};

/// Margin added to an exit animation before the element is detached.
pub const EXIT_GRACE_MS: f64 = 20.0;

/// Duration and easing of element animations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimateSettings {
    #[serde(alias = "duration")]
    pub duration_ms: f64,
    #[serde(default)]
    pub ease: Ease,
}

impl AnimateSettings {
    #[must_use]
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ease: Ease::default(),
        }
    }

    #[must_use]
    pub fn with_ease(self, ease: Ease) -> Self {
        Self { ease, ..self }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(ChartError::InvalidConfig(
                "animation duration must be finite and >= 0".to_owned(),
            ));
        }
        if Duration::try_from_secs_f64((self.duration_ms + EXIT_GRACE_MS) / 1_000.0).is_err() {
            return Err(ChartError::InvalidConfig(format!(
                "animation duration of {} ms is not representable",
                self.duration_ms
            )));
        }
        Ok(self)
    }

    /// Unrepresentable durations saturate instead of failing; `validate`
    /// rejects them up front.
    #[must_use]
    pub fn duration(self) -> Duration {
        millis_to_duration(self.duration_ms)
    }

    /// Time an exiting element stays attached.
    #[must_use]
    pub fn exit_time(self) -> Duration {
        millis_to_duration(self.duration_ms.max(0.0) + EXIT_GRACE_MS)
    }

    /// Element settings win over group settings.
    #[must_use]
    pub fn resolve(element: Option<Self>, group: Option<Self>) -> Option<Self> {
        element.or(group)
    }
}

// `f64::max` maps NaN to 0.
fn millis_to_duration(millis: f64) -> Duration {
    Duration::try_from_secs_f64(millis.max(0.0) / 1_000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_duration_is_rejected_by_validation() {
        let err = AnimateSettings::new(1e300).validate().expect_err("too long");
        assert!(matches!(err, ChartError::InvalidConfig(_)));
        assert!(AnimateSettings::new(f64::INFINITY).validate().is_err());
        assert!(AnimateSettings::new(500.0).validate().is_ok());
    }

    #[test]
    fn unvalidated_durations_saturate() {
        assert_eq!(AnimateSettings::new(1e300).duration(), Duration::MAX);
        assert_eq!(AnimateSettings::new(1e300).exit_time(), Duration::MAX);
        assert_eq!(AnimateSettings::new(f64::NAN).duration(), Duration::ZERO);
        assert_eq!(AnimateSettings::new(-5.0).duration(), Duration::ZERO);
        assert_eq!(
            AnimateSettings::new(100.0).exit_time(),
            Duration::from_millis(120)
        );
    }
}
