use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

const POLY_EXPONENT: f64 = 3.0;
const BACK_OVERSHOOT: f64 = 1.701_58;
const ELASTIC_AMPLITUDE: f64 = 1.0;
const ELASTIC_PERIOD: f64 = 0.3;

const B1: f64 = 4.0 / 11.0;
const B2: f64 = 6.0 / 11.0;
const B3: f64 = 8.0 / 11.0;
const B4: f64 = 3.0 / 4.0;
const B5: f64 = 9.0 / 11.0;
const B6: f64 = 10.0 / 11.0;
const B7: f64 = 15.0 / 16.0;
const B8: f64 = 21.0 / 22.0;
const B9: f64 = 63.0 / 64.0;
const B0: f64 = 1.0 / B1 / B1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseCurve {
    Back,
    Bounce,
    Circle,
    Cubic,
    Elastic,
    Exp,
    Linear,
    Poly,
    Quad,
    Sin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

/// Easing function applied to animation progress.
///
/// Names follow the `quad`, `quadIn`, `quadOut`, `quadInOut` convention; a
/// bare curve name is its in-out variant, except `bounce` and `elastic`
/// which default to out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ease {
    pub curve: EaseCurve,
    pub mode: EaseMode,
}

impl Ease {
    pub const LINEAR: Self = Self::new(EaseCurve::Linear, EaseMode::InOut);
    pub const QUAD: Self = Self::new(EaseCurve::Quad, EaseMode::InOut);

    #[must_use]
    pub const fn new(curve: EaseCurve, mode: EaseMode) -> Self {
        Self { curve, mode }
    }

    /// Eased value for progress `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.curve {
            EaseCurve::Linear => t,
            EaseCurve::Quad => self.by_mode(t, |t| t * t),
            EaseCurve::Cubic => self.by_mode(t, |t| t * t * t),
            EaseCurve::Poly => self.by_mode(t, |t| t.powf(POLY_EXPONENT)),
            EaseCurve::Sin => self.by_mode(t, sin_in),
            EaseCurve::Exp => self.by_mode(t, |t| tpmt(1.0 - t)),
            EaseCurve::Circle => self.by_mode(t, |t| 1.0 - (1.0 - t * t).max(0.0).sqrt()),
            EaseCurve::Back => self.by_mode(t, |t| t * t * (BACK_OVERSHOOT * (t - 1.0) + t)),
            EaseCurve::Bounce => self.by_mode(t, |t| 1.0 - bounce_out(1.0 - t)),
            EaseCurve::Elastic => self.by_mode(t, elastic_in),
        }
    }

    /// Derives out and in-out variants from the in curve.
    fn by_mode(self, t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
        match self.mode {
            EaseMode::In => ease_in(t),
            EaseMode::Out => 1.0 - ease_in(1.0 - t),
            EaseMode::InOut => {
                let doubled = t * 2.0;
                if doubled <= 1.0 {
                    ease_in(doubled) / 2.0
                } else {
                    (2.0 - ease_in(2.0 - doubled)) / 2.0
                }
            }
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Self::QUAD
    }
}

// 2^(-10x), rescaled so that tpmt(0) = 1 and tpmt(1) = 0.
fn tpmt(x: f64) -> f64 {
    (2f64.powf(-10.0 * x) - 0.000_976_562_5) * 1.000_977_517_106_549_4
}

fn sin_in(t: f64) -> f64 {
    if t >= 1.0 { 1.0 } else { 1.0 - (t * FRAC_PI_2).cos() }
}

fn bounce_out(t: f64) -> f64 {
    if t < B1 {
        B0 * t * t
    } else if t < B3 {
        let t = t - B2;
        B0 * t * t + B4
    } else if t < B6 {
        let t = t - B5;
        B0 * t * t + B7
    } else {
        let t = t - B8;
        B0 * t * t + B9
    }
}

fn elastic_in(t: f64) -> f64 {
    let p = ELASTIC_PERIOD / TAU;
    let s = (1.0 / ELASTIC_AMPLITUDE).asin() * p;
    let t = t - 1.0;
    ELASTIC_AMPLITUDE * tpmt(-t) * ((s - t) / p).sin()
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let curve = match self.curve {
            EaseCurve::Back => "back",
            EaseCurve::Bounce => "bounce",
            EaseCurve::Circle => "circle",
            EaseCurve::Cubic => "cubic",
            EaseCurve::Elastic => "elastic",
            EaseCurve::Exp => "exp",
            EaseCurve::Linear => "linear",
            EaseCurve::Poly => "poly",
            EaseCurve::Quad => "quad",
            EaseCurve::Sin => "sin",
        };
        let mode = match self.mode {
            EaseMode::In => "In",
            EaseMode::Out => "Out",
            EaseMode::InOut => "InOut",
        };
        write!(f, "{curve}{mode}")
    }
}

impl FromStr for Ease {
    type Err = ChartError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let (stem, mode) = if let Some(stem) = name.strip_suffix("InOut") {
            (stem, Some(EaseMode::InOut))
        } else if let Some(stem) = name.strip_suffix("In") {
            (stem, Some(EaseMode::In))
        } else if let Some(stem) = name.strip_suffix("Out") {
            (stem, Some(EaseMode::Out))
        } else {
            (name, None)
        };

        let curve = match stem {
            "back" => EaseCurve::Back,
            "bounce" => EaseCurve::Bounce,
            "circle" => EaseCurve::Circle,
            "cubic" => EaseCurve::Cubic,
            "elastic" => EaseCurve::Elastic,
            "exp" => EaseCurve::Exp,
            "linear" => EaseCurve::Linear,
            "poly" => EaseCurve::Poly,
            "quad" => EaseCurve::Quad,
            "sin" => EaseCurve::Sin,
            _ => {
                return Err(ChartError::InvalidConfig(format!(
                    "unknown ease function `{name}`"
                )));
            }
        };
        let mode = mode.unwrap_or(match curve {
            EaseCurve::Bounce | EaseCurve::Elastic => EaseMode::Out,
            _ => EaseMode::InOut,
        });
        Ok(Self::new(curve, mode))
    }
}

impl TryFrom<String> for Ease {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}
