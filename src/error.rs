use thiserror::Error;

use crate::core::DataType;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(
        "group contains visualizations whose `x` values are not of the same type \
         (expected {expected:?}, found {found:?}); did you mix number and date `x` values?"
    )]
    DomainMismatch { expected: DataType, found: DataType },

    #[error(
        "chart has no groups; register a group on the chart or on a wrapping element inside it"
    )]
    MissingGroup,

    #[error("tried to get the position of a {kind} that is not registered with its parent")]
    LookupMiss { kind: &'static str },

    #[error(
        "invalid content rect: left={left}, right={right}, top={top}, bottom={bottom}"
    )]
    InvalidContentRect {
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
