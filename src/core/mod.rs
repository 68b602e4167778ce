pub mod domain;
pub mod primitives;
pub mod scale;
pub mod scale_builder;
pub mod ticks;
pub mod time_scale;
pub mod types;

pub use domain::{DatumWithOrigin, NamedData, UnifiedDomain, UnifiedPoints, resolve};
pub use scale::LinearScale;
pub use scale_builder::{ScalePair, XScale, build_scales};
pub use ticks::{DEFAULT_TICK_COUNT, TickList};
pub use time_scale::{TimeInterval, TimeScale};
pub use types::{ContentRect, DataType, Datum, XValue};
