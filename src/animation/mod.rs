//! Enter/update/exit animation of element attributes.
//!
//! Each element owns an `Animator` with one declared `AnimationConfig` per
//! animated property. Frame loops run on the shared `EventLoop` and at most
//! one loop drives a given property at a time.

pub mod animator;
pub mod ease;
pub mod interpolate;
pub mod progress;
pub mod settings;

pub use animator::{
    Animatable, AnimationConfig, AnimationPhase, Animator, EnterProvider, ExitProvider,
    FrameLoopId, TransitoryProvider,
};
pub use ease::{Ease, EaseCurve, EaseMode};
pub use interpolate::{
    Interpolator, constant, interpolate_number, interpolate_path, interpolate_string,
    interpolate_value,
};
pub use progress::ProgressCycle;
pub use settings::{AnimateSettings, EXIT_GRACE_MS};
