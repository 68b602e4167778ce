//! Single-threaded cooperative scheduling.
//!
//! Two queues drive the crate: zero-delay deferred tasks used to coalesce
//! group notifications, and per-frame callbacks used by animations.

pub mod clock;
pub mod event_loop;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use event_loop::{EventLoop, FrameId, TaskId};
