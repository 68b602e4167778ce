//! unichart: data unification, shared scales and enter/update/exit animation
//! for declarative charts.
//!
//! Visualizations register their data with a [`Group`]. The group merges all
//! datasets into one [`UnifiedDomain`], builds a shared [`ScalePair`] and
//! notifies its subscribers once per burst of changes. Components then
//! animate their attributes through an [`Animator`], writing to a host
//! supplied [`AttributeWriter`].

pub mod animation;
pub mod components;
pub mod core;
pub mod error;
pub mod group;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod telemetry;

pub use animation::{AnimateSettings, Animatable, AnimationConfig, Animator, Ease};
pub use core::{ContentRect, DataType, Datum, ScalePair, UnifiedDomain, XScale, XValue};
pub use error::{ChartError, ChartResult};
pub use group::{DataSubscriber, Group, GroupConfig, ShorthandDomain, VisualizerId};
pub use render::{AttrValue, AttributeWriter, NodeId, RecordingWriter};
pub use runtime::{EventLoop, ManualClock};
