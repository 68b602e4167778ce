//! Concrete chart components built on the group and animation core.
//!
//! Every component is a `DataSubscriber`: the group hands it fresh scales in
//! `on_data_update` and it starts its animations in `after_data_update`.

pub mod area;
pub mod axis;
pub mod bar;
pub mod chart;
pub mod line;
pub mod scatter;
pub mod visualizer;

pub use area::{Area, AreaConfig, AreaView, area_path};
pub use axis::{Axis, AxisConfig, AxisSide, AxisType, AxisView, generate_ticks};
pub use bar::{Bar, BarConfig, SeriesSlot, SingleBar, SingleBarView};
pub use chart::ChartContext;
pub use line::{Line, LineConfig, LineView, line_path};
pub use scatter::{Scatter, ScatterConfig, ScatterPoint, ScatterPointView};
pub use visualizer::{DataVisualizer, VisualizerKind};
