pub mod config;
pub mod coordinator;
pub mod registry;
pub mod subscriber;

pub use config::{DomainBound, GroupConfig, ShorthandDomain};
pub use coordinator::{Group, GroupState, VisualizerId};
pub use registry::{ChartChildManager, ComponentIds};
pub use subscriber::{DataSubscriber, SharedSubscriber, SubscriberId};
