pub mod bar;
pub mod container;
pub mod legend;
pub mod padding;
pub mod position;

pub use bar::{bar_center_offset, bar_x};
pub use container::{Anchor, ContentContainer, PaddedContainer, Point, translate};
pub use legend::{GridId, Layout, LegendId, LegendLayout, SectionId, SwatchId};
pub use padding::{ManualPadding, Padding, padding_as_manual};
pub use position::{
    Alignment, BoundingBox, HorizontalCoordinate, HorizontalPoint, ManualPosition,
    PlacementContainer, Position, VerticalCoordinate, VerticalPoint, alignment_offset,
    further_offset,
};
