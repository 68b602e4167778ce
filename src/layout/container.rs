use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ContentRect;
use crate::error::{ChartError, ChartResult};
use crate::layout::padding::ManualPadding;

/// Named anchor points of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterRight,
    BottomRight,
    BottomCenter,
    BottomLeft,
    CenterLeft,
    Center,
}

impl Anchor {
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterRight,
        Self::BottomRight,
        Self::BottomCenter,
        Self::BottomLeft,
        Self::CenterLeft,
        Self::Center,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "topLeft",
            Self::TopCenter => "topCenter",
            Self::TopRight => "topRight",
            Self::CenterRight => "centerRight",
            Self::BottomRight => "bottomRight",
            Self::BottomCenter => "bottomCenter",
            Self::BottomLeft => "bottomLeft",
            Self::CenterLeft => "centerLeft",
            Self::Center => "center",
        }
    }
}

impl FromStr for Anchor {
    type Err = ChartError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.name() == input)
            .ok_or_else(|| ChartError::InvalidPosition(format!("unknown anchor `{input}`")))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn translate(self) -> String {
        translate(self.x, self.y)
    }
}

/// SVG `translate(x, y)` transform.
#[must_use]
pub fn translate(x: f64, y: f64) -> String {
    format!("translate({}, {})", format_coordinate(x), format_coordinate(y))
}

fn format_coordinate(value: f64) -> String {
    // Avoids printing `-0`.
    if value == 0.0 {
        return "0".to_owned();
    }
    value.to_string()
}

/// Rectangle with its origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentContainer {
    pub width: f64,
    pub height: f64,
}

impl ContentContainer {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.width / 2.0
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        self.height / 2.0
    }

    #[must_use]
    pub fn anchor(self, anchor: Anchor) -> Point {
        anchor_in(0.0, self.width, 0.0, self.height, anchor)
    }

    #[must_use]
    pub fn translate(self, anchor: Anchor) -> String {
        self.anchor(anchor).translate()
    }

    #[must_use]
    pub fn rect(self) -> ContentRect {
        ContentRect::from_size(self.width, self.height)
    }
}

/// Container with an inner content area inset by padding, like a chart root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddedContainer {
    pub container: ContentContainer,
    pub padding: ManualPadding,
}

impl PaddedContainer {
    pub fn new(width: f64, height: f64, padding: ManualPadding) -> ChartResult<Self> {
        Ok(Self {
            container: ContentContainer::new(width, height),
            padding: padding.validate()?,
        })
    }

    #[must_use]
    pub fn content_width(self) -> f64 {
        self.container.width - self.padding.right - self.padding.left
    }

    #[must_use]
    pub fn content_height(self) -> f64 {
        self.container.height - self.padding.top - self.padding.bottom
    }

    #[must_use]
    pub fn content_top(self) -> f64 {
        self.padding.top
    }

    #[must_use]
    pub fn content_right(self) -> f64 {
        self.container.width - self.padding.right
    }

    #[must_use]
    pub fn content_bottom(self) -> f64 {
        self.container.height - self.padding.bottom
    }

    #[must_use]
    pub fn content_left(self) -> f64 {
        self.padding.left
    }

    #[must_use]
    pub fn content_center_x(self) -> f64 {
        self.content_left() + self.content_width() / 2.0
    }

    #[must_use]
    pub fn content_center_y(self) -> f64 {
        self.content_top() + self.content_height() / 2.0
    }

    /// Anchor of the outer rectangle.
    #[must_use]
    pub fn anchor(self, anchor: Anchor) -> Point {
        self.container.anchor(anchor)
    }

    /// Anchor of the content area.
    #[must_use]
    pub fn content_anchor(self, anchor: Anchor) -> Point {
        anchor_in(
            self.content_left(),
            self.content_right(),
            self.content_top(),
            self.content_bottom(),
            anchor,
        )
    }

    #[must_use]
    pub fn content_translate(self, anchor: Anchor) -> String {
        self.content_anchor(anchor).translate()
    }

    /// Content area as the pixel rectangle scales are built against.
    pub fn content_rect(self) -> ChartResult<ContentRect> {
        ContentRect::new(
            self.content_left(),
            self.content_right(),
            self.content_top(),
            self.content_bottom(),
        )
        .validate()
    }
}

fn anchor_in(left: f64, right: f64, top: f64, bottom: f64, anchor: Anchor) -> Point {
    let center_x = left + (right - left) / 2.0;
    let center_y = top + (bottom - top) / 2.0;
    match anchor {
        Anchor::TopLeft => Point::new(left, top),
        Anchor::TopCenter => Point::new(center_x, top),
        Anchor::TopRight => Point::new(right, top),
        Anchor::CenterRight => Point::new(right, center_y),
        Anchor::BottomRight => Point::new(right, bottom),
        Anchor::BottomCenter => Point::new(center_x, bottom),
        Anchor::BottomLeft => Point::new(left, bottom),
        Anchor::CenterLeft => Point::new(left, center_y),
        Anchor::Center => Point::new(center_x, center_y),
    }
}
