use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::layout::container::{Anchor, ContentContainer, PaddedContainer, Point, translate};

const CONTENT_PREFIX: &str = "content";

/// Horizontal interest points of a container or of its content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalPoint {
    Left,
    Center,
    Right,
    ContentLeft,
    ContentCenter,
    ContentRight,
}

impl HorizontalPoint {
    fn is_content(self) -> bool {
        matches!(
            self,
            Self::ContentLeft | Self::ContentCenter | Self::ContentRight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalPoint {
    Top,
    Center,
    Bottom,
    ContentTop,
    ContentCenter,
    ContentBottom,
}

impl VerticalPoint {
    fn is_content(self) -> bool {
        matches!(
            self,
            Self::ContentTop | Self::ContentCenter | Self::ContentBottom
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HorizontalCoordinate {
    Pixels(f64),
    Point(HorizontalPoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerticalCoordinate {
    Pixels(f64),
    Point(VerticalPoint),
}

/// Position given per axis. A missing coordinate is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualPosition {
    pub x: Option<HorizontalCoordinate>,
    pub y: Option<VerticalCoordinate>,
}

/// Where a positionable element is anchored.
///
/// In JSON, `"topLeft"` is a preset, `"contentTopLeft"` an anchor of the
/// chart's content area and an object a manual position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub enum Position {
    Preset(Anchor),
    Content(Anchor),
    Manual(ManualPosition),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Named(String),
    Manual(ManualPosition),
}

impl TryFrom<RawPosition> for Position {
    type Error = ChartError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        match raw {
            RawPosition::Manual(manual) => Ok(Self::Manual(manual)),
            RawPosition::Named(name) => match name.strip_prefix(CONTENT_PREFIX) {
                Some(rest) => {
                    let mut chars = rest.chars();
                    let lowered: String = chars
                        .next()
                        .map(|first| first.to_ascii_lowercase())
                        .into_iter()
                        .chain(chars)
                        .collect();
                    lowered.parse().map(Self::Content)
                }
                None => name.parse().map(Self::Preset),
            },
        }
    }
}

impl From<Position> for RawPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Preset(anchor) => Self::Named(anchor.name().to_owned()),
            Position::Content(anchor) => {
                let name = anchor.name();
                let mut chars = name.chars();
                let capitalized: String = chars
                    .next()
                    .map(|first| first.to_ascii_uppercase())
                    .into_iter()
                    .chain(chars)
                    .collect();
                Self::Named(format!("{CONTENT_PREFIX}{capitalized}"))
            }
            Position::Manual(manual) => Self::Manual(manual),
        }
    }
}

/// Container a positionable element is placed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementContainer {
    /// The chart root, which has a content area.
    Chart(PaddedContainer),
    /// Any other container.
    Plain(ContentContainer),
}

impl PlacementContainer {
    fn anchor(self, anchor: Anchor) -> Point {
        match self {
            Self::Chart(chart) => chart.anchor(anchor),
            Self::Plain(container) => container.anchor(anchor),
        }
    }

    fn outer(self) -> ContentContainer {
        match self {
            Self::Chart(chart) => chart.container,
            Self::Plain(container) => container,
        }
    }
}

fn content_only_error() -> ChartError {
    ChartError::InvalidPosition(
        "content specific positions are only available directly inside a chart".to_owned(),
    )
}

impl Position {
    /// Resolves the anchor point inside `container`.
    pub fn resolve(self, container: PlacementContainer) -> ChartResult<Point> {
        match self {
            Self::Preset(anchor) => Ok(container.anchor(anchor)),
            Self::Content(anchor) => match container {
                PlacementContainer::Chart(chart) => Ok(chart.content_anchor(anchor)),
                PlacementContainer::Plain(_) => Err(content_only_error()),
            },
            Self::Manual(manual) => {
                let chart = match container {
                    PlacementContainer::Chart(chart) => Some(chart),
                    PlacementContainer::Plain(_) => None,
                };
                let outer = container.outer();
                let x = match manual.x {
                    None => 0.0,
                    Some(HorizontalCoordinate::Pixels(x)) => x,
                    Some(HorizontalCoordinate::Point(point)) => {
                        if point.is_content() && chart.is_none() {
                            return Err(content_only_error());
                        }
                        horizontal(point, outer, chart)
                    }
                };
                let y = match manual.y {
                    None => 0.0,
                    Some(VerticalCoordinate::Pixels(y)) => y,
                    Some(VerticalCoordinate::Point(point)) => {
                        if point.is_content() && chart.is_none() {
                            return Err(content_only_error());
                        }
                        vertical(point, outer, chart)
                    }
                };
                Ok(Point::new(x, y))
            }
        }
    }

    /// Translate transform putting an element at this position.
    pub fn anchor_position(self, container: PlacementContainer) -> ChartResult<String> {
        self.resolve(container).map(Point::translate)
    }
}

fn horizontal(point: HorizontalPoint, outer: ContentContainer, chart: Option<PaddedContainer>) -> f64 {
    match (point, chart) {
        (HorizontalPoint::Left, _) => 0.0,
        (HorizontalPoint::Center, _) => outer.center_x(),
        (HorizontalPoint::Right, _) => outer.width,
        (HorizontalPoint::ContentLeft, Some(chart)) => chart.content_left(),
        (HorizontalPoint::ContentCenter, Some(chart)) => chart.content_center_x(),
        (HorizontalPoint::ContentRight, Some(chart)) => chart.content_right(),
        (_, None) => 0.0,
    }
}

fn vertical(point: VerticalPoint, outer: ContentContainer, chart: Option<PaddedContainer>) -> f64 {
    match (point, chart) {
        (VerticalPoint::Top, _) => 0.0,
        (VerticalPoint::Center, _) => outer.center_y(),
        (VerticalPoint::Bottom, _) => outer.height,
        (VerticalPoint::ContentTop, Some(chart)) => chart.content_top(),
        (VerticalPoint::ContentCenter, Some(chart)) => chart.content_center_y(),
        (VerticalPoint::ContentBottom, Some(chart)) => chart.content_bottom(),
        (_, None) => 0.0,
    }
}

/// How an element aligns against its anchor once its size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Start,
    Middle,
    End,
}

impl Alignment {
    fn shift(self, extent: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Middle => -extent / 2.0,
            Self::End => -extent,
        }
    }
}

/// Measured size of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Translate aligning an element of size `bbox` against its anchor.
#[must_use]
pub fn alignment_offset(bbox: BoundingBox, horizontal: Alignment, vertical: Alignment) -> String {
    translate(horizontal.shift(bbox.width), vertical.shift(bbox.height))
}

/// Extra translate applied after anchoring and alignment.
#[must_use]
pub fn further_offset(offset: Option<Point>) -> String {
    offset.unwrap_or_default().translate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::padding::ManualPadding;

    fn chart() -> PlacementContainer {
        PlacementContainer::Chart(
            PaddedContainer::new(200.0, 100.0, ManualPadding::uniform(10.0)).expect("padding"),
        )
    }

    #[test]
    fn content_position_outside_chart_is_rejected() {
        let plain = PlacementContainer::Plain(ContentContainer::new(50.0, 50.0));
        let err = Position::Content(Anchor::TopLeft)
            .anchor_position(plain)
            .expect_err("content position needs a chart");
        assert!(matches!(err, ChartError::InvalidPosition(_)));
    }

    #[test]
    fn manual_position_mixes_points_and_pixels() {
        let position = Position::Manual(ManualPosition {
            x: Some(HorizontalCoordinate::Point(HorizontalPoint::ContentRight)),
            y: Some(VerticalCoordinate::Pixels(5.0)),
        });
        assert_eq!(position.anchor_position(chart()).expect("resolve"), "translate(190, 5)");
    }

    #[test]
    fn names_parse_into_presets_and_content_anchors() {
        let preset: Position = serde_json::from_str(r#""bottomRight""#).expect("parse");
        let content: Position = serde_json::from_str(r#""contentCenter""#).expect("parse");
        assert_eq!(preset, Position::Preset(Anchor::BottomRight));
        assert_eq!(content, Position::Content(Anchor::Center));
        assert_eq!(
            serde_json::to_string(&content).expect("serialize"),
            r#""contentCenter""#
        );
    }

    #[test]
    fn alignment_shifts_by_measured_size() {
        let bbox = BoundingBox::new(40.0, 20.0);
        assert_eq!(
            alignment_offset(bbox, Alignment::Middle, Alignment::End),
            "translate(-20, -20)"
        );
        assert_eq!(further_offset(None), "translate(0, 0)");
    }
}
