use unichart::error::ChartError;
use unichart::layout::{
    Alignment, Anchor, BoundingBox, ContentContainer, GridId, Layout, LegendId, LegendLayout,
    ManualPadding, PaddedContainer, PlacementContainer, Point, Position, SectionId, SwatchId,
    alignment_offset, further_offset,
};

fn chart() -> PlacementContainer {
    PlacementContainer::Chart(
        PaddedContainer::new(200.0, 100.0, ManualPadding::uniform(10.0)).expect("container"),
    )
}

#[test]
fn preset_positions_anchor_on_the_outer_rectangle() {
    let position: Position = serde_json::from_str(r#""center""#).expect("parse preset");

    assert_eq!(position, Position::Preset(Anchor::Center));
    assert_eq!(
        position.anchor_position(chart()).expect("anchor"),
        "translate(100, 50)"
    );
}

#[test]
fn content_positions_anchor_on_the_padded_area() {
    let position: Position =
        serde_json::from_str(r#""contentBottomRight""#).expect("parse content position");

    assert_eq!(position, Position::Content(Anchor::BottomRight));
    assert_eq!(
        position.resolve(chart()).expect("resolve"),
        Point::new(190.0, 90.0)
    );
}

#[test]
fn manual_position_mixes_named_points_and_pixels() {
    let position: Position =
        serde_json::from_str(r#"{ "x": "contentRight", "y": 5 }"#).expect("parse manual");

    assert_eq!(
        position.resolve(chart()).expect("resolve"),
        Point::new(190.0, 5.0)
    );
}

#[test]
fn manual_position_defaults_missing_coordinates_to_zero() {
    let position: Position = serde_json::from_str(r#"{ "y": "bottom" }"#).expect("parse");
    let plain = PlacementContainer::Plain(ContentContainer::new(40.0, 30.0));

    assert_eq!(position.resolve(plain).expect("resolve"), Point::new(0.0, 30.0));
}

#[test]
fn content_points_need_a_chart() {
    let position: Position = serde_json::from_str(r#"{ "x": "contentLeft" }"#).expect("parse");
    let plain = PlacementContainer::Plain(ContentContainer::new(40.0, 30.0));

    let err = position.resolve(plain).expect_err("content point outside chart");
    assert!(matches!(err, ChartError::InvalidPosition(_)));
}

#[test]
fn unknown_anchor_name_fails_to_parse() {
    assert!(serde_json::from_str::<Position>(r#""middleish""#).is_err());
    assert!(matches!(
        "middleish".parse::<Anchor>(),
        Err(ChartError::InvalidPosition(_))
    ));
}

#[test]
fn position_json_roundtrip_keeps_content_prefix() {
    for position in [
        Position::Preset(Anchor::TopLeft),
        Position::Content(Anchor::CenterRight),
    ] {
        let json = serde_json::to_string(&position).expect("serialize");
        let restored: Position = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, position);
    }
    assert_eq!(
        serde_json::to_string(&Position::Content(Anchor::CenterRight)).expect("serialize"),
        r#""contentCenterRight""#
    );
}

#[test]
fn alignment_shifts_by_measured_size() {
    let bbox = BoundingBox::new(40.0, 20.0);

    assert_eq!(
        alignment_offset(bbox, Alignment::Start, Alignment::Start),
        "translate(0, 0)"
    );
    assert_eq!(
        alignment_offset(bbox, Alignment::Middle, Alignment::End),
        "translate(-20, -20)"
    );
    assert_eq!(further_offset(None), "translate(0, 0)");
    assert_eq!(
        further_offset(Some(Point::new(3.5, -2.0))),
        "translate(3.5, -2)"
    );
}

#[test]
fn padded_container_reports_content_geometry() {
    let container =
        PaddedContainer::new(300.0, 200.0, ManualPadding { top: 10.0, right: 20.0, bottom: 30.0, left: 40.0 })
            .expect("container");

    assert_eq!(container.content_width(), 240.0);
    assert_eq!(container.content_height(), 160.0);
    assert_eq!(container.content_center_x(), 160.0);
    assert_eq!(container.content_center_y(), 90.0);
    assert_eq!(container.content_translate(Anchor::TopLeft), "translate(40, 10)");

    let rect = container.content_rect().expect("rect");
    assert_eq!((rect.left, rect.right, rect.top, rect.bottom), (40.0, 280.0, 10.0, 170.0));
}

#[test]
fn oversized_padding_leaves_no_content_rect() {
    let container =
        PaddedContainer::new(20.0, 20.0, ManualPadding::uniform(10.0)).expect("container");
    assert!(matches!(
        container.content_rect(),
        Err(ChartError::InvalidContentRect { .. })
    ));
}

#[test]
fn inline_legend_lays_sections_and_grids_side_by_side() {
    let legend = LegendId::new(0);
    let (first_grid, second_grid, third_grid) = (GridId::new(0), GridId::new(1), GridId::new(2));
    let mut layout = LegendLayout::new(8.0);

    layout.register_grid(legend, first_grid, Layout::Inline);
    layout.register_grid(legend, second_grid, Layout::Inline);
    layout.register_grid(legend, third_grid, Layout::Inline);
    layout.set_grid_size(first_grid, BoundingBox::new(50.0, 20.0));
    layout.set_grid_size(second_grid, BoundingBox::new(30.0, 20.0));

    for raw in 0..2 {
        let section = SectionId::new(raw);
        layout.register_section(first_grid, section, Layout::Column);
        layout.set_section_size(section, BoundingBox::new(20.0, 12.0));
    }

    assert_eq!(
        layout.grid_position(legend, first_grid).expect("first grid"),
        Point::default()
    );
    assert_eq!(
        layout.grid_position(legend, third_grid).expect("third grid"),
        Point::new(96.0, 0.0)
    );
    assert_eq!(
        layout
            .section_position(first_grid, SectionId::new(1))
            .expect("second section"),
        Point::new(20.0, 0.0)
    );
}

#[test]
fn unregistering_shifts_later_entries_back() {
    let section = SectionId::new(3);
    let mut layout = LegendLayout::new(0.0);
    layout.register_section(GridId::new(0), section, Layout::Column);
    for raw in 0..3 {
        layout.register_swatch(section, SwatchId::new(raw));
        layout.set_swatch_size(SwatchId::new(raw), BoundingBox::new(10.0, 14.0));
    }

    assert!(layout.unregister_swatch(section, SwatchId::new(0)));
    assert_eq!(
        layout
            .swatch_position(section, SwatchId::new(2))
            .expect("last swatch"),
        Point::new(0.0, 14.0)
    );
}

#[test]
fn unknown_legend_entries_are_lookup_misses() {
    let layout = LegendLayout::new(4.0);

    let err = layout
        .grid_position(LegendId::new(9), GridId::new(9))
        .expect_err("unregistered grid");
    assert!(matches!(err, ChartError::LookupMiss { kind: "legend grid" }));

    let err = layout
        .swatch_position(SectionId::new(1), SwatchId::new(1))
        .expect_err("unregistered swatch");
    assert!(matches!(err, ChartError::LookupMiss { kind: "legend swatch" }));
}
