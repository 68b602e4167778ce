use chrono::{TimeZone, Utc};
use unichart::animation::{AnimateSettings, Ease};
use unichart::components::{AxisConfig, AxisSide, AxisType, BarConfig};
use unichart::core::XValue;
use unichart::error::ChartError;
use unichart::group::{DomainBound, GroupConfig, ShorthandDomain};
use unichart::layout::Padding;

#[test]
fn group_config_reads_shorthand_json() {
    let config = GroupConfig::from_json_str(
        r#"{
            "domain": { "x": ["auto", 10], "y": ["min", "max"] },
            "domain_padding": [4, 8],
            "animate": { "duration": 250 },
            "spread": 3
        }"#,
    )
    .expect("config should parse");

    let domain = config.domain.expect("domain override");
    assert_eq!(
        domain.x,
        Some([DomainBound::Auto, DomainBound::Fixed(XValue::Number(10.0))])
    );
    assert_eq!(domain.y, Some([DomainBound::Extent, DomainBound::Extent]));
    assert_eq!(config.domain_padding, Some(Padding::Bidirectional([4.0, 8.0])));
    assert_eq!(config.animate, Some(AnimateSettings::new(250.0)));
    assert_eq!(config.spread, 3.0);
}

#[test]
fn empty_group_config_uses_defaults() {
    let config = GroupConfig::from_json_str("{}").expect("empty config");
    assert_eq!(config, GroupConfig::default());
    assert_eq!(config.domain, Some(ShorthandDomain::auto()));
}

#[test]
fn null_domain_disables_the_override() {
    let config = GroupConfig::from_json_str(r#"{ "domain": null }"#).expect("config");
    assert_eq!(config.domain, None);
}

#[test]
fn group_config_json_roundtrip() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid time");
    let config = GroupConfig::default()
        .with_domain(Some(ShorthandDomain {
            x: Some([DomainBound::Fixed(XValue::Time(start)), DomainBound::Extent]),
            y: None,
        }))
        .with_domain_padding(Padding::Uniform(6.0))
        .with_animate(AnimateSettings::new(400.0).with_ease(Ease::LINEAR))
        .with_spread(1.5);

    let json = config.to_json_pretty().expect("serialize");
    let restored = GroupConfig::from_json_str(&json).expect("deserialize");

    assert_eq!(restored, config);
}

#[test]
fn invalid_group_config_is_rejected() {
    for input in [
        r#"{ "spread": -1 }"#,
        r#"{ "domain_padding": -2 }"#,
        r#"{ "animate": { "duration": -5 } }"#,
        r#"{ "animate": { "duration": 1e300 } }"#,
        r#"{ "domain": { "x": ["auto"] } }"#,
        "not json",
    ] {
        let err = GroupConfig::from_json_str(input).expect_err(input);
        assert!(matches!(err, ChartError::InvalidConfig(_)), "{input}");
    }
}

#[test]
fn component_configs_fill_defaults() {
    let axis: AxisConfig =
        serde_json::from_str(r#"{ "side": "left", "axis_type": "dependent" }"#).expect("axis");
    assert_eq!(axis.side, AxisSide::Left);
    assert_eq!(axis.axis_type, AxisType::Dependent);
    assert_eq!(axis.tick_count, AxisConfig::default().tick_count);

    let bar: BarConfig = serde_json::from_str(r#"{ "animate": { "duration_ms": 120 } }"#)
        .expect("bar");
    assert_eq!(bar.bar_width, BarConfig::default().bar_width);
    assert_eq!(bar.animate, Some(AnimateSettings::new(120.0)));
}
