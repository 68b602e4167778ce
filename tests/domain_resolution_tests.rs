use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use unichart::core::{DataType, Datum, NamedData, UnifiedDomain, XValue, resolve};
use unichart::error::ChartError;

#[test]
fn numeric_datasets_merge_into_one_extent() {
    let a = [Datum::number(0.0, 3.0), Datum::number(5.0, 9.0)];
    let b = [Datum::number(-2.0, 1.0), Datum::number(4.0, 12.0)];

    let domain = resolve(&[NamedData::new("a", &a), NamedData::new("b", &b)]).expect("resolve");

    assert_eq!(domain.data_type, DataType::Linear);
    assert_eq!(domain.x_domain, (XValue::Number(-2.0), XValue::Number(5.0)));
    assert_eq!(domain.y_domain, (1.0, 12.0));
    assert_eq!(domain.unified_x_points.len(), 4);
}

#[test]
fn temporal_datasets_keep_time_bounds() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid time");
    let end = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).single().expect("valid time");
    let data = [Datum::time(end, 2.0), Datum::time(start, 4.0)];

    let domain = resolve(&[NamedData::new("sales", &data)]).expect("resolve");

    assert_eq!(domain.data_type, DataType::Temporal);
    assert_eq!(domain.x_domain, (XValue::Time(start), XValue::Time(end)));
}

#[test]
fn mixing_numbers_and_times_is_a_mismatch() {
    let time = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid time");
    let numbers = [Datum::number(1.0, 1.0)];
    let times = [Datum::time(time, 1.0)];

    let err = resolve(&[NamedData::new("n", &numbers), NamedData::new("t", &times)])
        .expect_err("mixed x types must fail");

    assert!(matches!(
        err,
        ChartError::DomainMismatch {
            expected: DataType::Linear,
            found: DataType::Temporal
        }
    ));
}

#[test]
fn shared_y_values_are_grouped_with_their_origins() {
    let a = [Datum::number(1.0, 7.0)];
    let b = [Datum::number(3.0, 7.0), Datum::number(4.0, 8.0)];

    let domain = resolve(&[NamedData::new("a", &a), NamedData::new("b", &b)]).expect("resolve");
    let sevens = domain.points_at_y(7.0).expect("y = 7 grouped");

    let origins: Vec<(&str, f64)> = sevens
        .values
        .iter()
        .map(|value| (value.from.as_str(), value.x.as_f64()))
        .collect();
    assert_eq!(origins, vec![("a", 1.0), ("b", 3.0)]);
    assert_eq!(domain.unified_y_points.len(), 2);
}

#[test]
fn all_empty_datasets_resolve_to_bootstrap_domain() {
    let domain = resolve(&[NamedData::new("a", &[]), NamedData::new("b", &[])]).expect("resolve");
    assert_eq!(domain, UnifiedDomain::bootstrap());
}

#[test]
fn unified_domain_json_roundtrip() {
    let a = [Datum::number(1.0, 2.0), Datum::number(2.0, 4.0)];
    let domain = resolve(&[NamedData::new("a", &a)]).expect("resolve");

    let json = serde_json::to_string(&domain).expect("serialize domain");
    let restored: UnifiedDomain = serde_json::from_str(&json).expect("deserialize domain");

    assert_eq!(restored, domain);
}

fn dataset_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-1_000.0f64..1_000.0, -1_000.0f64..1_000.0), 1..20)
}

proptest! {
    #[test]
    fn extent_does_not_depend_on_dataset_order(
        first in dataset_strategy(),
        second in dataset_strategy(),
    ) {
        let a: Vec<Datum> = first.iter().map(|(x, y)| Datum::number(*x, *y)).collect();
        let b: Vec<Datum> = second.iter().map(|(x, y)| Datum::number(*x, *y)).collect();

        let forward = resolve(&[NamedData::new("a", &a), NamedData::new("b", &b)])
            .expect("resolve forward");
        let backward = resolve(&[NamedData::new("b", &b), NamedData::new("a", &a)])
            .expect("resolve backward");

        prop_assert_eq!(forward.x_domain, backward.x_domain);
        prop_assert_eq!(forward.y_domain, backward.y_domain);
        prop_assert_eq!(forward.unified_x_points.len(), backward.unified_x_points.len());
        prop_assert_eq!(forward.unified_y_points.len(), backward.unified_y_points.len());
    }

    #[test]
    fn every_datum_lies_inside_the_extent(points in dataset_strategy()) {
        let data: Vec<Datum> = points.iter().map(|(x, y)| Datum::number(*x, *y)).collect();
        let domain = resolve(&[NamedData::new("a", &data)]).expect("resolve");
        let (x_low, x_high) = domain.x_domain_f64();

        for datum in &data {
            prop_assert!(datum.x.as_f64() >= x_low && datum.x.as_f64() <= x_high);
            prop_assert!(datum.y >= domain.y_domain.0 && datum.y <= domain.y_domain.1);
        }
        let grouped: usize = domain.unified_x_points.iter().map(|points| points.values.len()).sum();
        prop_assert_eq!(grouped, data.len());
    }
}
