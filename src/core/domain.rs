use std::cmp::Ordering;

use indexmap::IndexMap;
use indexmap::map::Entry;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

#[cfg(feature = "parallel-extent")]
use rayon::prelude::*;

use crate::core::types::{DataType, Datum, XValue};
use crate::error::{ChartError, ChartResult};

/// Borrowed view of one named dataset taking part in resolution.
#[derive(Debug, Clone, Copy)]
pub struct NamedData<'a> {
    pub name: &'a str,
    pub data: &'a [Datum],
}

impl<'a> NamedData<'a> {
    #[must_use]
    pub fn new(name: &'a str, data: &'a [Datum]) -> Self {
        Self { name, data }
    }
}

/// A datum annotated with the name of the dataset it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumWithOrigin {
    pub x: XValue,
    pub y: f64,
    pub from: String,
}

/// Every datum sharing one distinct key value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedPoints<K> {
    pub key: K,
    pub values: SmallVec<[DatumWithOrigin; 4]>,
}

/// Merged view of every dataset in a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedDomain {
    pub data_type: DataType,
    pub x_domain: (XValue, XValue),
    pub y_domain: (f64, f64),
    pub unified_x_points: Vec<UnifiedPoints<XValue>>,
    pub unified_y_points: Vec<UnifiedPoints<f64>>,
}

impl UnifiedDomain {
    /// Domain used before any data has been registered.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self {
            data_type: DataType::Linear,
            x_domain: (XValue::Number(0.0), XValue::Number(1.0)),
            y_domain: (0.0, 1.0),
            unified_x_points: Vec::new(),
            unified_y_points: Vec::new(),
        }
    }

    #[must_use]
    pub fn x_domain_f64(&self) -> (f64, f64) {
        (self.x_domain.0.as_f64(), self.x_domain.1.as_f64())
    }

    #[must_use]
    pub fn points_at_x(&self, x: XValue) -> Option<&UnifiedPoints<XValue>> {
        let key = x.key();
        self.unified_x_points
            .iter()
            .find(|points| points.key.key() == key)
    }

    #[must_use]
    pub fn points_at_y(&self, y: f64) -> Option<&UnifiedPoints<f64>> {
        self.unified_y_points
            .iter()
            .find(|points| OrderedFloat(points.key) == OrderedFloat(y))
    }
}

impl Default for UnifiedDomain {
    fn default() -> Self {
        Self::bootstrap()
    }
}

#[derive(Debug, Clone, Copy)]
struct Extent {
    x: Option<(XValue, XValue)>,
    y_min: f64,
    y_max: f64,
}

impl Extent {
    const EMPTY: Self = Self {
        x: None,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };

    fn include(self, datum: &Datum) -> Self {
        Self {
            x: Some(widen(self.x, (datum.x, datum.x))),
            y_min: self.y_min.min(datum.y),
            y_max: self.y_max.max(datum.y),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            x: match other.x {
                Some(bounds) => Some(widen(self.x, bounds)),
                None => self.x,
            },
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

// Bounds are compared as values so times keep their full precision.
fn widen(current: Option<(XValue, XValue)>, (low, high): (XValue, XValue)) -> (XValue, XValue) {
    let Some((min, max)) = current else {
        return (low, high);
    };
    let min = if low.compare(min) == Some(Ordering::Less) { low } else { min };
    let max = if high.compare(max) == Some(Ordering::Greater) { high } else { max };
    (min, max)
}

/// Merges named datasets into one domain.
///
/// Datasets without points are ignored. When nothing remains the bootstrap
/// domain is returned.
pub fn resolve(datasets: &[NamedData<'_>]) -> ChartResult<UnifiedDomain> {
    let populated: Vec<NamedData<'_>> = datasets
        .iter()
        .copied()
        .filter(|dataset| !dataset.data.is_empty())
        .collect();
    let Some(first) = populated.first() else {
        return Ok(UnifiedDomain::bootstrap());
    };

    let data_type = first.data[0].x.data_type();
    for dataset in &populated {
        validate_dataset(*dataset, data_type)?;
    }

    let extent = compute_extent(&populated);
    let Some(x_domain) = extent.x else {
        return Ok(UnifiedDomain::bootstrap());
    };
    let y_domain = (extent.y_min, extent.y_max);

    let mut by_x: IndexMap<OrderedFloat<f64>, UnifiedPoints<XValue>> = IndexMap::new();
    let mut by_y: IndexMap<OrderedFloat<f64>, UnifiedPoints<f64>> = IndexMap::new();
    for dataset in &populated {
        for datum in dataset.data {
            let annotated = DatumWithOrigin {
                x: datum.x,
                y: datum.y,
                from: dataset.name.to_owned(),
            };
            push_point(&mut by_x, datum.x.key(), datum.x, annotated.clone());
            push_point(&mut by_y, OrderedFloat(datum.y), datum.y, annotated);
        }
    }

    debug!(
        datasets = populated.len(),
        data_type = ?data_type,
        x_min = %x_domain.0,
        x_max = %x_domain.1,
        y_min = extent.y_min,
        y_max = extent.y_max,
        "resolved unified domain"
    );

    Ok(UnifiedDomain {
        data_type,
        x_domain,
        y_domain,
        unified_x_points: by_x.into_values().collect(),
        unified_y_points: by_y.into_values().collect(),
    })
}

fn push_point<K>(
    index: &mut IndexMap<OrderedFloat<f64>, UnifiedPoints<K>>,
    hash_key: OrderedFloat<f64>,
    key: K,
    datum: DatumWithOrigin,
) {
    match index.entry(hash_key) {
        Entry::Occupied(mut entry) => entry.get_mut().values.push(datum),
        Entry::Vacant(entry) => {
            let mut values = SmallVec::new();
            values.push(datum);
            entry.insert(UnifiedPoints { key, values });
        }
    }
}

fn validate_dataset(dataset: NamedData<'_>, expected: DataType) -> ChartResult<()> {
    for datum in dataset.data {
        let found = datum.x.data_type();
        if found != expected {
            return Err(ChartError::DomainMismatch { expected, found });
        }
        if !datum.y.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "dataset `{}` contains a non-finite y value",
                dataset.name
            )));
        }
        if let XValue::Number(x) = datum.x {
            if !x.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "dataset `{}` contains a non-finite x value",
                    dataset.name
                )));
            }
        }
    }
    Ok(())
}

fn dataset_extent(data: &[Datum]) -> Extent {
    data.iter().fold(Extent::EMPTY, Extent::include)
}

fn compute_extent(datasets: &[NamedData<'_>]) -> Extent {
    #[cfg(feature = "parallel-extent")]
    {
        datasets
            .par_iter()
            .map(|dataset| dataset_extent(dataset.data))
            .reduce(|| Extent::EMPTY, Extent::merge)
    }

    #[cfg(not(feature = "parallel-extent"))]
    {
        datasets
            .iter()
            .map(|dataset| dataset_extent(dataset.data))
            .fold(Extent::EMPTY, Extent::merge)
    }
}
