use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::components::chart::ChartContext;
use crate::core::Datum;
use crate::error::ChartResult;
use crate::group::{Group, VisualizerId};

/// Kinds of data visualizations that register data with a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualizerKind {
    Line,
    Bar,
    Area,
    Scatter,
}

impl VisualizerKind {
    /// Label used in default names and log fields.
    #[must_use]
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Bar => "Bar",
            Self::Area => "Area",
            Self::Scatter => "Scatter",
        }
    }
}

/// Data ownership shared by every visualization: identity, name and the
/// group its data is unified in.
#[derive(Debug, Clone)]
pub struct DataVisualizer {
    id: VisualizerId,
    name: String,
    kind: VisualizerKind,
    group: Group,
    chart: ChartContext,
}

impl DataVisualizer {
    /// Registers a new visualizer with the chart. `name` defaults to the
    /// kind's tag followed by a per-kind counter.
    pub fn new(
        chart: &ChartContext,
        group: Group,
        kind: VisualizerKind,
        name: Option<String>,
    ) -> Self {
        let (id, default_name) = chart.allocate_component(kind.type_tag());
        chart.with_children(|children| children.register_visualizer(id));
        Self {
            id,
            name: name.unwrap_or(default_name),
            kind,
            group,
            chart: chart.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> VisualizerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> VisualizerKind {
        self.kind
    }

    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Hands new data to the group.
    ///
    /// Missing or empty data is ignored with a warning and leaves the group
    /// untouched; returns whether the data was registered.
    pub fn set_data(&self, data: Option<Vec<Datum>>) -> ChartResult<bool> {
        let Some(data) = data.filter(|data| !data.is_empty()) else {
            warn!(
                visualizer = self.kind.type_tag(),
                name = %self.name,
                "ignoring missing or empty data; remove the visualization instead"
            );
            return Ok(false);
        };
        self.group.register_dataset(self.id, self.name.clone(), data)?;
        Ok(true)
    }

    /// Data committed by the group's latest batch.
    #[must_use]
    pub fn rendered_data(&self) -> Option<Vec<Datum>> {
        self.group.rendered_data(self.id)
    }

    /// Removes the visualizer's data from its group and from the chart.
    pub fn detach(&self) -> ChartResult<()> {
        self.group.unregister_dataset(self.id)?;
        self.chart
            .with_children(|children| children.unregister_visualizer(self.id));
        Ok(())
    }
}
