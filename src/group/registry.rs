use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::group::coordinator::{Group, VisualizerId};

/// Children registered with one chart root.
#[derive(Debug, Default)]
pub struct ChartChildManager {
    groups: Vec<Group>,
    axes: IndexSet<String>,
    visualizers: IndexSet<VisualizerId>,
}

impl ChartChildManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_group(&mut self, group: Group) {
        if !self.groups.iter().any(|known| known.ptr_eq(&group)) {
            self.groups.push(group);
        }
    }

    pub fn unregister_group(&mut self, group: &Group) -> bool {
        let before = self.groups.len();
        self.groups.retain(|known| !known.ptr_eq(group));
        self.groups.len() != before
    }

    /// Groups in registration order. Fails when the chart has none.
    pub fn chart_groups(&self) -> ChartResult<&[Group]> {
        if self.groups.is_empty() {
            return Err(ChartError::MissingGroup);
        }
        Ok(&self.groups)
    }

    pub fn register_axis(&mut self, name: impl Into<String>) {
        self.axes.insert(name.into());
    }

    pub fn unregister_axis(&mut self, name: &str) -> bool {
        self.axes.shift_remove(name)
    }

    #[must_use]
    pub fn has_axis(&self, axis_name: &str) -> bool {
        self.axes.contains(axis_name)
    }

    pub fn register_visualizer(&mut self, id: VisualizerId) {
        self.visualizers.insert(id);
    }

    pub fn unregister_visualizer(&mut self, id: VisualizerId) -> bool {
        self.visualizers.shift_remove(&id)
    }

    #[must_use]
    pub fn visualizer_count(&self) -> usize {
        self.visualizers.len()
    }
}

/// Id source owned by a chart root.
///
/// Visualizer ids are unique across kinds; default names count per kind,
/// so the first line and the first bar are `Line0` and `Bar0`.
#[derive(Debug, Default)]
pub struct ComponentIds {
    next_visualizer: u64,
    per_kind: IndexMap<&'static str, u64>,
}

impl ComponentIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an id and the default name for a component of `type_tag`.
    pub fn allocate(&mut self, type_tag: &'static str) -> (VisualizerId, String) {
        let id = VisualizerId::new(self.next_visualizer);
        self.next_visualizer += 1;
        let counter = self.per_kind.entry(type_tag).or_insert(0);
        let name = format!("{type_tag}{counter}");
        *counter += 1;
        trace!(id = id.raw(), name = %name, "allocated component id");
        (id, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{EventLoop, ManualClock};

    #[test]
    fn chart_without_groups_reports_missing_group() {
        let manager = ChartChildManager::new();
        assert!(matches!(
            manager.chart_groups(),
            Err(ChartError::MissingGroup)
        ));
    }

    #[test]
    fn groups_are_registered_once() {
        let group = Group::new(EventLoop::new(ManualClock::new()));
        let mut manager = ChartChildManager::new();
        manager.register_group(group.clone());
        manager.register_group(group.clone());
        assert_eq!(manager.chart_groups().map(<[Group]>::len).ok(), Some(1));
        assert!(manager.unregister_group(&group));
        assert!(manager.chart_groups().is_err());
    }

    #[test]
    fn default_names_count_per_kind() {
        let mut ids = ComponentIds::new();
        let (line_id, line_name) = ids.allocate("Line");
        let (bar_id, bar_name) = ids.allocate("Bar");
        let (_, second_line) = ids.allocate("Line");
        assert_ne!(line_id, bar_id);
        assert_eq!(line_name, "Line0");
        assert_eq!(bar_name, "Bar0");
        assert_eq!(second_line, "Line1");
    }
}
