use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimateSettings, Animatable, AnimationConfig, Animator, interpolate_path};
use crate::components::chart::ChartContext;
use crate::components::visualizer::{DataVisualizer, VisualizerKind};
use crate::core::{Datum, ScalePair};
use crate::error::ChartResult;
use crate::group::{DataSubscriber, Group, SubscriberId};
use crate::render::{AttrValue, AttributeWriter, NodeId};

pub const ATTR_D: &str = "d";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaConfig {
    #[serde(default)]
    pub animate: Option<AnimateSettings>,
}

/// Closed path between the line through `data` and `y = 0`.
#[must_use]
pub fn area_path(data: &[Datum], scales: ScalePair) -> Option<String> {
    let (first, last) = (data.first()?, data.last()?);
    let baseline = scales.y.map(0.0);
    let mut path = String::new();
    for (index, datum) in data.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let x = scales.x.map(datum.x);
        let y = scales.y.map(datum.y);
        path.push_str(&format!("{command}{x},{y}"));
    }
    path.push_str(&format!(
        "L{},{baseline}L{},{baseline}Z",
        scales.x.map(last.x),
        scales.x.map(first.x)
    ));
    Some(path)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaView {
    pub data: Vec<Datum>,
    pub scales: Option<ScalePair>,
}

impl AreaView {
    #[must_use]
    pub fn d(&self) -> Option<String> {
        area_path(&self.data, self.scales?)
    }

    /// The area flattened onto its baseline.
    #[must_use]
    pub fn zero_path(&self) -> Option<String> {
        let flattened: Vec<Datum> = self.data.iter().map(|datum| datum.with_y(0.0)).collect();
        area_path(&flattened, self.scales?)
    }
}

impl Animatable for AreaView {
    fn attribute_value(&self, name: &str) -> Option<AttrValue> {
        match name {
            ATTR_D => self.d().map(AttrValue::Text),
            _ => None,
        }
    }

    fn should_animate(&self) -> bool {
        !self.data.is_empty() && self.scales.is_some()
    }
}

/// Filled area under the rendered data.
///
/// Rises from `y = 0` on enter, morphs between updates and sinks back on exit.
pub struct Area {
    visualizer: DataVisualizer,
    node: NodeId,
    view: AreaView,
    animator: Animator<AreaView>,
    writer: Rc<RefCell<dyn AttributeWriter>>,
    subscriber: Option<SubscriberId>,
}

impl Area {
    pub fn attach(
        chart: &ChartContext,
        group: Group,
        config: AreaConfig,
        name: Option<String>,
    ) -> ChartResult<Rc<RefCell<Self>>> {
        if let Some(animate) = config.animate {
            animate.validate()?;
        }
        let node = chart.allocate_node();
        let mut animator = Animator::new(chart.event_loop().clone(), chart.writer());
        animator.set_settings(config.animate);
        animator.register_animation(
            ATTR_D,
            AnimationConfig::<AreaView>::new(node, ATTR_D)
                .enter(|to, view: &AreaView| {
                    Some(interpolate_path(&view.zero_path()?, to.as_text()?))
                })
                .transitory(|from, to, _| Some(interpolate_path(from.as_text()?, to.as_text()?)))
                .exit(|from, view: &AreaView| {
                    Some(interpolate_path(from.as_text()?, &view.zero_path()?))
                }),
        );

        let area = Rc::new(RefCell::new(Self {
            visualizer: DataVisualizer::new(chart, group.clone(), VisualizerKind::Area, name),
            node,
            view: AreaView::default(),
            animator,
            writer: chart.writer(),
            subscriber: None,
        }));
        let id = group.register_subscriber(area.clone());
        area.borrow_mut().subscriber = Some(id);
        Ok(area)
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn visualizer(&self) -> &DataVisualizer {
        &self.visualizer
    }

    #[must_use]
    pub fn view(&self) -> &AreaView {
        &self.view
    }

    pub fn set_data(&self, data: Option<Vec<Datum>>) -> ChartResult<bool> {
        self.visualizer.set_data(data)
    }

    /// Sinks the area, removes its node and detaches its data.
    pub fn detach(&mut self) -> ChartResult<()> {
        let group = self.visualizer.group().clone();
        if let Some(id) = self.subscriber.take() {
            group.unregister_subscriber(id);
        }
        let writer = Rc::clone(&self.writer);
        let node = self.node;
        self.animator
            .begin_exit(&self.view, group.animate_settings(), move || {
                writer.borrow_mut().remove_node(node);
            });
        self.visualizer.detach()
    }
}

impl DataSubscriber for Area {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()> {
        self.view.scales = group.current_scales();
        self.view.data = self.visualizer.rendered_data().unwrap_or_default();
        Ok(())
    }

    fn after_data_update(&mut self, group: &Group) -> ChartResult<()> {
        self.animator
            .check_for_animation(&self.view, group.animate_settings());
        Ok(())
    }
}

impl fmt::Debug for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Area")
            .field("visualizer", &self.visualizer)
            .field("node", &self.node)
            .field("points", &self.view.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContentRect, NamedData, build_scales, resolve};
    use crate::layout::ManualPadding;

    #[test]
    fn path_closes_along_the_zero_line() {
        let data = vec![Datum::number(0.0, 0.0), Datum::number(10.0, 10.0)];
        let domain = resolve(&[NamedData::new("a", &data)]).expect("resolve");
        let scales = build_scales(
            &domain,
            ContentRect::from_size(100.0, 50.0),
            ManualPadding::ZERO,
        )
        .expect("scales");
        assert_eq!(
            area_path(&data, scales).as_deref(),
            Some("M0,50L100,0L100,50L0,50Z")
        );
        assert_eq!(area_path(&[], scales), None);
    }
}
