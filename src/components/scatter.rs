use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{
    AnimateSettings, Animatable, AnimationConfig, Animator, Interpolator, interpolate_number,
};
use crate::components::chart::ChartContext;
use crate::components::visualizer::{DataVisualizer, VisualizerKind};
use crate::core::{Datum, ScalePair};
use crate::error::{ChartError, ChartResult};
use crate::group::{DataSubscriber, Group, SubscriberId};
use crate::render::{AttrValue, AttributeWriter, NodeId};

pub const ATTR_CX: &str = "cx";
pub const ATTR_CY: &str = "cy";
pub const ATTR_R: &str = "r";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub animate: Option<AnimateSettings>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            animate: None,
        }
    }
}

fn default_radius() -> f64 {
    10.0
}

/// Geometry inputs of one point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPointView {
    pub datum: Datum,
    pub scales: Option<ScalePair>,
    pub baseline: f64,
    pub radius: f64,
}

impl ScatterPointView {
    #[must_use]
    pub fn cx(&self) -> Option<f64> {
        Some(self.scales?.x.map(self.datum.x))
    }

    #[must_use]
    pub fn cy(&self) -> Option<f64> {
        Some(self.scales?.y.map(self.datum.y))
    }
}

impl Animatable for ScatterPointView {
    fn attribute_value(&self, name: &str) -> Option<AttrValue> {
        match name {
            ATTR_CX => self.cx().map(AttrValue::Number),
            ATTR_CY => self.cy().map(AttrValue::Number),
            ATTR_R => Some(AttrValue::Number(self.radius)),
            _ => None,
        }
    }

    fn should_animate(&self) -> bool {
        self.scales.is_some()
    }
}

fn point_animations(node: NodeId) -> [(&'static str, AnimationConfig<ScatterPointView>); 3] {
    [
        (
            ATTR_CX,
            AnimationConfig::<ScatterPointView>::new(node, ATTR_CX).transitory(numbers),
        ),
        (
            ATTR_CY,
            AnimationConfig::<ScatterPointView>::new(node, ATTR_CY)
                .enter(|to, view: &ScatterPointView| {
                    to.as_number()
                        .map(|to| interpolate_number(view.baseline, to))
                })
                .transitory(numbers)
                .exit(|from, view: &ScatterPointView| {
                    from.as_number()
                        .map(|from| interpolate_number(from, view.baseline))
                }),
        ),
        (
            ATTR_R,
            AnimationConfig::<ScatterPointView>::new(node, ATTR_R)
                .enter(|to, _| to.as_number().map(|to| interpolate_number(0.0, to)))
                .transitory(numbers)
                .exit(|from, _| from.as_number().map(|from| interpolate_number(from, 0.0))),
        ),
    ]
}

fn numbers(
    from: &AttrValue,
    to: &AttrValue,
    _view: &ScatterPointView,
) -> Option<Interpolator> {
    Some(interpolate_number(from.as_number()?, to.as_number()?))
}

/// One animated `<circle>` of a scatter series.
///
/// Rises from the bottom of the content area while growing on enter and
/// falls back while shrinking on exit.
pub struct ScatterPoint {
    node: NodeId,
    view: ScatterPointView,
    animator: Animator<ScatterPointView>,
    writer: Rc<RefCell<dyn AttributeWriter>>,
}

impl ScatterPoint {
    pub fn new(chart: &ChartContext, datum: Datum, config: ScatterConfig) -> Self {
        let node = chart.allocate_node();
        let mut animator = Animator::new(chart.event_loop().clone(), chart.writer());
        animator.set_settings(config.animate);
        for (name, animation) in point_animations(node) {
            animator.register_animation(name, animation);
        }
        Self {
            node,
            view: ScatterPointView {
                datum,
                scales: None,
                baseline: 0.0,
                radius: config.radius,
            },
            animator,
            writer: chart.writer(),
        }
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn view(&self) -> &ScatterPointView {
        &self.view
    }

    pub fn set_datum(&mut self, datum: Datum) {
        self.view.datum = datum;
    }

    /// Plays the exit animation, then removes the node.
    pub fn remove(&mut self, group_settings: Option<AnimateSettings>) {
        let writer = Rc::clone(&self.writer);
        let node = self.node;
        self.animator
            .begin_exit(&self.view, group_settings, move || {
                writer.borrow_mut().remove_node(node);
            });
    }
}

impl DataSubscriber for ScatterPoint {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()> {
        self.view.scales = group.current_scales();
        self.view.baseline = group.content_rect().bottom;
        Ok(())
    }

    fn after_data_update(&mut self, group: &Group) -> ChartResult<()> {
        self.animator
            .check_for_animation(&self.view, group.animate_settings());
        Ok(())
    }
}

impl fmt::Debug for ScatterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterPoint")
            .field("node", &self.node)
            .field("view", &self.view)
            .finish()
    }
}

struct PointChild {
    point: Rc<RefCell<ScatterPoint>>,
    subscriber: SubscriberId,
}

/// Scatter series: one `ScatterPoint` per rendered datum, keyed by `x`.
pub struct Scatter {
    visualizer: DataVisualizer,
    config: ScatterConfig,
    chart: ChartContext,
    points: IndexMap<OrderedFloat<f64>, PointChild>,
    subscriber: Option<SubscriberId>,
}

impl Scatter {
    pub fn attach(
        chart: &ChartContext,
        group: Group,
        config: ScatterConfig,
        name: Option<String>,
    ) -> ChartResult<Rc<RefCell<Self>>> {
        if !config.radius.is_finite() || config.radius < 0.0 {
            return Err(ChartError::InvalidConfig(
                "scatter radius must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(animate) = config.animate {
            animate.validate()?;
        }
        let visualizer = DataVisualizer::new(chart, group.clone(), VisualizerKind::Scatter, name);
        let scatter = Rc::new(RefCell::new(Self {
            visualizer,
            config,
            chart: chart.clone(),
            points: IndexMap::new(),
            subscriber: None,
        }));
        let id = group.register_subscriber(scatter.clone());
        scatter.borrow_mut().subscriber = Some(id);
        Ok(scatter)
    }

    #[must_use]
    pub fn visualizer(&self) -> &DataVisualizer {
        &self.visualizer
    }

    pub fn set_data(&self, data: Option<Vec<Datum>>) -> ChartResult<bool> {
        self.visualizer.set_data(data)
    }

    /// Points currently drawn, in data order.
    #[must_use]
    pub fn points(&self) -> Vec<Rc<RefCell<ScatterPoint>>> {
        self.points
            .values()
            .map(|child| Rc::clone(&child.point))
            .collect()
    }

    /// Removes every point with its exit animation and detaches the series.
    pub fn detach(&mut self) -> ChartResult<()> {
        let group = self.visualizer.group().clone();
        if let Some(id) = self.subscriber.take() {
            group.unregister_subscriber(id);
        }
        let settings = group.animate_settings();
        for (_, child) in self.points.drain(..) {
            group.unregister_subscriber(child.subscriber);
            child.point.borrow_mut().remove(settings);
        }
        self.visualizer.detach()
    }
}

impl DataSubscriber for Scatter {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()> {
        let data = self.visualizer.rendered_data().unwrap_or_default();
        let mut next: IndexMap<OrderedFloat<f64>, Datum> = IndexMap::new();
        for datum in data {
            next.insert(datum.x.key(), datum);
        }

        let settings = group.animate_settings();
        self.points.retain(|key, child| {
            if next.contains_key(key) {
                return true;
            }
            group.unregister_subscriber(child.subscriber);
            child.point.borrow_mut().remove(settings);
            false
        });

        for (key, datum) in next {
            if let Some(child) = self.points.get(&key) {
                child.point.borrow_mut().set_datum(datum);
                continue;
            }
            let point = Rc::new(RefCell::new(ScatterPoint::new(
                &self.chart,
                datum,
                self.config,
            )));
            let subscriber = group.register_subscriber(point.clone());
            self.points.insert(key, PointChild { point, subscriber });
        }
        debug!(
            name = self.visualizer.name(),
            points = self.points.len(),
            "reconciled scatter points"
        );
        Ok(())
    }
}

impl fmt::Debug for Scatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scatter")
            .field("visualizer", &self.visualizer)
            .field("config", &self.config)
            .field("points", &self.points.len())
            .finish()
    }
}
