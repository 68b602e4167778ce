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
use crate::error::ChartResult;
use crate::group::{DataSubscriber, Group, SubscriberId};
use crate::layout::bar_x;
use crate::render::{AttrValue, AttributeWriter, NodeId};

pub const ATTR_X: &str = "x";
pub const ATTR_Y: &str = "y";
pub const ATTR_HEIGHT: &str = "height";
pub const ATTR_WIDTH: &str = "width";

/// Settings of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default)]
    pub animate: Option<AnimateSettings>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            animate: None,
        }
    }
}

fn default_bar_width() -> f64 {
    10.0
}

/// Slot of a bar series among the bar series of its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeriesSlot {
    pub index: usize,
    pub count: usize,
}

/// Geometry inputs of one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleBarView {
    pub datum: Datum,
    pub scales: Option<ScalePair>,
    pub baseline: f64,
    pub bar_width: f64,
    pub spread: f64,
    pub slot: SeriesSlot,
}

impl SingleBarView {
    #[must_use]
    pub fn x(&self) -> Option<f64> {
        let scales = self.scales?;
        Some(bar_x(
            scales.x.map(self.datum.x),
            self.bar_width,
            self.spread,
            self.slot.index,
            self.slot.count.max(1),
        ))
    }

    #[must_use]
    pub fn y(&self) -> Option<f64> {
        Some(self.scales?.y.map(self.datum.y))
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        Some(self.baseline - self.y()?)
    }
}

impl Animatable for SingleBarView {
    fn attribute_value(&self, name: &str) -> Option<AttrValue> {
        match name {
            ATTR_X => self.x().map(AttrValue::Number),
            ATTR_Y => self.y().map(AttrValue::Number),
            ATTR_HEIGHT => self.height().map(AttrValue::Number),
            _ => None,
        }
    }

    fn should_animate(&self) -> bool {
        self.scales.is_some()
    }
}

fn bar_animations(node: NodeId) -> [(&'static str, AnimationConfig<SingleBarView>); 3] {
    [
        (
            ATTR_HEIGHT,
            AnimationConfig::<SingleBarView>::new(node, ATTR_HEIGHT)
                .enter(|to, _| to.as_number().map(|to| interpolate_number(0.0, to)))
                .transitory(numbers)
                .exit(|from, _| from.as_number().map(|from| interpolate_number(from, 0.0))),
        ),
        (
            ATTR_X,
            AnimationConfig::<SingleBarView>::new(node, ATTR_X)
                .transitory(numbers)
                .exit(|from, view: &SingleBarView| {
                    Some(interpolate_number(from.as_number()?, view.x()?))
                }),
        ),
        (
            ATTR_Y,
            AnimationConfig::<SingleBarView>::new(node, ATTR_Y)
                .enter(|to, view: &SingleBarView| {
                    to.as_number()
                        .map(|to| interpolate_number(view.baseline, to))
                })
                .transitory(numbers)
                .exit(|from, view: &SingleBarView| {
                    from.as_number()
                        .map(|from| interpolate_number(from, view.baseline))
                }),
        ),
    ]
}

fn numbers(
    from: &AttrValue,
    to: &AttrValue,
    _view: &SingleBarView,
) -> Option<Interpolator> {
    Some(interpolate_number(from.as_number()?, to.as_number()?))
}

/// One animated `<rect>` of a bar series.
///
/// Grows from the baseline on enter and shrinks back to it on exit.
pub struct SingleBar {
    node: NodeId,
    view: SingleBarView,
    animator: Animator<SingleBarView>,
    writer: Rc<RefCell<dyn AttributeWriter>>,
}

impl SingleBar {
    pub fn new(chart: &ChartContext, datum: Datum, config: BarConfig, slot: SeriesSlot) -> Self {
        let node = chart.allocate_node();
        let mut animator = Animator::new(chart.event_loop().clone(), chart.writer());
        animator.set_settings(config.animate);
        for (name, animation) in bar_animations(node) {
            animator.register_animation(name, animation);
        }
        chart
            .writer()
            .borrow_mut()
            .set_attribute(node, ATTR_WIDTH, &AttrValue::Number(config.bar_width));
        Self {
            node,
            view: SingleBarView {
                datum,
                scales: None,
                baseline: 0.0,
                bar_width: config.bar_width,
                spread: 0.0,
                slot,
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
    pub fn view(&self) -> &SingleBarView {
        &self.view
    }

    #[must_use]
    pub fn animator(&self) -> &Animator<SingleBarView> {
        &self.animator
    }

    pub fn set_datum(&mut self, datum: Datum) {
        self.view.datum = datum;
    }

    pub fn set_slot(&mut self, slot: SeriesSlot) {
        self.view.slot = slot;
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

impl DataSubscriber for SingleBar {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()> {
        self.view.scales = group.current_scales();
        self.view.spread = group.spread();
        self.view.baseline = group.content_rect().bottom;
        Ok(())
    }

    fn after_data_update(&mut self, group: &Group) -> ChartResult<()> {
        self.animator
            .check_for_animation(&self.view, group.animate_settings());
        Ok(())
    }
}

impl fmt::Debug for SingleBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleBar")
            .field("node", &self.node)
            .field("view", &self.view)
            .finish()
    }
}

struct BarChild {
    bar: Rc<RefCell<SingleBar>>,
    subscriber: SubscriberId,
}

/// Bar series: one `SingleBar` per rendered datum, keyed by `x`.
pub struct Bar {
    visualizer: DataVisualizer,
    config: BarConfig,
    chart: ChartContext,
    slot: SeriesSlot,
    bars: IndexMap<OrderedFloat<f64>, BarChild>,
    subscriber: Option<SubscriberId>,
}

impl Bar {
    pub fn attach(
        chart: &ChartContext,
        group: Group,
        config: BarConfig,
        slot: SeriesSlot,
        name: Option<String>,
    ) -> ChartResult<Rc<RefCell<Self>>> {
        if let Some(animate) = config.animate {
            animate.validate()?;
        }
        let visualizer = DataVisualizer::new(chart, group.clone(), VisualizerKind::Bar, name);
        let bar = Rc::new(RefCell::new(Self {
            visualizer,
            config,
            chart: chart.clone(),
            slot,
            bars: IndexMap::new(),
            subscriber: None,
        }));
        let id = group.register_subscriber(bar.clone());
        bar.borrow_mut().subscriber = Some(id);
        Ok(bar)
    }

    #[must_use]
    pub fn visualizer(&self) -> &DataVisualizer {
        &self.visualizer
    }

    pub fn set_data(&self, data: Option<Vec<Datum>>) -> ChartResult<bool> {
        self.visualizer.set_data(data)
    }

    /// Moves the series to another slot; bars pick it up on the next batch.
    pub fn set_slot(&mut self, slot: SeriesSlot) {
        self.slot = slot;
        for child in self.bars.values() {
            child.bar.borrow_mut().set_slot(slot);
        }
    }

    /// Bars currently drawn, in data order.
    #[must_use]
    pub fn bars(&self) -> Vec<Rc<RefCell<SingleBar>>> {
        self.bars.values().map(|child| Rc::clone(&child.bar)).collect()
    }

    /// Removes every bar with its exit animation and detaches the series.
    pub fn detach(&mut self) -> ChartResult<()> {
        let group = self.visualizer.group().clone();
        if let Some(id) = self.subscriber.take() {
            group.unregister_subscriber(id);
        }
        let settings = group.animate_settings();
        for (_, child) in self.bars.drain(..) {
            group.unregister_subscriber(child.subscriber);
            child.bar.borrow_mut().remove(settings);
        }
        self.visualizer.detach()
    }
}

impl DataSubscriber for Bar {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()> {
        let data = self.visualizer.rendered_data().unwrap_or_default();
        let mut next: IndexMap<OrderedFloat<f64>, Datum> = IndexMap::new();
        for datum in data {
            next.insert(datum.x.key(), datum);
        }

        let settings = group.animate_settings();
        let stale: Vec<OrderedFloat<f64>> = self
            .bars
            .keys()
            .filter(|key| !next.contains_key(*key))
            .copied()
            .collect();
        for key in stale {
            if let Some(child) = self.bars.shift_remove(&key) {
                group.unregister_subscriber(child.subscriber);
                child.bar.borrow_mut().remove(settings);
            }
        }

        for (key, datum) in next {
            if let Some(child) = self.bars.get(&key) {
                child.bar.borrow_mut().set_datum(datum);
                continue;
            }
            let bar = Rc::new(RefCell::new(SingleBar::new(
                &self.chart,
                datum,
                self.config,
                self.slot,
            )));
            // New bars are updated right away since the batch is running.
            let subscriber = group.register_subscriber(bar.clone());
            self.bars.insert(key, BarChild { bar, subscriber });
        }
        debug!(
            name = self.visualizer.name(),
            bars = self.bars.len(),
            "reconciled bars"
        );
        Ok(())
    }
}

impl fmt::Debug for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bar")
            .field("visualizer", &self.visualizer)
            .field("config", &self.config)
            .field("bars", &self.bars.len())
            .finish()
    }
}
