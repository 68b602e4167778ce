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
pub struct LineConfig {
    #[serde(default)]
    pub animate: Option<AnimateSettings>,
}

/// Straight-segment path through `data` in pixel space.
#[must_use]
pub fn line_path(data: &[Datum], scales: ScalePair) -> Option<String> {
    let mut path = String::new();
    for (index, datum) in data.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let x = scales.x.map(datum.x);
        let y = scales.y.map(datum.y);
        path.push_str(&format!("{command}{x},{y}"));
    }
    (!path.is_empty()).then_some(path)
}

/// Geometry inputs of a line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineView {
    pub data: Vec<Datum>,
    pub scales: Option<ScalePair>,
}

impl LineView {
    #[must_use]
    pub fn d(&self) -> Option<String> {
        line_path(&self.data, self.scales?)
    }

    /// Same line flattened onto `y = 0`.
    #[must_use]
    pub fn zero_path(&self) -> Option<String> {
        let flattened: Vec<Datum> = self.data.iter().map(|datum| datum.with_y(0.0)).collect();
        line_path(&flattened, self.scales?)
    }
}

impl Animatable for LineView {
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

/// Line visualization drawing its rendered data as one path.
///
/// The path morphs between updates and collapses onto `y = 0` on exit.
pub struct Line {
    visualizer: DataVisualizer,
    node: NodeId,
    view: LineView,
    animator: Animator<LineView>,
    writer: Rc<RefCell<dyn AttributeWriter>>,
    subscriber: Option<SubscriberId>,
}

impl Line {
    pub fn attach(
        chart: &ChartContext,
        group: Group,
        config: LineConfig,
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
            AnimationConfig::<LineView>::new(node, ATTR_D)
                .transitory(|from, to, _| Some(interpolate_path(from.as_text()?, to.as_text()?)))
                .exit(|from, view: &LineView| {
                    Some(interpolate_path(from.as_text()?, &view.zero_path()?))
                }),
        );

        let line = Rc::new(RefCell::new(Self {
            visualizer: DataVisualizer::new(chart, group.clone(), VisualizerKind::Line, name),
            node,
            view: LineView::default(),
            animator,
            writer: chart.writer(),
            subscriber: None,
        }));
        let id = group.register_subscriber(line.clone());
        line.borrow_mut().subscriber = Some(id);
        Ok(line)
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
    pub fn view(&self) -> &LineView {
        &self.view
    }

    #[must_use]
    pub fn animator(&self) -> &Animator<LineView> {
        &self.animator
    }

    pub fn set_data(&self, data: Option<Vec<Datum>>) -> ChartResult<bool> {
        self.visualizer.set_data(data)
    }

    /// Collapses the line, removes its node and detaches its data.
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

impl DataSubscriber for Line {
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

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("visualizer", &self.visualizer)
            .field("node", &self.node)
            .field("points", &self.view.data.len())
            .finish()
    }
}
