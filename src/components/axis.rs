use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::{AnimateSettings, Animatable, Animator};
use crate::components::chart::ChartContext;
use crate::core::{DEFAULT_TICK_COUNT, LinearScale, TickList, XScale, XValue};
use crate::error::ChartResult;
use crate::group::{DataSubscriber, Group, SubscriberId};
use crate::layout::translate;
use crate::render::AttrValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

/// Which scale of the group an axis follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Independent,
    Dependent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default)]
    pub side: AxisSide,
    #[serde(default)]
    pub axis_type: AxisType,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    /// Explicit ticks; values outside the domain are dropped.
    #[serde(default)]
    pub tick_values: Option<Vec<XValue>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub animate: Option<AnimateSettings>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            side: AxisSide::default(),
            axis_type: AxisType::default(),
            tick_count: default_tick_count(),
            tick_values: None,
            name: None,
            animate: None,
        }
    }
}

fn default_tick_count() -> usize {
    DEFAULT_TICK_COUNT
}

/// Ticks of `scale`: the explicit values inside the domain when given,
/// otherwise `count` nice ticks.
#[must_use]
pub fn generate_ticks(scale: XScale, count: usize, values: Option<&[XValue]>) -> TickList<XValue> {
    match values {
        Some(values) => scale.ticks_from(values),
        None => scale.ticks(count),
    }
}

/// Animation target of an axis: the displayed scale.
#[derive(Debug, Clone)]
pub struct AxisView {
    scale: Rc<Cell<Option<XScale>>>,
}

impl Animatable for AxisView {
    fn attribute_value(&self, _name: &str) -> Option<AttrValue> {
        None
    }

    fn should_animate(&self) -> bool {
        self.scale.get().is_some()
    }
}

/// Axis following one scale of a group.
///
/// When the group's scales change the displayed scale moves from its
/// current domain to the new one over the animation settings' duration.
pub struct Axis {
    config: AxisConfig,
    name: String,
    group: Group,
    chart: ChartContext,
    view: AxisView,
    previous_scale: Option<XScale>,
    animator: Animator<AxisView>,
    subscriber: Option<SubscriberId>,
}

impl Axis {
    /// Creates the axis and subscribes it to `group`, or to the chart's first
    /// group when none is given.
    pub fn attach(
        chart: &ChartContext,
        group: Option<Group>,
        config: AxisConfig,
    ) -> ChartResult<Rc<RefCell<Self>>> {
        let group = match group {
            Some(group) => group,
            None => chart.default_group()?,
        };
        if let Some(animate) = config.animate {
            animate.validate()?;
        }
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| format!("{:?}", config.side).to_lowercase());
        let mut animator = Animator::new(chart.event_loop().clone(), chart.writer());
        animator.set_settings(config.animate);
        chart.with_children(|children| children.register_axis(name.clone()));

        let axis = Rc::new(RefCell::new(Self {
            config,
            name,
            group: group.clone(),
            chart: chart.clone(),
            view: AxisView {
                scale: Rc::new(Cell::new(None)),
            },
            previous_scale: None,
            animator,
            subscriber: None,
        }));
        let id = group.register_subscriber(axis.clone());
        axis.borrow_mut().subscriber = Some(id);
        Ok(axis)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Scale currently displayed, possibly mid-transition.
    #[must_use]
    pub fn scale(&self) -> Option<XScale> {
        self.view.scale.get()
    }

    #[must_use]
    pub fn previous_scale(&self) -> Option<XScale> {
        self.previous_scale
    }

    #[must_use]
    pub fn ticks(&self) -> Option<TickList<XValue>> {
        let scale = self.scale()?;
        Some(generate_ticks(
            scale,
            self.config.tick_count,
            self.config.tick_values.as_deref(),
        ))
    }

    /// Transform placing the axis line along its side of the content area.
    #[must_use]
    pub fn axis_translate(&self) -> String {
        let rect = self.group.content_rect();
        match self.config.side {
            AxisSide::Top => translate(0.0, rect.top),
            AxisSide::Bottom => translate(0.0, rect.bottom),
            AxisSide::Right => translate(rect.right, 0.0),
            AxisSide::Left => translate(rect.left, 0.0),
        }
    }

    /// `-1` for axes drawn towards the outside on the top or left.
    #[must_use]
    pub fn drawing_sign(&self) -> f64 {
        match self.config.side {
            AxisSide::Left | AxisSide::Top => -1.0,
            AxisSide::Right | AxisSide::Bottom => 1.0,
        }
    }

    /// Stops any transition and unregisters the axis.
    pub fn detach(&mut self) {
        self.animator.stop();
        if let Some(id) = self.subscriber.take() {
            self.group.unregister_subscriber(id);
        }
        self.chart
            .with_children(|children| children.unregister_axis(&self.name));
    }
}

impl DataSubscriber for Axis {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()> {
        let Some(scales) = group.current_scales() else {
            return Ok(());
        };
        let scale = match self.config.axis_type {
            AxisType::Independent => scales.x,
            AxisType::Dependent => XScale::Linear(scales.y),
        };
        self.previous_scale = Some(self.view.scale.get().unwrap_or(scale));
        self.view.scale.set(Some(scale));
        Ok(())
    }

    fn after_data_update(&mut self, group: &Group) -> ChartResult<()> {
        let (Some(previous), Some(target)) = (self.previous_scale, self.view.scale.get()) else {
            return Ok(());
        };
        let from = previous.domain_f64();
        let to = target.domain_f64();
        if from == to {
            return Ok(());
        }
        let displayed = Rc::clone(&self.view.scale);
        self.animator
            .run_progress_cycle(&self.view, group.animate_settings(), move |t| {
                let domain = LinearScale::interpolate_domain(from, to, t);
                match target.with_domain_f64(domain) {
                    Ok(scale) => displayed.set(Some(scale)),
                    Err(error) => warn!(%error, "skipping axis transition frame"),
                }
            });
        Ok(())
    }
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("scale", &self.view.scale.get())
            .finish()
    }
}
