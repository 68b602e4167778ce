use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::animation::ease::Ease;
use crate::animation::interpolate::{Interpolator, constant};
use crate::animation::progress::ProgressCycle;
use crate::animation::settings::AnimateSettings;
use crate::render::{AttrValue, AttributeWriter, NodeId};
use crate::runtime::{EventLoop, FrameId};

pub type EnterProvider<E> = Box<dyn Fn(&AttrValue, &E) -> Option<Interpolator>>;
pub type TransitoryProvider<E> = Box<dyn Fn(&AttrValue, &AttrValue, &E) -> Option<Interpolator>>;
pub type ExitProvider<E> = Box<dyn Fn(&AttrValue, &E) -> Option<Interpolator>>;

/// Declared animation of one element property.
///
/// Providers receive the element so they can read its scales or geometry.
/// A provider returning `None` falls back to the raw target value.
pub struct AnimationConfig<E> {
    pub node: NodeId,
    pub attribute: String,
    enter: Option<EnterProvider<E>>,
    transitory: Option<TransitoryProvider<E>>,
    exit: Option<ExitProvider<E>>,
}

impl<E> AnimationConfig<E> {
    pub fn new(node: NodeId, attribute: impl Into<String>) -> Self {
        Self {
            node,
            attribute: attribute.into(),
            enter: None,
            transitory: None,
            exit: None,
        }
    }

    #[must_use]
    pub fn enter(
        mut self,
        provider: impl Fn(&AttrValue, &E) -> Option<Interpolator> + 'static,
    ) -> Self {
        self.enter = Some(Box::new(provider));
        self
    }

    #[must_use]
    pub fn transitory(
        mut self,
        provider: impl Fn(&AttrValue, &AttrValue, &E) -> Option<Interpolator> + 'static,
    ) -> Self {
        self.transitory = Some(Box::new(provider));
        self
    }

    #[must_use]
    pub fn exit(
        mut self,
        provider: impl Fn(&AttrValue, &E) -> Option<Interpolator> + 'static,
    ) -> Self {
        self.exit = Some(Box::new(provider));
        self
    }

    #[must_use]
    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    #[must_use]
    pub fn has_transitory(&self) -> bool {
        self.transitory.is_some()
    }
}

impl<E> fmt::Debug for AnimationConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationConfig")
            .field("node", &self.node)
            .field("attribute", &self.attribute)
            .field("enter", &self.enter.is_some())
            .field("transitory", &self.transitory.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}

/// Element whose properties can be animated.
pub trait Animatable {
    /// Current target value of a registered property.
    fn attribute_value(&self, name: &str) -> Option<AttrValue>;

    /// Final readiness check, for example that scales are available.
    fn should_animate(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameLoopId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Enter,
    Update,
    Exit,
}

struct Track {
    node: NodeId,
    attribute: String,
    interpolator: Interpolator,
}

struct FrameLoop {
    tracks: IndexMap<String, Track>,
    duration: Duration,
    hold: Duration,
    ease: Ease,
    accumulated: Duration,
    last_tick: Duration,
    settled: bool,
    frame: Option<FrameId>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

#[derive(Default)]
struct AnimationState {
    from_values: IndexMap<String, AttrValue>,
    recorded_to: IndexMap<String, AttrValue>,
    loops: IndexMap<FrameLoopId, FrameLoop>,
    next_loop_id: u64,
}

struct Shared {
    event_loop: EventLoop,
    writer: Rc<RefCell<dyn AttributeWriter>>,
    state: RefCell<AnimationState>,
}

struct Write {
    name: String,
    node: NodeId,
    attribute: String,
    value: Option<AttrValue>,
}

/// Enter/update/exit animation driver for one element.
///
/// Frame loops keep running after the animator is dropped so exit
/// animations can finish.
pub struct Animator<E> {
    configs: IndexMap<String, AnimationConfig<E>>,
    settings: Option<AnimateSettings>,
    first_draw: bool,
    exiting: bool,
    shared: Rc<Shared>,
    progress_cycle: ProgressCycle,
}

impl<E: Animatable> Animator<E> {
    pub fn new(event_loop: EventLoop, writer: Rc<RefCell<dyn AttributeWriter>>) -> Self {
        Self {
            configs: IndexMap::new(),
            settings: None,
            first_draw: true,
            exiting: false,
            progress_cycle: ProgressCycle::new(event_loop.clone()),
            shared: Rc::new(Shared {
                event_loop,
                writer,
                state: RefCell::new(AnimationState::default()),
            }),
        }
    }

    /// Registers the animation of property `name`. Registering a name twice
    /// replaces the earlier config.
    pub fn register_animation(&mut self, name: impl Into<String>, config: AnimationConfig<E>) {
        self.configs.insert(name.into(), config);
    }

    /// Element-level settings, which override group-level ones.
    pub fn set_settings(&mut self, settings: Option<AnimateSettings>) {
        self.settings = settings;
    }

    #[must_use]
    pub fn settings(&self, group: Option<AnimateSettings>) -> Option<AnimateSettings> {
        AnimateSettings::resolve(self.settings, group)
    }

    #[must_use]
    pub fn is_first_draw(&self) -> bool {
        self.first_draw
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    #[must_use]
    pub fn running_loops(&self) -> usize {
        self.shared.state.borrow().loops.len()
    }

    /// In-flight loop currently driving property `name`.
    #[must_use]
    pub fn owner_of(&self, name: &str) -> Option<FrameLoopId> {
        let state = self.shared.state.borrow();
        state
            .loops
            .iter()
            .find(|(_, frame_loop)| frame_loop.tracks.contains_key(name))
            .map(|(id, _)| *id)
    }

    /// Last value written for property `name`.
    #[must_use]
    pub fn from_value(&self, name: &str) -> Option<AttrValue> {
        self.shared.state.borrow().from_values.get(name).cloned()
    }

    /// Animates towards the element's current targets when settings exist
    /// and the element is ready. Without settings the targets are written
    /// directly.
    pub fn check_for_animation(
        &mut self,
        element: &E,
        group_settings: Option<AnimateSettings>,
    ) -> Option<FrameLoopId> {
        if self.exiting || !element.should_animate() {
            return None;
        }
        match self.settings(group_settings) {
            Some(settings) => self.start_animation(element, settings),
            None => {
                self.write_targets(element);
                None
            }
        }
    }

    /// Starts an enter or update animation for every property whose target
    /// changed. Returns `None` when nothing needs to move or the element is
    /// exiting.
    pub fn start_animation(
        &mut self,
        element: &E,
        settings: AnimateSettings,
    ) -> Option<FrameLoopId> {
        if self.exiting {
            return None;
        }
        let phase = if self.first_draw {
            AnimationPhase::Enter
        } else {
            AnimationPhase::Update
        };
        let tracks = self.calculate_tracks(element, phase);
        if tracks.is_empty() {
            return None;
        }
        self.first_draw = false;
        Some(launch(
            &self.shared,
            tracks,
            settings,
            settings.duration(),
            None,
        ))
    }

    /// Runs the exit animation and calls `on_removed` once the element can
    /// be detached.
    ///
    /// Properties with an `exit` provider animate to it. Properties with only
    /// a `transitory` provider animate towards their current target and
    /// still hold removal until done. Properties with neither are left as
    /// they are. With nothing to animate `on_removed` runs immediately.
    pub fn begin_exit(
        &mut self,
        element: &E,
        group_settings: Option<AnimateSettings>,
        on_removed: impl FnOnce() + 'static,
    ) -> Option<FrameLoopId> {
        self.exiting = true;
        self.progress_cycle.cancel();
        let Some(settings) = self.settings(group_settings) else {
            on_removed();
            return None;
        };
        if !element.should_animate() {
            on_removed();
            return None;
        }
        let tracks = self.calculate_tracks(element, AnimationPhase::Exit);
        if tracks.is_empty() {
            debug!("no exit animation declared, removing immediately");
            on_removed();
            return None;
        }
        Some(launch(
            &self.shared,
            tracks,
            settings,
            settings.exit_time(),
            Some(Box::new(on_removed)),
        ))
    }

    /// Drops every in-flight loop without running completion callbacks.
    pub fn stop(&self) {
        self.progress_cycle.cancel();
        let loops = std::mem::take(&mut self.shared.state.borrow_mut().loops);
        for frame in loops.values().filter_map(|frame_loop| frame_loop.frame) {
            self.shared.event_loop.cancel_frame(frame);
        }
    }

    /// Starts a cancellable eased progress loop. Returns `false` when no
    /// animation settings apply; callers then jump straight to the end state.
    pub fn run_progress_cycle(
        &self,
        element: &E,
        group_settings: Option<AnimateSettings>,
        callback: impl FnMut(f64) + 'static,
    ) -> bool {
        match self.settings(group_settings) {
            Some(settings) if element.should_animate() => {
                self.progress_cycle.start(settings, callback);
                true
            }
            _ => false,
        }
    }

    fn write_targets(&mut self, element: &E) {
        let mut writes = Vec::with_capacity(self.configs.len());
        {
            let mut state = self.shared.state.borrow_mut();
            for (name, config) in &self.configs {
                let value = element.attribute_value(name);
                if let Some(value) = &value {
                    state.recorded_to.insert(name.clone(), value.clone());
                }
                writes.push(Write {
                    name: name.clone(),
                    node: config.node,
                    attribute: config.attribute.clone(),
                    value,
                });
            }
            record_from_values(&mut state, &writes);
        }
        self.first_draw = false;
        apply_writes(&self.shared, &writes);
    }

    fn calculate_tracks(&self, element: &E, phase: AnimationPhase) -> IndexMap<String, Track> {
        let mut tracks = IndexMap::new();
        let mut state = self.shared.state.borrow_mut();
        for (name, config) in &self.configs {
            let to = element.attribute_value(name);
            let from = state.from_values.get(name).cloned();

            let interpolator = match phase {
                AnimationPhase::Enter => {
                    let Some(to) = to.as_ref() else {
                        continue;
                    };
                    enter_interpolator(config, to, element)
                }
                AnimationPhase::Update => {
                    let Some(to) = to.as_ref() else {
                        continue;
                    };
                    if from.as_ref() == Some(to) || state.recorded_to.get(name) == Some(to) {
                        continue;
                    }
                    match (&from, &config.transitory) {
                        (Some(from), Some(provider)) => {
                            provider(from, to, element).unwrap_or_else(|| constant(to.clone()))
                        }
                        (Some(_), None) => constant(to.clone()),
                        (None, _) => enter_interpolator(config, to, element),
                    }
                }
                AnimationPhase::Exit => {
                    let Some(from) = from.as_ref() else {
                        continue;
                    };
                    let target = to.clone().unwrap_or_else(|| from.clone());
                    if let Some(provider) = &config.exit {
                        provider(from, element).unwrap_or_else(|| constant(target))
                    } else if let Some(provider) = &config.transitory {
                        provider(from, &target, element).unwrap_or_else(|| constant(target))
                    } else {
                        continue;
                    }
                }
            };

            if let Some(to) = to {
                state.recorded_to.insert(name.clone(), to);
            }
            tracks.insert(
                name.clone(),
                Track {
                    node: config.node,
                    attribute: config.attribute.clone(),
                    interpolator,
                },
            );
        }
        tracks
    }
}

impl<E> fmt::Debug for Animator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("configs", &self.configs.keys().collect::<Vec<_>>())
            .field("settings", &self.settings)
            .field("first_draw", &self.first_draw)
            .field("exiting", &self.exiting)
            .field("running_loops", &self.shared.state.borrow().loops.len())
            .finish()
    }
}

fn enter_interpolator<E>(config: &AnimationConfig<E>, to: &AttrValue, element: &E) -> Interpolator {
    config
        .enter
        .as_ref()
        .and_then(|provider| provider(to, element))
        .unwrap_or_else(|| constant(to.clone()))
}

/// Registers a frame loop, evicting its properties from older loops, and
/// runs its first frame synchronously.
///
/// Loops left without properties end at once; their completion callbacks
/// run when the new loop completes.
fn launch(
    shared: &Rc<Shared>,
    tracks: IndexMap<String, Track>,
    settings: AnimateSettings,
    hold: Duration,
    on_complete: Option<Box<dyn FnOnce()>>,
) -> FrameLoopId {
    let now = shared.event_loop.now();
    let id = {
        let mut state = shared.state.borrow_mut();
        for frame_loop in state.loops.values_mut() {
            for name in tracks.keys() {
                frame_loop.tracks.shift_remove(name);
            }
        }

        let mut inherited: Vec<Box<dyn FnOnce()>> = Vec::new();
        let emptied: Vec<FrameLoopId> = state
            .loops
            .iter()
            .filter(|(_, frame_loop)| frame_loop.tracks.is_empty())
            .map(|(id, _)| *id)
            .collect();
        for emptied_id in emptied {
            let Some(frame_loop) = state.loops.shift_remove(&emptied_id) else {
                continue;
            };
            if let Some(frame) = frame_loop.frame {
                shared.event_loop.cancel_frame(frame);
            }
            trace!(loop_id = emptied_id.0, "frame loop taken over, ending");
            inherited.extend(frame_loop.on_complete);
        }
        inherited.extend(on_complete);
        let on_complete = chain_callbacks(inherited);

        let id = FrameLoopId(state.next_loop_id);
        state.next_loop_id += 1;
        trace!(loop_id = id.0, properties = tracks.len(), "starting frame loop");
        state.loops.insert(
            id,
            FrameLoop {
                tracks,
                duration: settings.duration(),
                hold,
                ease: settings.ease,
                accumulated: Duration::ZERO,
                last_tick: now,
                settled: false,
                frame: None,
                on_complete,
            },
        );
        id
    };
    run_frame(shared, id, now);
    id
}

fn chain_callbacks(mut callbacks: Vec<Box<dyn FnOnce()>>) -> Option<Box<dyn FnOnce()>> {
    match callbacks.len() {
        0 => None,
        1 => callbacks.pop(),
        _ => Some(Box::new(move || {
            for callback in callbacks {
                callback();
            }
        })),
    }
}

fn run_frame(shared: &Rc<Shared>, id: FrameLoopId, now: Duration) {
    let mut writes = Vec::new();
    let finished = {
        let mut state = shared.state.borrow_mut();
        let Some(frame_loop) = state.loops.get_mut(&id) else {
            return;
        };
        frame_loop.frame = None;

        frame_loop.accumulated += now.saturating_sub(frame_loop.last_tick);
        frame_loop.last_tick = now;
        let progress = if frame_loop.duration.is_zero() {
            1.0
        } else {
            (frame_loop.accumulated.as_secs_f64() / frame_loop.duration.as_secs_f64()).min(1.0)
        };

        if !frame_loop.settled {
            let eased = frame_loop.ease.apply(progress);
            for (name, track) in &frame_loop.tracks {
                writes.push(Write {
                    name: name.clone(),
                    node: track.node,
                    attribute: track.attribute.clone(),
                    value: (track.interpolator)(eased),
                });
            }
            frame_loop.settled = progress >= 1.0;
        }
        let finished = frame_loop.settled && frame_loop.accumulated >= frame_loop.hold;
        record_from_values(&mut state, &writes);
        finished
    };

    apply_writes(shared, &writes);

    if finished {
        let on_complete = shared
            .state
            .borrow_mut()
            .loops
            .shift_remove(&id)
            .and_then(|frame_loop| frame_loop.on_complete);
        trace!(loop_id = id.0, "frame loop finished");
        if let Some(on_complete) = on_complete {
            on_complete();
        }
        return;
    }

    let next = Rc::clone(shared);
    let frame = shared
        .event_loop
        .request_frame(move |now| run_frame(&next, id, now));
    if let Some(frame_loop) = shared.state.borrow_mut().loops.get_mut(&id) {
        frame_loop.frame = Some(frame);
    }
}

fn record_from_values(state: &mut AnimationState, writes: &[Write]) {
    for write in writes {
        match &write.value {
            Some(value) => {
                state.from_values.insert(write.name.clone(), value.clone());
            }
            None => {
                state.from_values.shift_remove(&write.name);
            }
        }
    }
}

fn apply_writes(shared: &Shared, writes: &[Write]) {
    if writes.is_empty() {
        return;
    }
    let mut writer = shared.writer.borrow_mut();
    for write in writes {
        match &write.value {
            Some(value) => writer.set_attribute(write.node, &write.attribute, value),
            None => writer.remove_attribute(write.node, &write.attribute),
        }
    }
}
