use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use unichart::animation::{
    AnimateSettings, Animatable, AnimationConfig, Animator, Ease, interpolate_number,
};
use unichart::render::{AttrValue, AttributeWriter, NodeId, RecordingWriter, WriteOp};
use unichart::runtime::{EventLoop, ManualClock};

const HEIGHT: &str = "height";

struct Column {
    height: f64,
}

impl Animatable for Column {
    fn attribute_value(&self, name: &str) -> Option<AttrValue> {
        match name {
            HEIGHT => Some(AttrValue::Number(self.height)),
            _ => None,
        }
    }
}

struct Fixture {
    clock: ManualClock,
    event_loop: EventLoop,
    writer: Rc<RefCell<RecordingWriter>>,
    node: NodeId,
}

impl Fixture {
    fn new() -> Self {
        let clock = ManualClock::new();
        Self {
            event_loop: EventLoop::new(clock.clone()),
            clock,
            writer: Rc::new(RefCell::new(RecordingWriter::new())),
            node: NodeId::new(1),
        }
    }

    fn animator(&self, config: AnimationConfig<Column>) -> Animator<Column> {
        let writer: Rc<RefCell<dyn AttributeWriter>> = self.writer.clone();
        let mut animator = Animator::new(self.event_loop.clone(), writer);
        animator.register_animation(HEIGHT, config);
        animator
    }

    fn advance(&self, millis: u64) {
        self.clock.advance(Duration::from_millis(millis));
        self.event_loop.tick_frame();
    }

    fn height(&self) -> Option<f64> {
        self.writer.borrow().number(self.node, HEIGHT)
    }

    fn last_set(&self) -> Option<AttrValue> {
        self.writer
            .borrow()
            .log()
            .iter()
            .rev()
            .find_map(|record| match &record.op {
                WriteOp::Set(value) if record.attribute == HEIGHT => Some(value.clone()),
                _ => None,
            })
    }
}

fn growing(node: NodeId) -> AnimationConfig<Column> {
    AnimationConfig::<Column>::new(node, HEIGHT)
        .enter(|to, _| to.as_number().map(|to| interpolate_number(0.0, to)))
        .transitory(|from, to, _| Some(interpolate_number(from.as_number()?, to.as_number()?)))
        .exit(|from, _| from.as_number().map(|from| interpolate_number(from, 0.0)))
}

fn linear(duration_ms: f64) -> AnimateSettings {
    AnimateSettings::new(duration_ms).with_ease(Ease::LINEAR)
}

#[test]
fn without_settings_targets_are_written_directly() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));

    let started = animator.check_for_animation(&Column { height: 40.0 }, None);

    assert!(started.is_none());
    assert_eq!(fx.height(), Some(40.0));
    assert!(fx.event_loop.is_idle());
    assert!(!animator.is_first_draw());
}

#[test]
fn enter_animation_grows_from_enter_value_to_target() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));

    animator
        .check_for_animation(&Column { height: 100.0 }, Some(linear(500.0)))
        .expect("enter loop");
    assert_eq!(fx.height(), Some(0.0));

    fx.advance(250);
    assert_abs_diff_eq!(fx.height().expect("mid value"), 50.0, epsilon = 1e-9);

    fx.advance(250);
    assert_eq!(fx.height(), Some(100.0));
    assert_eq!(animator.running_loops(), 0);
    assert_eq!(animator.from_value(HEIGHT), Some(AttrValue::Number(100.0)));
}

#[test]
fn element_settings_override_group_settings() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    animator.set_settings(Some(linear(100.0)));

    animator
        .check_for_animation(&Column { height: 10.0 }, Some(linear(1_000.0)))
        .expect("enter loop");
    fx.advance(100);

    assert_eq!(fx.height(), Some(10.0));
    assert_eq!(animator.running_loops(), 0);
}

#[test]
fn newer_loop_takes_over_an_animating_attribute() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(500.0));

    let first = animator
        .check_for_animation(&Column { height: 100.0 }, settings)
        .expect("enter loop");
    fx.advance(250);

    let second = animator
        .check_for_animation(&Column { height: 200.0 }, settings)
        .expect("update loop");
    assert_ne!(first, second);
    assert_eq!(animator.owner_of(HEIGHT), Some(second));
    // The update starts where the interrupted enter left off.
    assert_abs_diff_eq!(fx.height().expect("restart value"), 50.0, epsilon = 1e-9);

    let writes_before = fx.writer.borrow().set_count(fx.node, HEIGHT);
    fx.advance(250);
    let writes_after = fx.writer.borrow().set_count(fx.node, HEIGHT);

    assert_eq!(writes_after - writes_before, 1);
    assert_eq!(animator.running_loops(), 1);
    assert_abs_diff_eq!(fx.height().expect("half way"), 125.0, epsilon = 1e-9);

    fx.advance(250);
    assert_eq!(fx.height(), Some(200.0));
    assert_eq!(animator.running_loops(), 0);
}

#[test]
fn unchanged_target_starts_nothing() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(100.0));

    animator.check_for_animation(&Column { height: 5.0 }, settings);
    fx.advance(100);
    let writes = fx.writer.borrow().log().len();

    assert!(
        animator
            .check_for_animation(&Column { height: 5.0 }, settings)
            .is_none()
    );
    assert_eq!(fx.writer.borrow().log().len(), writes);
    assert!(fx.event_loop.is_idle());
}

#[test]
fn exit_holds_removal_until_exit_time() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(500.0));
    animator.check_for_animation(&Column { height: 80.0 }, settings);
    fx.advance(500);

    let removed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&removed);
    let writer = Rc::clone(&fx.writer);
    let node = fx.node;
    animator
        .begin_exit(&Column { height: 80.0 }, settings, move || {
            flag.set(true);
            writer.borrow_mut().remove_node(node);
        })
        .expect("exit loop");
    assert!(animator.is_exiting());

    fx.advance(500);
    assert_eq!(fx.height(), Some(0.0));
    assert!(!removed.get());

    fx.advance(20);
    assert!(removed.get());
    assert!(fx.writer.borrow().is_removed(fx.node));
}

#[test]
fn exiting_element_ignores_further_updates() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(100.0));
    animator.check_for_animation(&Column { height: 10.0 }, settings);
    fx.advance(100);

    animator.begin_exit(&Column { height: 10.0 }, settings, || {});

    assert!(
        animator
            .check_for_animation(&Column { height: 99.0 }, settings)
            .is_none()
    );
}

#[test]
fn starting_an_animation_while_exiting_keeps_the_pending_removal() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(100.0));
    animator.check_for_animation(&Column { height: 10.0 }, settings);
    fx.advance(100);

    let removed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&removed);
    animator
        .begin_exit(&Column { height: 10.0 }, settings, move || flag.set(true))
        .expect("exit loop");
    fx.advance(16);

    assert!(
        animator
            .start_animation(&Column { height: 30.0 }, linear(100.0))
            .is_none()
    );
    for _ in 0..50 {
        fx.advance(16);
    }

    assert!(removed.get());
    assert_eq!(fx.height(), Some(0.0));
    assert!(fx.event_loop.is_idle());
}

#[test]
fn repeated_exit_runs_every_removal_callback() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(500.0));
    animator.check_for_animation(&Column { height: 80.0 }, settings);
    fx.advance(500);

    let removals = Rc::new(Cell::new(0));
    let first = Rc::clone(&removals);
    animator
        .begin_exit(&Column { height: 80.0 }, settings, move || first.set(first.get() + 1))
        .expect("first exit");
    fx.advance(100);
    assert_abs_diff_eq!(fx.height().expect("shrinking"), 64.0, epsilon = 1e-9);

    let second = Rc::clone(&removals);
    animator
        .begin_exit(&Column { height: 80.0 }, settings, move || second.set(second.get() + 1))
        .expect("second exit");
    assert_eq!(animator.running_loops(), 1);

    fx.advance(500);
    assert_eq!(removals.get(), 0);
    fx.advance(20);
    assert_eq!(removals.get(), 2);
    assert_eq!(animator.running_loops(), 0);
}

#[test]
fn unrepresentable_duration_does_not_panic() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));

    animator
        .start_animation(&Column { height: 50.0 }, AnimateSettings::new(1e300))
        .expect("enter loop");
    fx.advance(1_000);

    assert_abs_diff_eq!(fx.height().expect("entering"), 0.0, epsilon = 1e-9);
    assert_eq!(animator.running_loops(), 1);
    animator.stop();
}

#[test]
fn exit_falls_back_to_transitory_towards_current_target() {
    let fx = Fixture::new();
    let config = AnimationConfig::<Column>::new(fx.node, HEIGHT)
        .transitory(|from, to, _| Some(interpolate_number(from.as_number()?, to.as_number()?)));
    let mut animator = fx.animator(config);
    let settings = Some(linear(200.0));
    animator.check_for_animation(&Column { height: 100.0 }, settings);
    fx.advance(200);

    let removed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&removed);
    animator
        .begin_exit(&Column { height: 30.0 }, settings, move || flag.set(true))
        .expect("fallback exit loop");

    fx.advance(200);
    assert!(!removed.get());
    assert_eq!(fx.last_set(), Some(AttrValue::Number(30.0)));

    fx.advance(20);
    assert!(removed.get());
}

#[test]
fn exit_without_providers_removes_immediately() {
    let fx = Fixture::new();
    let mut animator = fx.animator(AnimationConfig::<Column>::new(fx.node, HEIGHT));
    let settings = Some(linear(200.0));
    animator.check_for_animation(&Column { height: 1.0 }, settings);
    fx.advance(200);

    let removed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&removed);
    let started = animator.begin_exit(&Column { height: 1.0 }, settings, move || flag.set(true));

    assert!(started.is_none());
    assert!(removed.get());
}

#[test]
fn exit_without_settings_removes_immediately() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    animator.check_for_animation(&Column { height: 1.0 }, None);

    let removed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&removed);
    animator.begin_exit(&Column { height: 1.0 }, None, move || flag.set(true));

    assert!(removed.get());
}

#[test]
fn stop_drops_loops_without_completing_them() {
    let fx = Fixture::new();
    let mut animator = fx.animator(growing(fx.node));
    let settings = Some(linear(100.0));
    animator.check_for_animation(&Column { height: 10.0 }, settings);
    fx.advance(100);

    let removed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&removed);
    animator.begin_exit(&Column { height: 10.0 }, settings, move || flag.set(true));
    animator.stop();
    fx.advance(500);

    assert_eq!(animator.running_loops(), 0);
    assert!(!removed.get());
    assert!(fx.event_loop.is_idle());
}

#[test]
fn progress_cycle_reports_eased_progress_until_done() {
    let fx = Fixture::new();
    let animator = fx.animator(growing(fx.node));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let started =
        animator.run_progress_cycle(&Column { height: 1.0 }, Some(linear(100.0)), move |t| {
            sink.borrow_mut().push(t);
        });
    fx.advance(50);
    fx.advance(50);

    assert!(started);
    assert_eq!(*seen.borrow(), vec![0.0, 0.5, 1.0]);
    assert!(!animator.run_progress_cycle(&Column { height: 1.0 }, None, |_| {}));
}
