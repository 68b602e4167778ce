use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::animation::settings::AnimateSettings;
use crate::runtime::{EventLoop, FrameId};

struct CycleRun {
    generation: u64,
    duration: Duration,
    ease: Ease,
    accumulated: Duration,
    last_tick: Duration,
    callback: Box<dyn FnMut(f64)>,
}

struct CycleShared {
    event_loop: EventLoop,
    generation: Cell<u64>,
    frame: Cell<Option<FrameId>>,
    run: RefCell<Option<CycleRun>>,
}

/// Eased progress loop where starting a new cycle cancels the previous one.
///
/// Used for transitions that are not tied to a single attribute, such as an
/// axis moving from its previous scale domain to the new one.
#[derive(Clone)]
pub struct ProgressCycle {
    shared: Rc<CycleShared>,
}

impl ProgressCycle {
    #[must_use]
    pub fn new(event_loop: EventLoop) -> Self {
        Self {
            shared: Rc::new(CycleShared {
                event_loop,
                generation: Cell::new(0),
                frame: Cell::new(None),
                run: RefCell::new(None),
            }),
        }
    }

    /// Starts a cycle calling `callback` with eased progress on every frame
    /// until progress reaches 1. The first call happens synchronously.
    pub fn start(&self, settings: AnimateSettings, callback: impl FnMut(f64) + 'static) {
        self.cancel();
        let generation = self.shared.generation.get();
        *self.shared.run.borrow_mut() = Some(CycleRun {
            generation,
            duration: settings.duration(),
            ease: settings.ease,
            accumulated: Duration::ZERO,
            last_tick: self.shared.event_loop.now(),
            callback: Box::new(callback),
        });
        let now = self.shared.event_loop.now();
        step(&self.shared, generation, now);
    }

    pub fn cancel(&self) {
        if let Some(frame) = self.shared.frame.take() {
            self.shared.event_loop.cancel_frame(frame);
        }
        self.shared.generation.set(self.shared.generation.get() + 1);
        self.shared.run.borrow_mut().take();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.run.borrow().is_some()
    }
}

fn step(shared: &Rc<CycleShared>, generation: u64, now: Duration) {
    shared.frame.set(None);
    let Some(mut run) = shared.run.borrow_mut().take() else {
        return;
    };
    if run.generation != generation {
        return;
    }

    run.accumulated += now.saturating_sub(run.last_tick);
    run.last_tick = now;
    let progress = if run.duration.is_zero() {
        1.0
    } else {
        (run.accumulated.as_secs_f64() / run.duration.as_secs_f64()).min(1.0)
    };
    (run.callback)(run.ease.apply(progress));

    // The callback may have started a newer cycle.
    if shared.generation.get() != generation || progress >= 1.0 {
        return;
    }
    *shared.run.borrow_mut() = Some(run);
    let next = Rc::clone(shared);
    let frame = shared
        .event_loop
        .request_frame(move |now| step(&next, generation, now));
    shared.frame.set(Some(frame));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ease::{EaseCurve, EaseMode};
    use crate::runtime::ManualClock;

    #[test]
    fn restarting_cancels_the_previous_cycle() {
        let clock = ManualClock::new();
        let event_loop = EventLoop::new(clock.clone());
        let cycle = ProgressCycle::new(event_loop.clone());
        let settings =
            AnimateSettings::new(100.0).with_ease(Ease::new(EaseCurve::Linear, EaseMode::In));

        let first = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&first);
        cycle.start(settings, move |t| sink.borrow_mut().push(t));

        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&second);
        cycle.start(settings, move |t| sink.borrow_mut().push(t));

        for _ in 0..4 {
            clock.advance(Duration::from_millis(50));
            event_loop.tick_frame();
        }

        assert_eq!(first.borrow().as_slice(), &[0.0]);
        assert_eq!(second.borrow().as_slice(), &[0.0, 0.5, 1.0]);
        assert!(!cycle.is_running());
    }
}
