use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use super::clock::{Clock, MonotonicClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

type DeferredTask = Box<dyn FnOnce()>;
type FrameCallback = Box<dyn FnOnce(Duration)>;

#[derive(Default)]
struct LoopState {
    next_id: u64,
    deferred: VecDeque<(TaskId, DeferredTask)>,
    frames: VecDeque<(FrameId, FrameCallback)>,
}

impl LoopState {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Cloneable handle to a cooperative event loop.
///
/// Callbacks never run while the loop's own state is borrowed, so tasks may
/// freely schedule or cancel other work.
#[derive(Clone)]
pub struct EventLoop {
    state: Rc<RefCell<LoopState>>,
    clock: Rc<dyn Clock>,
}

impl EventLoop {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(LoopState::default())),
            clock: Rc::new(clock),
        }
    }

    #[must_use]
    pub fn with_system_clock() -> Self {
        Self::new(MonotonicClock::new())
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Queues a task to run on the next `run_deferred` turn.
    pub fn defer(&self, task: impl FnOnce() + 'static) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = TaskId(state.allocate_id());
        state.deferred.push_back((id, Box::new(task)));
        id
    }

    /// Returns `true` when a still-queued task was removed.
    pub fn cancel_deferred(&self, id: TaskId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.deferred.len();
        state.deferred.retain(|(queued, _)| *queued != id);
        state.deferred.len() != before
    }

    /// Queues a callback for the next display frame. It receives the clock
    /// time sampled for that frame.
    pub fn request_frame(&self, callback: impl FnOnce(Duration) + 'static) -> FrameId {
        let mut state = self.state.borrow_mut();
        let id = FrameId(state.allocate_id());
        state.frames.push_back((id, Box::new(callback)));
        id
    }

    pub fn cancel_frame(&self, id: FrameId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.frames.len();
        state.frames.retain(|(queued, _)| *queued != id);
        state.frames.len() != before
    }

    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.state.borrow().deferred.len()
    }

    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.state.borrow();
        state.deferred.is_empty() && state.frames.is_empty()
    }

    /// Runs the tasks queued before this call. Tasks queued meanwhile wait
    /// for the next turn. Returns how many tasks ran.
    pub fn run_deferred(&self) -> usize {
        let limit = self.state.borrow().next_id;
        let mut ran = 0;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.deferred.front() {
                    Some((id, _)) if id.0 < limit => state.deferred.pop_front(),
                    _ => None,
                }
            };
            let Some((_, task)) = next else {
                break;
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, "ran deferred tasks");
        }
        ran
    }

    /// Samples the clock once and runs the frame callbacks requested before
    /// this call. Returns how many callbacks ran.
    pub fn tick_frame(&self) -> usize {
        let limit = self.state.borrow().next_id;
        let now = self.clock.now();
        let mut ran = 0;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.frames.front() {
                    Some((id, _)) if id.0 < limit => state.frames.pop_front(),
                    _ => None,
                }
            };
            let Some((_, callback)) = next else {
                break;
            };
            callback(now);
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, now_ms = now.as_secs_f64() * 1_000.0, "ran frame callbacks");
        }
        ran
    }

    /// Alternates deferred turns and frames until nothing is queued or
    /// `max_frames` frames have run. Returns the number of frames ticked.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        loop {
            self.run_deferred();
            if self.pending_frames() > 0 && frames < max_frames {
                self.tick_frame();
                frames += 1;
                continue;
            }
            if self.pending_deferred() == 0 || frames >= max_frames {
                break;
            }
        }
        frames
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EventLoop")
            .field("pending_deferred", &state.deferred.len())
            .field("pending_frames", &state.frames.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ManualClock;
    use std::cell::Cell;

    #[test]
    fn tasks_queued_during_a_turn_wait_for_the_next_turn() {
        let event_loop = EventLoop::new(ManualClock::new());
        let count = Rc::new(Cell::new(0));
        let inner_loop = event_loop.clone();
        let inner_count = Rc::clone(&count);
        event_loop.defer(move || {
            inner_count.set(inner_count.get() + 1);
            let nested = Rc::clone(&inner_count);
            inner_loop.defer(move || nested.set(nested.get() + 10));
        });

        assert_eq!(event_loop.run_deferred(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(event_loop.run_deferred(), 1);
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let event_loop = EventLoop::new(ManualClock::new());
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let id = event_loop.defer(move || flag.set(true));
        assert!(event_loop.cancel_deferred(id));
        assert!(!event_loop.cancel_deferred(id));
        event_loop.run_deferred();
        assert!(!ran.get());
    }

    #[test]
    fn frames_receive_sampled_clock_time() {
        let clock = ManualClock::new();
        let event_loop = EventLoop::new(clock.clone());
        let seen = Rc::new(Cell::new(Duration::ZERO));
        let sink = Rc::clone(&seen);
        event_loop.request_frame(move |now| sink.set(now));
        clock.advance(Duration::from_millis(16));
        assert_eq!(event_loop.tick_frame(), 1);
        assert_eq!(seen.get(), Duration::from_millis(16));
        assert!(event_loop.is_idle());
    }
}
