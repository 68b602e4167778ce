use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::animation::AnimateSettings;
use crate::core::{
    ContentRect, Datum, NamedData, ScalePair, UnifiedDomain, build_scales, resolve,
};
use crate::error::ChartResult;
use crate::group::config::GroupConfig;
use crate::group::subscriber::{SharedSubscriber, SubscriberId};
use crate::runtime::{EventLoop, TaskId};

/// Identity of a data visualizer within one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualizerId(u64);

impl VisualizerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Empty,
    Populated,
}

#[derive(Debug, Clone)]
struct Dataset {
    name: String,
    data: Vec<Datum>,
    rendered: Option<Vec<Datum>>,
}

struct GroupInner {
    config: GroupConfig,
    content_rect: ContentRect,
    datasets: IndexMap<VisualizerId, Dataset>,
    subscribers: IndexMap<SubscriberId, SharedSubscriber>,
    next_subscriber_id: u64,
    raw_domain: UnifiedDomain,
    domain: UnifiedDomain,
    scales: Option<ScalePair>,
    previous_scales: Option<ScalePair>,
    pending_batch: Option<TaskId>,
}

struct Resolved {
    raw_domain: UnifiedDomain,
    domain: UnifiedDomain,
    scales: ScalePair,
}

impl GroupInner {
    fn resolve(&self) -> ChartResult<Resolved> {
        let named: Vec<NamedData<'_>> = self
            .datasets
            .values()
            .map(|dataset| NamedData::new(&dataset.name, &dataset.data))
            .collect();
        let raw_domain = resolve(&named)?;
        let domain = match &self.config.domain {
            Some(shorthand) => shorthand.apply(&raw_domain)?,
            None => raw_domain.clone(),
        };
        let scales = build_scales(&domain, self.content_rect, self.config.manual_padding())?;
        Ok(Resolved {
            raw_domain,
            domain,
            scales,
        })
    }
}

/// Shared state of one grouping of visualizations.
///
/// Every dataset change re-resolves the unified domain and the scales right
/// away. Subscribers are notified once per burst of changes, on the next
/// deferred turn of the event loop.
#[derive(Clone)]
pub struct Group {
    inner: Rc<RefCell<GroupInner>>,
    event_loop: EventLoop,
}

impl Group {
    #[must_use]
    pub fn new(event_loop: EventLoop) -> Self {
        Self::from_parts(event_loop, GroupConfig::default())
    }

    pub fn with_config(event_loop: EventLoop, config: GroupConfig) -> ChartResult<Self> {
        Ok(Self::from_parts(event_loop, config.validate()?))
    }

    fn from_parts(event_loop: EventLoop, config: GroupConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GroupInner {
                config,
                content_rect: ContentRect::default(),
                datasets: IndexMap::new(),
                subscribers: IndexMap::new(),
                next_subscriber_id: 0,
                raw_domain: UnifiedDomain::bootstrap(),
                domain: UnifiedDomain::bootstrap(),
                scales: None,
                previous_scales: None,
                pending_batch: None,
            })),
            event_loop,
        }
    }

    #[must_use]
    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Whether both handles point at the same group.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn state(&self) -> GroupState {
        if self.has_data() {
            GroupState::Populated
        } else {
            GroupState::Empty
        }
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.inner.borrow().datasets.is_empty()
    }

    #[must_use]
    pub fn dataset_count(&self) -> usize {
        self.inner.borrow().datasets.len()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    #[must_use]
    pub fn config(&self) -> GroupConfig {
        self.inner.borrow().config
    }

    #[must_use]
    pub fn animate_settings(&self) -> Option<AnimateSettings> {
        self.inner.borrow().config.animate
    }

    #[must_use]
    pub fn spread(&self) -> f64 {
        self.inner.borrow().config.spread
    }

    #[must_use]
    pub fn content_rect(&self) -> ContentRect {
        self.inner.borrow().content_rect
    }

    /// Scales built from the latest data; `None` before the first dataset.
    #[must_use]
    pub fn current_scales(&self) -> Option<ScalePair> {
        self.inner.borrow().scales
    }

    /// Scales that were current before the latest rebuild.
    #[must_use]
    pub fn previous_scales(&self) -> Option<ScalePair> {
        self.inner.borrow().previous_scales
    }

    /// Unified domain with the configured override applied.
    #[must_use]
    pub fn current_unified_domain(&self) -> UnifiedDomain {
        self.inner.borrow().domain.clone()
    }

    #[must_use]
    pub fn raw_unified_domain(&self) -> UnifiedDomain {
        self.inner.borrow().raw_domain.clone()
    }

    /// Data of `owner` as committed by the latest batch.
    #[must_use]
    pub fn rendered_data(&self, owner: VisualizerId) -> Option<Vec<Datum>> {
        self.inner
            .borrow()
            .datasets
            .get(&owner)
            .and_then(|dataset| dataset.rendered.clone())
    }

    #[must_use]
    pub fn batch_pending(&self) -> bool {
        self.inner.borrow().pending_batch.is_some()
    }

    /// Adds or replaces the dataset owned by `owner`.
    ///
    /// On a resolution error the previous dataset, domain and scales are kept
    /// and the error is returned.
    pub fn register_dataset(
        &self,
        owner: VisualizerId,
        name: impl Into<String>,
        data: Vec<Datum>,
    ) -> ChartResult<()> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let name = name.into();
        let replaced = match inner.datasets.get_mut(&owner) {
            Some(existing) => {
                let previous = existing.clone();
                existing.name = name;
                existing.data = data;
                Some(previous)
            }
            None => {
                inner.datasets.insert(
                    owner,
                    Dataset {
                        name,
                        data,
                        rendered: None,
                    },
                );
                None
            }
        };

        if let Err(error) = self.refresh(inner) {
            match replaced {
                Some(previous) => {
                    inner.datasets.insert(owner, previous);
                }
                None => {
                    inner.datasets.shift_remove(&owner);
                }
            }
            warn!(owner = owner.raw(), %error, "dataset rejected by group");
            return Err(error);
        }
        Ok(())
    }

    /// Removes the dataset owned by `owner`. Returns `false` when there was
    /// none.
    pub fn unregister_dataset(&self, owner: VisualizerId) -> ChartResult<bool> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let Some(index) = inner.datasets.get_index_of(&owner) else {
            return Ok(false);
        };
        let Some((_, removed)) = inner.datasets.shift_remove_index(index) else {
            return Ok(false);
        };
        if let Err(error) = self.refresh(inner) {
            inner.datasets.shift_insert(index, owner, removed);
            return Err(error);
        }
        Ok(true)
    }

    /// Registers a subscriber, notifying it right away when the group has
    /// data and no batch is pending.
    pub fn register_subscriber(&self, subscriber: SharedSubscriber) -> SubscriberId {
        let (id, notify_now) = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriberId::new(inner.next_subscriber_id);
            inner.next_subscriber_id += 1;
            inner.subscribers.insert(id, Rc::clone(&subscriber));
            (
                id,
                !inner.datasets.is_empty() && inner.pending_batch.is_none(),
            )
        };
        if notify_now {
            self.notify(id, &subscriber);
        }
        id
    }

    pub fn unregister_subscriber(&self, id: SubscriberId) -> bool {
        self.inner.borrow_mut().subscribers.shift_remove(&id).is_some()
    }

    /// Moves the scales' ranges to a new content rectangle.
    pub fn set_content_rect(&self, rect: ContentRect) -> ChartResult<()> {
        let rect = rect.validate()?;
        let mut inner = self.inner.borrow_mut();
        let previous = std::mem::replace(&mut inner.content_rect, rect);
        if let Err(error) = self.refresh(&mut inner) {
            inner.content_rect = previous;
            return Err(error);
        }
        Ok(())
    }

    pub fn set_config(&self, config: GroupConfig) -> ChartResult<()> {
        let config = config.validate()?;
        let mut inner = self.inner.borrow_mut();
        let previous = std::mem::replace(&mut inner.config, config);
        if let Err(error) = self.refresh(&mut inner) {
            inner.config = previous;
            return Err(error);
        }
        Ok(())
    }

    /// Re-resolves and schedules a batch. Nothing is committed on error.
    fn refresh(&self, inner: &mut GroupInner) -> ChartResult<()> {
        if inner.datasets.is_empty() {
            if let Some(task) = inner.pending_batch.take() {
                self.event_loop.cancel_deferred(task);
            }
            debug!("group emptied, keeping last scales");
            return Ok(());
        }

        let resolved = inner.resolve()?;
        if let Some(task) = inner.pending_batch.take() {
            self.event_loop.cancel_deferred(task);
        }
        inner.raw_domain = resolved.raw_domain;
        inner.domain = resolved.domain;
        inner.previous_scales = inner.scales.replace(resolved.scales);

        let weak: Weak<RefCell<GroupInner>> = Rc::downgrade(&self.inner);
        let event_loop = self.event_loop.clone();
        let task = self.event_loop.defer(move || {
            if let Some(inner) = weak.upgrade() {
                Group { inner, event_loop }.run_batch();
            }
        });
        inner.pending_batch = Some(task);
        debug!(
            datasets = inner.datasets.len(),
            task = task.raw(),
            "scheduled group batch"
        );
        Ok(())
    }

    fn run_batch(&self) {
        let subscribers: Vec<(SubscriberId, SharedSubscriber)> = {
            let mut inner = self.inner.borrow_mut();
            inner.pending_batch = None;
            for dataset in inner.datasets.values_mut() {
                dataset.rendered = Some(dataset.data.clone());
            }
            inner
                .subscribers
                .iter()
                .map(|(id, subscriber)| (*id, Rc::clone(subscriber)))
                .collect()
        };
        debug!(subscribers = subscribers.len(), "running group batch");

        for (id, subscriber) in subscribers {
            if !self.inner.borrow().subscribers.contains_key(&id) {
                continue;
            }
            self.notify(id, &subscriber);
        }
    }

    fn notify(&self, id: SubscriberId, subscriber: &SharedSubscriber) {
        let Ok(mut subscriber) = subscriber.try_borrow_mut() else {
            warn!(subscriber = id.raw(), "subscriber is busy, skipping update");
            return;
        };
        if let Err(error) = subscriber.on_data_update(self) {
            warn!(subscriber = id.raw(), %error, "subscriber failed to apply data update");
            return;
        }
        if let Err(error) = subscriber.after_data_update(self) {
            warn!(subscriber = id.raw(), %error, "subscriber failed after data update");
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Group")
            .field("config", &inner.config)
            .field("datasets", &inner.datasets.len())
            .field("subscribers", &inner.subscribers.len())
            .field("batch_pending", &inner.pending_batch.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::ChartError;
    use crate::group::subscriber::DataSubscriber;
    use crate::runtime::ManualClock;

    #[derive(Default)]
    struct Counter {
        updates: Rc<Cell<usize>>,
    }

    impl DataSubscriber for Counter {
        fn on_data_update(&mut self, _group: &Group) -> ChartResult<()> {
            self.updates.set(self.updates.get() + 1);
            Ok(())
        }
    }

    fn group() -> Group {
        Group::new(EventLoop::new(ManualClock::new()))
    }

    #[test]
    fn burst_of_registrations_notifies_once() {
        let group = group();
        let counter = Counter::default();
        let updates = Rc::clone(&counter.updates);
        group.register_subscriber(Rc::new(RefCell::new(counter)));

        for raw in 0..3 {
            group
                .register_dataset(
                    VisualizerId::new(raw),
                    format!("line-{raw}"),
                    vec![Datum::number(raw as f64, 1.0)],
                )
                .expect("register");
        }
        assert_eq!(group.event_loop().pending_deferred(), 1);
        assert_eq!(updates.get(), 0);

        group.event_loop().run_deferred();
        assert_eq!(updates.get(), 1);
        assert!(!group.batch_pending());
    }

    #[test]
    fn mismatched_dataset_is_rolled_back() {
        let group = group();
        group
            .register_dataset(VisualizerId::new(0), "a", vec![Datum::number(1.0, 2.0)])
            .expect("register");
        let scales = group.current_scales();

        let time = chrono::DateTime::from_timestamp(0, 0).expect("epoch");
        let err = group
            .register_dataset(VisualizerId::new(1), "b", vec![Datum::time(time, 3.0)])
            .expect_err("mismatch");
        assert!(matches!(err, ChartError::DomainMismatch { .. }));
        assert_eq!(group.dataset_count(), 1);
        assert_eq!(group.current_scales(), scales);
    }

    #[test]
    fn removing_last_dataset_keeps_scales_and_cancels_batch() {
        let group = group();
        let owner = VisualizerId::new(7);
        group
            .register_dataset(owner, "a", vec![Datum::number(1.0, 2.0)])
            .expect("register");
        let scales = group.current_scales();
        assert!(group.unregister_dataset(owner).expect("unregister"));

        assert_eq!(group.state(), GroupState::Empty);
        assert_eq!(group.current_scales(), scales);
        assert!(!group.batch_pending());
        assert!(group.event_loop().is_idle());
    }
}
