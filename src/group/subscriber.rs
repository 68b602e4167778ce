use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ChartResult;
use crate::group::coordinator::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Component reacting to a group's data changes.
///
/// A batch calls `on_data_update` and then `after_data_update` on each
/// subscriber in registration order. Animations usually start in the second
/// phase.
pub trait DataSubscriber {
    fn on_data_update(&mut self, group: &Group) -> ChartResult<()>;

    fn after_data_update(&mut self, _group: &Group) -> ChartResult<()> {
        Ok(())
    }
}

pub type SharedSubscriber = Rc<RefCell<dyn DataSubscriber>>;
