use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::group::{ChartChildManager, ComponentIds, Group, GroupConfig, VisualizerId};
use crate::layout::PaddedContainer;
use crate::render::{AttributeWriter, NodeId};
use crate::runtime::EventLoop;

struct ChartShared {
    event_loop: EventLoop,
    writer: Rc<RefCell<dyn AttributeWriter>>,
    container: Cell<PaddedContainer>,
    ids: RefCell<ComponentIds>,
    children: RefCell<ChartChildManager>,
    next_node: Cell<u64>,
}

/// Root of one chart: its size, event loop, attribute sink and children.
#[derive(Clone)]
pub struct ChartContext {
    shared: Rc<ChartShared>,
}

impl ChartContext {
    pub fn new(
        event_loop: EventLoop,
        writer: Rc<RefCell<dyn AttributeWriter>>,
        container: PaddedContainer,
    ) -> Self {
        Self {
            shared: Rc::new(ChartShared {
                event_loop,
                writer,
                container: Cell::new(container),
                ids: RefCell::new(ComponentIds::new()),
                children: RefCell::new(ChartChildManager::new()),
                next_node: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn event_loop(&self) -> &EventLoop {
        &self.shared.event_loop
    }

    #[must_use]
    pub fn writer(&self) -> Rc<RefCell<dyn AttributeWriter>> {
        Rc::clone(&self.shared.writer)
    }

    #[must_use]
    pub fn container(&self) -> PaddedContainer {
        self.shared.container.get()
    }

    /// Resizes the chart and moves every group's scales to the new content
    /// area.
    pub fn resize(&self, container: PaddedContainer) -> ChartResult<()> {
        let rect = container.content_rect()?;
        self.shared.container.set(container);
        let groups: Vec<Group> = self
            .shared
            .children
            .borrow()
            .chart_groups()
            .map(<[Group]>::to_vec)
            .unwrap_or_default();
        for group in groups {
            group.set_content_rect(rect)?;
        }
        Ok(())
    }

    /// Creates a group sized to the chart's content area and registers it.
    pub fn add_group(&self, config: GroupConfig) -> ChartResult<Group> {
        let group = Group::with_config(self.shared.event_loop.clone(), config)?;
        group.set_content_rect(self.container().content_rect()?)?;
        self.shared.children.borrow_mut().register_group(group.clone());
        debug!("registered group with chart");
        Ok(group)
    }

    pub fn remove_group(&self, group: &Group) -> bool {
        self.shared.children.borrow_mut().unregister_group(group)
    }

    /// First registered group, used by components not nested in one.
    pub fn default_group(&self) -> ChartResult<Group> {
        let children = self.shared.children.borrow();
        children
            .chart_groups()?
            .first()
            .cloned()
            .ok_or(ChartError::MissingGroup)
    }

    pub fn allocate_component(&self, type_tag: &'static str) -> (VisualizerId, String) {
        self.shared.ids.borrow_mut().allocate(type_tag)
    }

    pub fn allocate_node(&self) -> NodeId {
        let raw = self.shared.next_node.get();
        self.shared.next_node.set(raw + 1);
        NodeId::new(raw)
    }

    /// Runs `f` with the chart's child registry.
    pub fn with_children<R>(&self, f: impl FnOnce(&mut ChartChildManager) -> R) -> R {
        f(&mut self.shared.children.borrow_mut())
    }
}

impl fmt::Debug for ChartContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartContext")
            .field("container", &self.shared.container.get())
            .field("children", &self.shared.children.borrow())
            .finish()
    }
}
