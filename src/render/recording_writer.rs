use indexmap::IndexMap;

use crate::render::{AttrValue, AttributeWriter, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set(AttrValue),
    Remove,
    RemoveNode,
}

/// One write observed by a `RecordingWriter`.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub node: NodeId,
    pub attribute: String,
    pub op: WriteOp,
}

/// Headless writer used by tests and hosts without a scene graph.
///
/// Keeps the latest value of every attribute plus the full write log.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    attributes: IndexMap<(NodeId, String), AttrValue>,
    removed_nodes: Vec<NodeId>,
    log: Vec<WriteRecord>,
}

impl RecordingWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, attribute: &str) -> Option<&AttrValue> {
        self.attributes.get(&(node, attribute.to_owned()))
    }

    #[must_use]
    pub fn number(&self, node: NodeId, attribute: &str) -> Option<f64> {
        self.attribute(node, attribute).and_then(AttrValue::as_number)
    }

    #[must_use]
    pub fn is_removed(&self, node: NodeId) -> bool {
        self.removed_nodes.contains(&node)
    }

    #[must_use]
    pub fn log(&self) -> &[WriteRecord] {
        &self.log
    }

    /// Number of set operations recorded for one attribute.
    #[must_use]
    pub fn set_count(&self, node: NodeId, attribute: &str) -> usize {
        self.log
            .iter()
            .filter(|record| {
                record.node == node
                    && record.attribute == attribute
                    && matches!(record.op, WriteOp::Set(_))
            })
            .count()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl AttributeWriter for RecordingWriter {
    fn set_attribute(&mut self, node: NodeId, attribute: &str, value: &AttrValue) {
        self.attributes
            .insert((node, attribute.to_owned()), value.clone());
        self.log.push(WriteRecord {
            node,
            attribute: attribute.to_owned(),
            op: WriteOp::Set(value.clone()),
        });
    }

    fn remove_attribute(&mut self, node: NodeId, attribute: &str) {
        self.attributes.shift_remove(&(node, attribute.to_owned()));
        self.log.push(WriteRecord {
            node,
            attribute: attribute.to_owned(),
            op: WriteOp::Remove,
        });
    }

    fn remove_node(&mut self, node: NodeId) {
        self.attributes.retain(|(owner, _), _| *owner != node);
        self.removed_nodes.push(node);
        self.log.push(WriteRecord {
            node,
            attribute: String::new(),
            op: WriteOp::RemoveNode,
        });
    }
}
