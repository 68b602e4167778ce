mod recording_writer;
mod value;

pub use recording_writer::{RecordingWriter, WriteOp, WriteRecord};
pub use value::{AttrValue, NodeId};

/// Sink for attribute writes produced by components and animations.
///
/// Hosts bridge this to their scene graph; the crate never draws on its own.
pub trait AttributeWriter {
    fn set_attribute(&mut self, node: NodeId, attribute: &str, value: &AttrValue);
    fn remove_attribute(&mut self, node: NodeId, attribute: &str);
    fn remove_node(&mut self, node: NodeId);
}
