//! Graph model types: data types, ports, node kinds, nodes, edges and segments.

pub(crate) mod config;
mod data_type;
mod edge;
mod node_kind;
mod pipeline_node;
mod port;
mod segment;
#[cfg(test)]
mod segment_test;

pub use config::{Config, ConfigValue, Constraint, FieldSpec};
pub use data_type::DataType;
pub use edge::{Edge, EdgeId};
pub use node_kind::{NodeKind, Role};
pub use pipeline_node::PipelineNode;
pub use port::{Port, PortDirection, compatible};
pub use segment::{FormatStage, Segment, SizeLimit, quote_value};

/// Identifier of a node within one graph.
pub type NodeId = String;
