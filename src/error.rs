//! Errors raised by graph, node and compiler operations.
//!
//! Every variant is a local, recoverable condition. Mutating calls that return
//! one of these leave the graph and its nodes exactly as they were.

use crate::types::{EdgeId, PortDirection};
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error taxonomy for the pipeline graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
  /// A port index past the node's fixed arity.
  #[error("{direction} port {index} out of range on node '{node_id}' ({count} available)")]
  OutOfRange {
    node_id: String,
    direction: PortDirection,
    index: usize,
    count: usize,
  },

  /// A configuration value rejected by the field's constraint.
  #[error("invalid value for '{key}' on node '{node_id}': {reason}")]
  InvalidConfig {
    node_id: String,
    key: String,
    reason: String,
  },

  /// A node id that cannot be used as a pipeline element name.
  #[error("invalid node id '{0}': expected a letter or '_' followed by letters, digits, '_' or '-'")]
  InvalidId(String),

  #[error("node id '{0}' already exists")]
  DuplicateId(String),

  #[error("unknown node '{0}'")]
  UnknownNode(String),

  /// Output and input ports carry different data types, or directions are wrong.
  #[error("cannot connect {source_id}:{source_port} ({source_type}) to {target_id}:{target_port} ({target_type})")]
  IncompatiblePorts {
    source_id: String,
    source_port: usize,
    source_type: String,
    target_id: String,
    target_port: usize,
    target_type: String,
  },

  /// The input port already has its one incoming edge.
  #[error("input port {port} on node '{node_id}' is already connected by edge {existing}")]
  PortOccupied {
    node_id: String,
    port: usize,
    existing: EdgeId,
  },

  /// The edge relation contains a cycle; `edge` lies on it.
  #[error("graph contains a cycle through edge {edge} ({source_id} -> {target_id})")]
  Cycle {
    edge: EdgeId,
    source_id: String,
    target_id: String,
  },

  /// A document names a node kind the registry does not know.
  #[error("unknown node kind '{0}'")]
  UnknownKind(String),
}

impl GraphError {
  pub(crate) fn invalid_config(
    node_id: impl Into<String>,
    key: impl Into<String>,
    reason: impl Into<String>,
  ) -> Self {
    Self::InvalidConfig {
      node_id: node_id.into(),
      key: key.into(),
      reason: reason.into(),
    }
  }

  /// Stable, machine-readable name of the error kind.
  pub fn kind(&self) -> &'static str {
    match self {
      GraphError::OutOfRange { .. } => "out_of_range",
      GraphError::InvalidConfig { .. } => "invalid_config",
      GraphError::InvalidId(_) => "invalid_id",
      GraphError::DuplicateId(_) => "duplicate_id",
      GraphError::UnknownNode(_) => "unknown_node",
      GraphError::IncompatiblePorts { .. } => "incompatible_ports",
      GraphError::PortOccupied { .. } => "port_occupied",
      GraphError::Cycle { .. } => "cycle",
      GraphError::UnknownKind(_) => "unknown_kind",
    }
  }
}
