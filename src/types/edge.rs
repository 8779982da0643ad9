//! A directed, type-checked connection between two node ports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an edge within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "e{}", self.0)
  }
}

/// An edge from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
  pub id: EdgeId,
  pub source_id: String,
  pub source_port: usize,
  pub target_id: String,
  pub target_port: usize,
}

impl Edge {
  /// Returns true if either end of the edge is `node_id`.
  pub fn touches(&self, node_id: &str) -> bool {
    self.source_id == node_id || self.target_id == node_id
  }
}
