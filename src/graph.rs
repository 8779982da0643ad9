//! The pipeline graph: nodes and type-checked edges in id-keyed tables.
//!
//! Every mutating call either succeeds completely or returns an error and
//! leaves the graph untouched. Cycles are not rejected on insertion; they are
//! reported by [PipelineGraph::topological_order] (and so by the compiler).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::types::{
  ConfigValue, Edge, EdgeId, NodeId, NodeKind, PipelineNode, PortDirection, compatible,
};

/// Node ids are pasted into the pipeline as element names (`<id>_tee`).
static NODE_ID: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid node id pattern"));

/// Returns true if `id` may name a node.
pub fn is_valid_node_id(id: &str) -> bool {
  NODE_ID.is_match(id)
}

/// Ordered collection of nodes plus the edges between their ports.
#[derive(Debug, Clone, Default)]
pub struct PipelineGraph {
  /// Node ids in insertion order.
  order: Vec<NodeId>,
  nodes: HashMap<NodeId, PipelineNode>,
  edges: BTreeMap<EdgeId, Edge>,
  next_edge: u64,
}

impl PipelineGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn contains_node(&self, id: &str) -> bool {
    self.nodes.contains_key(id)
  }

  pub fn node(&self, id: &str) -> Option<&PipelineNode> {
    self.nodes.get(id)
  }

  /// Nodes in insertion order.
  pub fn nodes(&self) -> impl Iterator<Item = &PipelineNode> {
    self.order.iter().filter_map(|id| self.nodes.get(id))
  }

  /// Edges in creation order.
  pub fn edges(&self) -> impl Iterator<Item = &Edge> {
    self.edges.values()
  }

  pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
    self.edges.get(&id)
  }

  /// Edges leaving `node_id`, in creation order.
  pub fn outgoing(&self, node_id: &str) -> Vec<&Edge> {
    self
      .edges
      .values()
      .filter(|e| e.source_id == node_id)
      .collect()
  }

  /// Edges entering `node_id`, in creation order.
  pub fn incoming(&self, node_id: &str) -> Vec<&Edge> {
    self
      .edges
      .values()
      .filter(|e| e.target_id == node_id)
      .collect()
  }

  /// Appends a node. Fails if its id is malformed or already taken.
  ///
  /// Ids start with a letter or `_` and continue with letters, digits, `_`
  /// or `-`.
  #[instrument(level = "trace", skip(self, node), fields(node_id = %node.id()))]
  pub fn add_node(&mut self, node: PipelineNode) -> Result<NodeId> {
    let id = node.id().to_string();
    if !is_valid_node_id(&id) {
      return Err(GraphError::InvalidId(id));
    }
    if self.nodes.contains_key(&id) {
      return Err(GraphError::DuplicateId(id));
    }
    debug!(node_id = %id, kind = %node.kind(), "node added");
    self.order.push(id.clone());
    self.nodes.insert(id.clone(), node);
    Ok(id)
  }

  /// Adds a default-configured node of `kind` under the first free `<kind>_<n>` id.
  #[instrument(level = "trace", skip(self))]
  pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
    let id = (1..)
      .map(|n| format!("{}_{}", kind.as_str(), n))
      .find(|candidate| !self.nodes.contains_key(candidate))
      .unwrap_or_default();
    // Generated ids are free and well-formed, so insertion cannot fail.
    self
      .add_node(PipelineNode::new(id.clone(), kind))
      .unwrap_or(id)
  }

  /// Removes a node and every edge touching it. Returns the removed edge ids.
  /// Removing an absent node is a no-op.
  #[instrument(level = "trace", skip(self))]
  pub fn remove_node(&mut self, id: &str) -> Vec<EdgeId> {
    if self.nodes.remove(id).is_none() {
      return Vec::new();
    }
    self.order.retain(|n| n != id);
    let incident: Vec<EdgeId> = self
      .edges
      .values()
      .filter(|e| e.touches(id))
      .map(|e| e.id)
      .collect();
    for edge_id in &incident {
      self.edges.remove(edge_id);
    }
    debug!(node_id = %id, removed_edges = incident.len(), "node removed");
    incident
  }

  /// Sets one configuration field on a node.
  #[instrument(level = "trace", skip(self, value))]
  pub fn set_config(
    &mut self,
    node_id: &str,
    key: &str,
    value: impl Into<ConfigValue>,
  ) -> Result<()> {
    self
      .nodes
      .get_mut(node_id)
      .ok_or_else(|| GraphError::UnknownNode(node_id.to_string()))?
      .set_config(key, value)
  }

  /// Applies [PipelineNode::guess_format] to a node.
  pub fn guess_format(&mut self, node_id: &str) -> Result<Option<&'static str>> {
    Ok(
      self
        .nodes
        .get_mut(node_id)
        .ok_or_else(|| GraphError::UnknownNode(node_id.to_string()))?
        .guess_format(),
    )
  }

  pub fn set_node_name(&mut self, node_id: &str, name: impl Into<String>) -> Result<()> {
    self
      .nodes
      .get_mut(node_id)
      .ok_or_else(|| GraphError::UnknownNode(node_id.to_string()))?
      .set_name(name);
    Ok(())
  }

  /// Connects an output port to an input port.
  #[instrument(level = "trace", skip(self))]
  pub fn add_edge(
    &mut self,
    source_id: &str,
    source_port: usize,
    target_id: &str,
    target_port: usize,
  ) -> Result<EdgeId> {
    let source = self
      .nodes
      .get(source_id)
      .ok_or_else(|| GraphError::UnknownNode(source_id.to_string()))?;
    let target = self
      .nodes
      .get(target_id)
      .ok_or_else(|| GraphError::UnknownNode(target_id.to_string()))?;
    let out = source.port(PortDirection::Output, source_port)?;
    let inp = target.port(PortDirection::Input, target_port)?;

    if !compatible(&out, &inp) {
      return Err(GraphError::IncompatiblePorts {
        source_id: source_id.to_string(),
        source_port,
        source_type: out.data_type.id.to_string(),
        target_id: target_id.to_string(),
        target_port,
        target_type: inp.data_type.id.to_string(),
      });
    }

    if let Some(existing) = self.input_edge(target_id, target_port) {
      return Err(GraphError::PortOccupied {
        node_id: target_id.to_string(),
        port: target_port,
        existing: existing.id,
      });
    }

    self.next_edge += 1;
    let id = EdgeId(self.next_edge);
    self.edges.insert(
      id,
      Edge {
        id,
        source_id: source_id.to_string(),
        source_port,
        target_id: target_id.to_string(),
        target_port,
      },
    );
    debug!(edge = %id, source_id, target_id, "edge added");
    Ok(id)
  }

  /// Removes an edge. Removing an absent edge is a no-op.
  #[instrument(level = "trace", skip(self))]
  pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
    self.edges.remove(&id)
  }

  /// The edge occupying input `port` of `node_id`, if any.
  pub fn input_edge(&self, node_id: &str, port: usize) -> Option<&Edge> {
    self
      .edges
      .values()
      .find(|e| e.target_id == node_id && e.target_port == port)
  }

  /// Node ids ordered so that every edge points forward.
  ///
  /// Ties are broken by node insertion order, so the result is stable for an
  /// unchanged graph. Fails with [GraphError::Cycle] naming an edge on a cycle.
  #[instrument(level = "trace", skip(self))]
  pub fn topological_order(&self) -> Result<Vec<NodeId>> {
    let position: HashMap<&str, usize> = self
      .order
      .iter()
      .enumerate()
      .map(|(i, id)| (id.as_str(), i))
      .collect();
    let mut in_degree = vec![0usize; self.order.len()];
    for e in self.edges.values() {
      in_degree[position[e.target_id.as_str()]] += 1;
    }

    let mut ready: BTreeSet<usize> = in_degree
      .iter()
      .enumerate()
      .filter(|(_, d)| **d == 0)
      .map(|(i, _)| i)
      .collect();
    let mut sorted = Vec::with_capacity(self.order.len());
    while let Some(i) = ready.pop_first() {
      let id = &self.order[i];
      for e in self.outgoing(id) {
        let t = position[e.target_id.as_str()];
        in_degree[t] -= 1;
        if in_degree[t] == 0 {
          ready.insert(t);
        }
      }
      sorted.push(id.clone());
    }

    if sorted.len() == self.order.len() {
      return Ok(sorted);
    }
    Err(self.cycle_error(&in_degree))
  }

  /// Walks backwards from the first unsorted node until a node repeats; the
  /// edge that closes the walk lies on a cycle.
  fn cycle_error(&self, in_degree: &[usize]) -> GraphError {
    let remaining = |id: &str| {
      self
        .order
        .iter()
        .position(|n| n == id)
        .is_some_and(|i| in_degree[i] > 0)
    };
    let mut visited: Vec<&str> = Vec::new();
    let mut current = self
      .order
      .iter()
      .enumerate()
      .find(|(i, _)| in_degree[*i] > 0)
      .map(|(_, id)| id.as_str());

    while let Some(node) = current {
      visited.push(node);
      let Some(edge) = self
        .incoming(node)
        .into_iter()
        .find(|e| remaining(&e.source_id))
      else {
        break;
      };
      if visited.contains(&edge.source_id.as_str()) {
        return GraphError::Cycle {
          edge: edge.id,
          source_id: edge.source_id.clone(),
          target_id: edge.target_id.clone(),
        };
      }
      current = Some(edge.source_id.as_str());
    }
    // Unreachable for a graph whose ids are consistent; report the first edge.
    let edge = self.edges.values().next();
    GraphError::Cycle {
      edge: edge.map(|e| e.id).unwrap_or(EdgeId(0)),
      source_id: edge.map(|e| e.source_id.clone()).unwrap_or_default(),
      target_id: edge.map(|e| e.target_id.clone()).unwrap_or_default(),
    }
  }
}
