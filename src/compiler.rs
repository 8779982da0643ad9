//! Compile a [PipelineGraph] into a GStreamer pipeline description.
//!
//! - Nodes are visited in topological order; each contributes its own segment.
//! - A single downstream edge is a ` ! ` link. Several downstream edges end the
//!   chain in a `tee` and start one `<tee>. ! queue` branch per edge.
//! - Sources with a format hint are followed by the matching demuxer, or by the
//!   generic detection stage.
//! - Size-limiting clauses are first-writer-wins along each path: once an
//!   upstream node applied one, downstream clauses are dropped.

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::error::Result;
use crate::formats::stage_elements;
use crate::graph::PipelineGraph;
use crate::types::Segment;

/// Compiles the graph into one pipeline description string.
///
/// Pure and deterministic for an unchanged graph. Propagates
/// [crate::GraphError::Cycle] from the topological sort.
#[instrument(level = "trace", skip(graph))]
pub fn compile(graph: &PipelineGraph) -> Result<String> {
  let order = graph.topological_order()?;
  let segments: HashMap<&str, Segment> = order
    .iter()
    .filter_map(|id| graph.node(id).map(|n| (id.as_str(), n.segment())))
    .collect();

  let mut chains = Vec::new();
  for root in order.iter().filter(|id| graph.incoming(id).is_empty()) {
    emit_chain(graph, &segments, root, None, false, &mut chains);
  }

  info!(
    node_count = graph.len(),
    edge_count = graph.edge_count(),
    chain_count = chains.len(),
    "compilation complete"
  );
  Ok(chains.join(" "))
}

/// Name of the tee element placed after a fan-out node.
pub(crate) fn tee_name(node_id: &str) -> String {
  format!("{}_tee", node_id)
}

/// Appends the chain starting at `start` to `chains`, then its tee branches.
fn emit_chain(
  graph: &PipelineGraph,
  segments: &HashMap<&str, Segment>,
  start: &str,
  branch_of: Option<&str>,
  mut limited: bool,
  chains: &mut Vec<String>,
) {
  let mut parts: Vec<String> = Vec::new();
  if let Some(tee_owner) = branch_of {
    parts.push(format!("{}. ! queue", tee_name(tee_owner)));
  }

  let mut current = start;
  loop {
    if let Some(segment) = segments.get(current) {
      let has_limit = segment.size_limit.is_some();
      parts.push(segment.render(has_limit && !limited));
      limited |= has_limit;
      if let Some(stage) = &segment.format {
        parts.extend(stage_elements(stage).into_iter().map(String::from));
      }
    }

    let outgoing = graph.outgoing(current);
    match outgoing.as_slice() {
      [] => {
        chains.push(parts.join(" ! "));
        return;
      }
      [edge] => current = edge.target_id.as_str(),
      edges => {
        parts.push(format!("tee name={}", tee_name(current)));
        chains.push(parts.join(" ! "));
        for edge in edges {
          emit_chain(
            graph,
            segments,
            &edge.target_id,
            Some(current),
            limited,
            chains,
          );
        }
        return;
      }
    }
  }
}
