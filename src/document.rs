//! Portable document: graph structure, compiled pipeline and snippets.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::compiler::compile;
use crate::error::Result;
use crate::graph::PipelineGraph;
use crate::snippets::SnippetKind;
use crate::types::{Config, NodeKind, PipelineNode};

/// Document format version written to metadata.
pub const DOCUMENT_VERSION: &str = "1.0";

/// One node as stored in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
  pub id: String,
  pub kind: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub config: Config,
}

/// One edge as stored in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
  pub source_id: String,
  pub source_port: usize,
  pub target_id: String,
  pub target_port: usize,
}

/// Provenance information attached to an exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
  pub created_by: String,
  pub created_at: DateTime<Utc>,
  pub version: String,
  pub target_platform: String,
  pub gstreamer_version: String,
  pub description: String,
}

impl DocumentMetadata {
  /// Metadata stamped with the current time.
  pub fn new(created_by: impl Into<String>) -> Self {
    Self::at(created_by, Utc::now())
  }

  pub fn at(created_by: impl Into<String>, created_at: DateTime<Utc>) -> Self {
    Self {
      created_by: created_by.into(),
      created_at,
      version: DOCUMENT_VERSION.to_string(),
      target_platform: "embedded_linux".to_string(),
      gstreamer_version: "1.0+".to_string(),
      description: "GStreamer pipeline generated from a node graph".to_string(),
    }
  }
}

/// The exported artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
  pub nodes: Vec<NodeRecord>,
  pub edges: Vec<EdgeRecord>,
  pub pipeline: String,
  #[serde(default)]
  pub snippets: BTreeMap<String, String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<DocumentMetadata>,
}

/// What [export_document] includes besides the graph itself.
#[derive(Debug, Clone)]
pub struct ExportOptions {
  pub snippets: Vec<SnippetKind>,
  pub metadata: Option<DocumentMetadata>,
}

impl Default for ExportOptions {
  fn default() -> Self {
    Self {
      snippets: SnippetKind::ALL.to_vec(),
      metadata: None,
    }
  }
}

/// Serializes the graph, its compiled pipeline and the requested snippets.
#[instrument(level = "trace", skip(graph, options))]
pub fn export_document(graph: &PipelineGraph, options: &ExportOptions) -> Result<PipelineDocument> {
  let pipeline = compile(graph)?;
  let nodes = graph
    .nodes()
    .map(|n| NodeRecord {
      id: n.id().to_string(),
      kind: n.kind().as_str().to_string(),
      name: n.name().to_string(),
      config: n.config().clone(),
    })
    .collect();
  let edges = graph
    .edges()
    .map(|e| EdgeRecord {
      source_id: e.source_id.clone(),
      source_port: e.source_port,
      target_id: e.target_id.clone(),
      target_port: e.target_port,
    })
    .collect();
  let snippets = options
    .snippets
    .iter()
    .map(|k| (k.name().to_string(), k.render(&pipeline)))
    .collect();

  info!(
    node_count = graph.len(),
    edge_count = graph.edge_count(),
    "document exported"
  );
  Ok(PipelineDocument {
    nodes,
    edges,
    pipeline,
    snippets,
    metadata: options.metadata.clone(),
  })
}

impl PipelineGraph {
  /// Rebuilds a graph from a document's `nodes` and `edges`.
  ///
  /// Every config value and edge is validated again; the stored `pipeline`
  /// and `snippets` are ignored.
  #[instrument(level = "trace", skip(doc))]
  pub fn from_document(doc: &PipelineDocument) -> Result<Self> {
    let mut graph = PipelineGraph::new();
    for record in &doc.nodes {
      let kind = NodeKind::from_str(&record.kind)?;
      let mut node = PipelineNode::new(record.id.as_str(), kind);
      if !record.name.is_empty() {
        node.set_name(record.name.as_str());
      }
      for (key, value) in &record.config {
        node.set_config(key, value.clone())?;
      }
      graph.add_node(node)?;
    }
    for e in &doc.edges {
      graph.add_edge(&e.source_id, e.source_port, &e.target_id, e.target_port)?;
    }
    Ok(graph)
  }
}
