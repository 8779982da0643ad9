//! # streamweave-gst-designer
//!
//! Typed dataflow graph for designing GStreamer pipelines.
//!
//! ## Architecture
//!
//! - [types]: data types, ports and the [compatible] rule, node kinds with
//!   their configuration schema, [PipelineNode] and its segment renderer.
//! - [graph]: [PipelineGraph], which owns nodes and edges and rejects invalid
//!   mutations eagerly.
//! - [compiler]: [compile] turns a graph into one pipeline description.
//! - [document]: [export_document] and [PipelineGraph::from_document] for the
//!   portable document, with [snippets] expanded from the compiled pipeline.
//! - [document_io]: JSON persistence used by the `gst_designer` binary.

pub mod compiler;
pub mod document;
pub mod document_io;
pub mod error;
pub mod formats;
pub mod graph;
#[cfg(test)]
mod graph_test;
pub mod snippets;
pub mod types;

pub use compiler::compile;
pub use document::{ExportOptions, PipelineDocument, export_document};
pub use error::{GraphError, Result};
pub use graph::PipelineGraph;
pub use snippets::SnippetKind;
pub use types::{DataType, NodeKind, PipelineNode, PortDirection, compatible};
