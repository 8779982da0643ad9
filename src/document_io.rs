//! Document save/load (JSON).

use crate::document::PipelineDocument;
use std::path::Path;
use tracing::instrument;

/// Default filename for an exported document.
pub const DOCUMENT_FILENAME: &str = "pipeline.json";

/// Serializes `doc` as pretty JSON.
pub fn to_json(doc: &PipelineDocument) -> Result<String, std::io::Error> {
  serde_json::to_string_pretty(doc)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Saves a document to `path` as JSON, creating the parent directory if needed.
#[instrument(level = "trace", skip(path, doc))]
pub fn save_document(path: &Path, doc: &PipelineDocument) -> Result<(), std::io::Error> {
  let json = to_json(doc)?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

/// Loads a document from `path`. Returns error if file is missing or invalid JSON.
#[instrument(level = "trace", skip(path))]
pub fn load_document(path: &Path) -> Result<PipelineDocument, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
