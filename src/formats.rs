//! Container formats, their demuxers, and the stage inserted after a source.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::FormatStage;

/// Format value that asks for automatic detection.
pub const AUTO_DETECT: &str = "auto-detect";

/// Generic stage used when no dedicated demuxer is known.
pub const FALLBACK_DEMUXER: &str = "decodebin";

/// Type detection element placed before the generic stage.
pub const TYPEFIND: &str = "typefind";

/// Every accepted value of the file source `format` field.
pub const CONTAINER_FORMATS: &[&str] = &[
  AUTO_DETECT,
  "mp4",
  "mkv",
  "avi",
  "mov",
  "wmv",
  "flv",
  "webm",
  "ts",
  "m2ts",
  "mts",
  "3gp",
  "ogv",
  "rm",
  "rmvb",
];

static DEMUXERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("mp4", "qtdemux"),
    ("mov", "qtdemux"),
    ("mkv", "matroskademux"),
    ("webm", "matroskademux"),
    ("avi", "avidemux"),
    ("ts", "tsdemux"),
    ("flv", "flvdemux"),
  ])
});

/// Demuxer element for a container format, or [FALLBACK_DEMUXER].
pub fn demuxer_for(format: &str) -> &'static str {
  DEMUXERS.get(format).copied().unwrap_or(FALLBACK_DEMUXER)
}

/// Picks a container format from a file path's extension (case-insensitive).
pub fn format_for_path(path: &str) -> Option<&'static str> {
  let (_, ext) = path.rsplit_once('.')?;
  if ext.contains('/') {
    return None;
  }
  let ext = ext.to_ascii_lowercase();
  CONTAINER_FORMATS
    .iter()
    .copied()
    .filter(|f| *f != AUTO_DETECT)
    .find(|f| *f == ext)
}

/// Elements the compiler places directly after a source's own segment.
pub fn stage_elements(stage: &FormatStage) -> Vec<&'static str> {
  match stage {
    FormatStage::Container(format) => vec![demuxer_for(format)],
    FormatStage::Detect { typefind: true } => vec![TYPEFIND, FALLBACK_DEMUXER],
    FormatStage::Detect { typefind: false } => vec![FALLBACK_DEMUXER],
  }
}
