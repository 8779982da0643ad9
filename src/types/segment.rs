//! A node's own contribution to a pipeline description.

use std::borrow::Cow;
use std::fmt;

/// Stage the compiler inserts after a source to demultiplex or detect its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatStage {
  /// A specific container format (e.g. `mp4`).
  Container(String),
  /// Automatic detection; `typefind` adds an explicit type-finding element.
  Detect { typefind: bool },
}

/// Buffering or size-limiting clause carried by a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLimit {
  /// `blocksize=<bytes>` on the segment's first element.
  Blocksize(u64),
  /// A leading `queue max-size-bytes=<bytes>` element.
  Queue(u64),
}

/// Structured segment: elements in order plus what the compiler may adjust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
  pub elements: Vec<String>,
  pub format: Option<FormatStage>,
  pub size_limit: Option<SizeLimit>,
}

impl Segment {
  pub fn new(elements: Vec<String>) -> Self {
    Self {
      elements,
      format: None,
      size_limit: None,
    }
  }

  pub fn with_format(mut self, format: FormatStage) -> Self {
    self.format = Some(format);
    self
  }

  pub fn with_size_limit(mut self, limit: SizeLimit) -> Self {
    self.size_limit = Some(limit);
    self
  }

  /// Renders the segment text, with or without its size-limiting clause.
  pub fn render(&self, apply_size_limit: bool) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(self.elements.len() + 1);
    match self.size_limit.filter(|_| apply_size_limit) {
      Some(SizeLimit::Queue(bytes)) => {
        parts.push(format!("queue max-size-bytes={}", bytes));
        parts.extend(self.elements.iter().cloned());
      }
      Some(SizeLimit::Blocksize(bytes)) => {
        let mut elements = self.elements.iter().cloned();
        if let Some(first) = elements.next() {
          parts.push(format!("{} blocksize={}", first, bytes));
        }
        parts.extend(elements);
      }
      None => parts.extend(self.elements.iter().cloned()),
    }
    parts.join(" ! ")
  }
}

impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render(true))
  }
}

/// Quotes a property value when the pipeline parser would otherwise split it.
pub fn quote_value(value: &str) -> Cow<'_, str> {
  if value.is_empty() || value.contains(|c: char| c.is_whitespace() || c == '"' || c == '!') {
    Cow::Owned(format!(
      "\"{}\"",
      value.replace('\\', "\\\\").replace('"', "\\\"")
    ))
  } else {
    Cow::Borrowed(value)
  }
}
