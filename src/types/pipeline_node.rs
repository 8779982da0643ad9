//! A node in the pipeline graph: fixed typed ports plus validated configuration.

use super::config::{Config, ConfigValue};
use super::segment::{FormatStage, Segment, SizeLimit, quote_value};
use super::{DataType, NodeKind, Port, PortDirection, Role};
use crate::error::{GraphError, Result};
use crate::formats::{AUTO_DETECT, format_for_path};

/// A node in the pipeline graph.
///
/// Holds no reference to the graph or to other nodes; all cross-node decisions
/// are made by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineNode {
  id: String,
  name: String,
  kind: NodeKind,
  config: Config,
}

impl PipelineNode {
  /// Creates a node of `kind` with every field at its default.
  pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
    let config = kind
      .fields()
      .iter()
      .map(|f| (f.key.to_string(), f.default.clone()))
      .collect();
    Self {
      id: id.into(),
      name: kind.caption().to_string(),
      kind,
      config,
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn set_name(&mut self, name: impl Into<String>) {
    self.name = name.into();
  }

  pub fn kind(&self) -> NodeKind {
    self.kind
  }

  pub fn role(&self) -> Role {
    self.kind.role()
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn get(&self, key: &str) -> Option<&ConfigValue> {
    self.config.get(key)
  }

  pub fn port_count(&self, direction: PortDirection) -> usize {
    self.kind.port_types(direction).len()
  }

  pub fn port_type(&self, direction: PortDirection, index: usize) -> Result<DataType> {
    let types = self.kind.port_types(direction);
    types
      .get(index)
      .copied()
      .ok_or_else(|| GraphError::OutOfRange {
        node_id: self.id.clone(),
        direction,
        index,
        count: types.len(),
      })
  }

  pub fn port(&self, direction: PortDirection, index: usize) -> Result<Port> {
    let data_type = self.port_type(direction, index)?;
    Ok(Port {
      direction,
      index,
      data_type,
    })
  }

  /// Sets one configuration field. On failure the previous value is kept.
  pub fn set_config(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<()> {
    let field = self
      .kind
      .field(key)
      .ok_or_else(|| GraphError::invalid_config(&self.id, key, "unknown field"))?;
    let value = field
      .constraint
      .check(value.into())
      .map_err(|reason| GraphError::invalid_config(&self.id, key, reason))?;
    self.config.insert(key.to_string(), value);
    Ok(())
  }

  /// Picks the container format of a file source from its path's extension,
  /// as a file browser would. Only replaces `auto-detect`; returns the format
  /// now in effect, or `None` for other kinds and unknown extensions.
  pub fn guess_format(&mut self) -> Option<&'static str> {
    if self.kind != NodeKind::FileSource || self.text("format") != AUTO_DETECT {
      return None;
    }
    let format = format_for_path(self.text("file_path"))?;
    self.config.insert("format".to_string(), format.into());
    Some(format)
  }

  /// The node's own pipeline segment in structured form.
  pub fn segment(&self) -> Segment {
    match self.kind {
      NodeKind::FileSource => {
        let location = quote_value(self.text("file_path"));
        let mut segment = Segment::new(vec![format!("filesrc location={}", location)]);
        let format = self.text("format");
        segment = segment.with_format(if format == AUTO_DETECT {
          FormatStage::Detect {
            typefind: self.flag("typefind"),
          }
        } else {
          FormatStage::Container(format.to_string())
        });
        match self.kib_to_bytes("buffer_size_kb") {
          Some(bytes) => segment.with_size_limit(SizeLimit::Blocksize(bytes)),
          None => segment,
        }
      }
      NodeKind::RtspSource => Segment::new(vec![format!(
        "rtspsrc location={} latency={}",
        quote_value(self.text("location")),
        self.int("latency_ms")
      )])
      .with_format(FormatStage::Detect { typefind: false }),
      NodeKind::CameraSource => {
        Segment::new(vec![format!("v4l2src device={}", self.text("device"))])
      }
      NodeKind::VideoScale => {
        let segment = Segment::new(vec![
          "videoscale".to_string(),
          format!(
            "video/x-raw,width={},height={}",
            self.int("width"),
            self.int("height")
          ),
        ]);
        self.with_queue(segment)
      }
      NodeKind::H264Encoder => {
        let segment = Segment::new(vec![format!(
          "x264enc bitrate={} speed-preset={}",
          self.int("bitrate"),
          self.text("preset")
        )]);
        self.with_queue(segment)
      }
      NodeKind::RtmpSink => {
        let segment = Segment::new(vec![
          "flvmux streamable=true".to_string(),
          format!("rtmpsink location={}", quote_value(self.text("location"))),
        ]);
        self.with_queue(segment)
      }
      NodeKind::DisplaySink => Segment::new(vec![
        "videoconvert".to_string(),
        format!("autovideosink sync={}", self.flag("sync")),
      ]),
    }
  }

  /// The node's own segment text, as it would appear with no upstream nodes.
  pub fn render_segment(&self) -> String {
    self.segment().to_string()
  }

  fn with_queue(&self, segment: Segment) -> Segment {
    match self.kib_to_bytes("queue_size_kb") {
      Some(bytes) => segment.with_size_limit(SizeLimit::Queue(bytes)),
      None => segment,
    }
  }

  fn text(&self, key: &str) -> &str {
    self.get(key).and_then(ConfigValue::as_str).unwrap_or_default()
  }

  fn int(&self, key: &str) -> i64 {
    self.get(key).and_then(ConfigValue::as_i64).unwrap_or_default()
  }

  fn flag(&self, key: &str) -> bool {
    self.get(key).and_then(ConfigValue::as_bool).unwrap_or_default()
  }

  /// Positive kilobyte field as bytes; zero means "no clause".
  fn kib_to_bytes(&self, key: &str) -> Option<u64> {
    u64::try_from(self.int(key))
      .ok()
      .filter(|kb| *kb > 0)
      .map(|kb| kb * 1024)
  }
}
